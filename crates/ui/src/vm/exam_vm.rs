use std::collections::BTreeSet;

use exam_core::ExamError;
use exam_core::grading::{OptionMark, option_marks};
use exam_core::model::{BankOverview, SelectionPolicy, SessionKey, SessionPhase, SessionStats};
use services::{ExamService, ExamServiceError, QuestionView, SessionSnapshot};

//
// ─── PHASE & TONE ──────────────────────────────────────────────────────────────
//

/// Screen phase: the session phase plus `Idle` for "no session".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExamPhase {
    Idle,
    AwaitingSelection,
    AwaitingAnswer,
    Answered,
    Exhausted,
}

impl From<SessionPhase> for ExamPhase {
    fn from(phase: SessionPhase) -> Self {
        match phase {
            SessionPhase::AwaitingSelection => ExamPhase::AwaitingSelection,
            SessionPhase::AwaitingAnswer => ExamPhase::AwaitingAnswer,
            SessionPhase::Answered => ExamPhase::Answered,
            SessionPhase::Exhausted => ExamPhase::Exhausted,
        }
    }
}

/// Colour band of the stats line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccuracyTone {
    Neutral,
    Good,
    Warning,
    Poor,
}

impl AccuracyTone {
    /// Good from 60%, warning from 40%, poor below; neutral before any answer.
    #[must_use]
    pub fn from_stats(stats: &SessionStats) -> Self {
        if stats.answered_questions == 0 {
            AccuracyTone::Neutral
        } else if stats.accuracy >= 60.0 {
            AccuracyTone::Good
        } else if stats.accuracy >= 40.0 {
            AccuracyTone::Warning
        } else {
            AccuracyTone::Poor
        }
    }

    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            AccuracyTone::Neutral => "tone-neutral",
            AccuracyTone::Good => "tone-good",
            AccuracyTone::Warning => "tone-warning",
            AccuracyTone::Poor => "tone-poor",
        }
    }
}

//
// ─── VIEW MODELS ───────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionRowVm {
    pub letter: char,
    pub text: String,
    /// Set once the question has been graded.
    pub mark: Option<OptionMark>,
}

impl OptionRowVm {
    #[must_use]
    pub fn class(&self) -> &'static str {
        match self.mark {
            Some(OptionMark::Correct) => "option option--correct",
            Some(OptionMark::WrongChoice) => "option option--wrong",
            Some(OptionMark::Neutral) | None => "option",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub category_label: String,
    pub number_label: String,
    pub prompt: String,
    /// Checkboxes when true, radio buttons otherwise.
    pub multi_select: bool,
    pub options: Vec<OptionRowVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultVm {
    pub is_correct: bool,
    pub headline: &'static str,
    pub user_answer: String,
    pub correct_answer: String,
}

/// Everything the exam screen renders, derived from one snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct ExamVm {
    pub phase: ExamPhase,
    pub policy_label: &'static str,
    pub question: Option<QuestionVm>,
    pub result: Option<ResultVm>,
    pub hint: &'static str,
    pub stats_line: String,
    pub tone: AccuracyTone,
    pub can_start: bool,
    pub can_submit: bool,
    pub can_next: bool,
    pub can_restart: bool,
}

impl ExamVm {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.phase == ExamPhase::Idle
    }
}

//
// ─── MAPPING ───────────────────────────────────────────────────────────────────
//

/// Project a session snapshot (or its absence) onto the exam screen.
#[must_use]
pub fn map_exam_vm(policy: SelectionPolicy, snapshot: Option<&SessionSnapshot>) -> ExamVm {
    let phase = snapshot.map_or(ExamPhase::Idle, |s| ExamPhase::from(s.phase));
    let stats = snapshot.map(|s| s.stats).unwrap_or_default();

    let question = snapshot.and_then(|s| {
        s.question
            .as_ref()
            .map(|view| map_question(view, s.last_result.as_ref()))
    });
    let result = snapshot
        .and_then(|s| s.last_result.as_ref())
        .map(|r| ResultVm {
            is_correct: r.is_correct,
            headline: if r.is_correct {
                "✅ 恭喜！回答正确！"
            } else {
                "❌ 很遗憾，回答错误！"
            },
            user_answer: r.user_answer.clone(),
            correct_answer: r.correct_answer.clone(),
        });

    ExamVm {
        phase,
        policy_label: policy_label(policy),
        question,
        result,
        hint: hint(phase),
        stats_line: stats_line(phase, &stats),
        tone: AccuracyTone::from_stats(&stats),
        can_start: phase == ExamPhase::Idle,
        can_submit: phase == ExamPhase::AwaitingAnswer,
        can_next: matches!(phase, ExamPhase::Answered | ExamPhase::AwaitingSelection),
        can_restart: phase != ExamPhase::Idle,
    }
}

fn map_question(view: &QuestionView, result: Option<&exam_core::model::AnswerResult>) -> QuestionVm {
    let options = match result {
        Some(result) => option_marks(&view.options, result)
            .into_iter()
            .map(|(option, mark)| OptionRowVm {
                letter: option.label.as_char(),
                text: option.text,
                mark: Some(mark),
            })
            .collect(),
        None => view
            .options
            .iter()
            .map(|option| OptionRowVm {
                letter: option.label.as_char(),
                text: option.text.clone(),
                mark: None,
            })
            .collect(),
    };
    QuestionVm {
        category_label: view.category_name.clone(),
        number_label: format!("第 {} 题", view.question_number),
        prompt: view.prompt.clone(),
        multi_select: view.is_multi_select(),
        options,
    }
}

/// Display name of a selection policy.
#[must_use]
pub fn policy_label(policy: SelectionPolicy) -> &'static str {
    match policy {
        SelectionPolicy::Random => "随机出题",
        SelectionPolicy::FixedSequence => "顺序出题",
    }
}

fn hint(phase: ExamPhase) -> &'static str {
    match phase {
        ExamPhase::Idle => "🎯 请点击开始考试按钮开始练习",
        ExamPhase::AwaitingSelection => "🎯 暂无题目，点击下一题重新抽题",
        ExamPhase::AwaitingAnswer => "🎯 请选择答案后点击提交",
        ExamPhase::Answered => "🎯 点击下一题继续",
        ExamPhase::Exhausted => "🏁 已无更多题目",
    }
}

/// Progress line shown under the buttons.
#[must_use]
pub fn stats_line(phase: ExamPhase, stats: &SessionStats) -> String {
    if phase == ExamPhase::Idle {
        return "🚀 等待开始考试...".to_string();
    }
    if stats.answered_questions == 0 {
        return format!("📊 进度: 第 {} 题 | 🚀 准备答题...", stats.total_questions);
    }
    format!(
        "📊 进度: 第 {} 题 | ✅ 正确: {} 题 | 📈 正确率: {:.1}%",
        stats.total_questions, stats.correct_answers, stats.accuracy
    )
}

/// Bank summary shown on the home screen.
#[must_use]
pub fn bank_overview_line(overview: &BankOverview) -> String {
    format!(
        "📚 题库加载成功！单选题: {}道 | 多选题: {}道 | 判断题: {}道 | 总计: {}道",
        overview.single_choice, overview.multiple_choice, overview.judgment, overview.total
    )
}

//
// ─── INPUT ─────────────────────────────────────────────────────────────────────
//

/// Apply a click on option `letter`: radio semantics replace, checkbox semantics toggle.
pub fn toggle_choice(selected: &mut BTreeSet<char>, letter: char, multi_select: bool) {
    if multi_select {
        if !selected.remove(&letter) {
            selected.insert(letter);
        }
    } else {
        selected.clear();
        selected.insert(letter);
    }
}

/// Answer string for the current selection: chosen letters in sorted order.
#[must_use]
pub fn compose_answer(selected: &BTreeSet<char>) -> String {
    selected.iter().collect()
}

/// Button presses on the exam screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExamAction {
    Start,
    Submit,
    Next,
    Restart,
}

impl ExamAction {
    /// Whether the option selection is stale after this action succeeds.
    #[must_use]
    pub fn clears_selection(self) -> bool {
        !matches!(self, ExamAction::Submit)
    }
}

/// Run `action` for the window's session. `Start` also selects the first question.
///
/// # Errors
///
/// Returns the service error of the failing step.
pub async fn apply_action(
    exam: &ExamService,
    key: SessionKey,
    action: ExamAction,
    answer: &str,
) -> Result<(), ExamServiceError> {
    match action {
        ExamAction::Start => {
            exam.start_exam(key).await?;
            exam.next_question(key).await?;
        }
        ExamAction::Submit => {
            exam.submit_answer(key, answer).await?;
        }
        ExamAction::Next => {
            exam.next_question(key).await?;
        }
        ExamAction::Restart => exam.restart(key).await?,
    }
    Ok(())
}

/// Learner-facing message for a failed action.
#[must_use]
pub fn action_error_message(err: &ExamServiceError, policy: SelectionPolicy) -> &'static str {
    match err {
        ExamServiceError::Engine(ExamError::NoQuestionAvailable) => match policy {
            SelectionPolicy::FixedSequence => "已无更多题目",
            SelectionPolicy::Random => "没有可用的题目",
        },
        ExamServiceError::Engine(ExamError::EmptyAnswer) => "请先选择答案再提交",
        ExamServiceError::Engine(ExamError::NoCurrentQuestion)
        | ExamServiceError::SessionNotStarted => "没有当前题目",
        _ => "操作失败，请重试",
    }
}
