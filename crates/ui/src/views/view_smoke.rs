use exam_core::model::SelectionPolicy;

use super::test_harness::{ViewKind, setup_view_harness};
use crate::vm::{ExamAction, apply_action};

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_renders_bank_overview() {
    let mut harness = setup_view_harness(ViewKind::Home, SelectionPolicy::Random);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("单选题: 3道"), "missing overview in {html}");
    assert!(html.contains("总计: 7道"), "missing total in {html}");
    assert!(html.contains("出题方式: 随机出题"), "missing policy in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn exam_view_smoke_renders_idle_screen() {
    let mut harness = setup_view_harness(ViewKind::Exam, SelectionPolicy::FixedSequence);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("开始考试"), "missing start button in {html}");
    assert!(html.contains("🚀 等待开始考试..."), "missing idle stats in {html}");
    assert!(html.contains("顺序出题"), "missing policy in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn exam_view_smoke_renders_current_question() {
    let mut harness = setup_view_harness(ViewKind::Exam, SelectionPolicy::FixedSequence);
    let exam = harness.ctx.exam();
    let key = harness.ctx.session_key();
    apply_action(&exam, key, ExamAction::Start, "").await.unwrap();

    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("单选题"), "missing category in {html}");
    assert!(html.contains("第 1 题"), "missing number in {html}");
    assert!(html.contains("🎯 请选择答案后点击提交"), "missing hint in {html}");
    assert!(
        html.contains("📊 进度: 第 1 题 | 🚀 准备答题..."),
        "missing stats in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn exam_view_smoke_marks_graded_answer() {
    let mut harness = setup_view_harness(ViewKind::Exam, SelectionPolicy::FixedSequence);
    let exam = harness.ctx.exam();
    let key = harness.ctx.session_key();
    apply_action(&exam, key, ExamAction::Start, "").await.unwrap();
    apply_action(&exam, key, ExamAction::Submit, "B").await.unwrap();

    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("❌ 很遗憾，回答错误！"), "missing headline in {html}");
    assert!(html.contains("option--correct"), "missing correct mark in {html}");
    assert!(html.contains("option--wrong"), "missing wrong mark in {html}");
}
