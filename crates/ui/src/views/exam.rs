use std::collections::BTreeSet;

use dioxus::prelude::*;
use tracing::warn;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{
    ExamAction, action_error_message, apply_action, compose_answer, map_exam_vm, toggle_choice,
};

#[component]
pub fn ExamView() -> Element {
    let ctx = use_context::<AppContext>();
    let policy = ctx.policy();
    let key = ctx.session_key();
    let mut selected = use_signal(BTreeSet::<char>::new);
    let mut notice = use_signal(|| None::<&'static str>);
    let mut busy = use_signal(|| false);

    let exam_for_resource = ctx.exam();
    let mut snapshot = use_resource(move || {
        let exam = exam_for_resource.clone();
        async move {
            exam.snapshot(key).await.map_err(|err| {
                warn!(error = %err, "failed to load exam snapshot");
                ViewError::Unknown
            })
        }
    });

    let exam_for_actions = ctx.exam();
    let dispatch = use_callback(move |action: ExamAction| {
        let exam = exam_for_actions.clone();
        let answer = compose_answer(&selected.peek());
        spawn(async move {
            busy.set(true);
            match apply_action(&exam, key, action, &answer).await {
                Ok(()) => {
                    notice.set(None);
                    if action.clears_selection() {
                        selected.write().clear();
                    }
                }
                Err(err) => {
                    notice.set(Some(action_error_message(&err, policy)));
                }
            }
            snapshot.restart();
            busy.set(false);
        });
    });

    let state = view_state_from_resource(&snapshot);
    rsx! {
        div { class: "page exam-page",
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "加载中..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| snapshot.restart(),
                        "重试"
                    }
                },
                ViewState::Ready(snap) => {
                    let vm = map_exam_vm(policy, snap.as_ref());
                    let disabled = busy();
                    let multi_select = vm.question.as_ref().is_some_and(|q| q.multi_select);
                    rsx! {
                        header { class: "view-header",
                            h2 { class: "view-title", "考试" }
                            p { class: "view-subtitle", "{vm.policy_label}" }
                        }
                        div { class: "view-divider" }

                        if let Some(question) = vm.question.clone() {
                            section { class: "exam-question",
                                div { class: "exam-question-meta",
                                    span { class: "badge", "{question.category_label}" }
                                    span { class: "exam-question-number", "{question.number_label}" }
                                }
                                p { class: "exam-prompt", "{question.prompt}" }
                                div { class: "exam-options",
                                    for row in question.options.iter().cloned() {
                                        label { key: "{row.letter}", class: row.class(),
                                            input {
                                                r#type: if multi_select { "checkbox" } else { "radio" },
                                                name: "answer",
                                                value: "{row.letter}",
                                                checked: selected().contains(&row.letter),
                                                disabled: !vm.can_submit || disabled,
                                                onchange: move |_| {
                                                    selected.with_mut(|set| toggle_choice(set, row.letter, multi_select));
                                                },
                                            }
                                            span { class: "exam-option-text", "{row.letter}. {row.text}" }
                                        }
                                    }
                                }
                            }
                        }

                        div { class: "exam-actions",
                            button {
                                class: "btn btn-primary",
                                r#type: "button",
                                disabled: !vm.can_start || disabled,
                                onclick: move |_| dispatch.call(ExamAction::Start),
                                "开始考试"
                            }
                            button {
                                class: "btn btn-warning",
                                r#type: "button",
                                disabled: !vm.can_submit || disabled,
                                onclick: move |_| dispatch.call(ExamAction::Submit),
                                "提交答案"
                            }
                            button {
                                class: "btn btn-success",
                                r#type: "button",
                                disabled: !vm.can_next || disabled,
                                onclick: move |_| dispatch.call(ExamAction::Next),
                                "下一题"
                            }
                            button {
                                class: "btn btn-secondary",
                                r#type: "button",
                                disabled: !vm.can_restart || disabled,
                                onclick: move |_| dispatch.call(ExamAction::Restart),
                                "重新开始"
                            }
                        }

                        if let Some(message) = notice() {
                            p { class: "exam-notice", "{message}" }
                        }

                        section { class: "exam-result",
                            if let Some(result) = vm.result.clone() {
                                p {
                                    class: if result.is_correct { "result result--correct" } else { "result result--wrong" },
                                    "{result.headline}"
                                }
                                p { "📝 你的答案: {result.user_answer}" }
                                p { "✔️ 正确答案: {result.correct_answer}" }
                            } else {
                                p { class: "result", "{vm.hint}" }
                            }
                        }

                        p { class: "exam-stats {vm.tone.class()}", "{vm.stats_line}" }
                    }
                }
            }
        }
    }
}
