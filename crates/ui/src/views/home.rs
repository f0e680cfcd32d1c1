use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::vm::{bank_overview_line, policy_label};

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let overview = ctx.bank_overview();
    let summary = bank_overview_line(&overview);
    let policy = policy_label(ctx.policy());

    rsx! {
        div { class: "page home-page",
            header { class: "view-header",
                h2 { class: "view-title", "题库" }
                p { class: "view-subtitle", "出题方式: {policy}" }
            }
            div { class: "view-divider" }
            p { class: "bank-summary", "{summary}" }
            ul { class: "bank-counts",
                li { "单选题: {overview.single_choice}" }
                li { "多选题: {overview.multiple_choice}" }
                li { "判断题: {overview.judgment}" }
            }
            Link { class: "btn btn-primary", to: Route::Exam {}, "进入考试" }
        }
    }
}
