mod exam_vm;

pub use exam_vm::{
    AccuracyTone, ExamAction, ExamPhase, ExamVm, OptionRowVm, QuestionVm, ResultVm, action_error_message,
    apply_action, bank_overview_line, compose_answer, map_exam_vm, policy_label, stats_line,
    toggle_choice,
};
