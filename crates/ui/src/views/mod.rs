mod exam;
mod home;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use exam::ExamView;
pub use home::HomeView;
pub use state::{ViewError, ViewState, view_state_from_resource};
