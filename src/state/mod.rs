//! Application state module

mod app_state;
mod auth_gate;
mod forms;
mod session;
mod submission;

pub use app_state::*;
pub use auth_gate::*;
pub use forms::*;
pub use session::*;
pub use submission::*;
