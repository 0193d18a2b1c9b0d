//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod chest_view;
pub mod event_log;
pub mod help_dialog;
pub mod layout;
pub mod quit_dialog;

pub use chest_view::ChestView;
pub use event_log::{EventLog, LogKind};
pub use help_dialog::HelpDialog;
pub use layout::{calculate_main_layout, centered_popup};
pub use quit_dialog::QuitDialog;
