//! Help-channel workflow: thread creation, tagging, and closing.

/// Archive command and the close button.
pub mod close;
/// Message context menu opening the creation modal.
pub mod context_menu;
/// Control message construction shared by creation paths.
pub mod controls;
/// Tag selection handling.
pub mod tags;
/// Thread creation from a modal submission or a gateway event.
pub mod thread;

/// Name of the message context-menu command.
pub const CREATE_HELP_THREAD: &str = "Create Help Thread";
