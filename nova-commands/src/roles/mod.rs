//! Self-assignable role surfaces.

/// Language role select menu.
pub mod menu;
/// Changelog ping subscriptions.
pub mod subscribe;
