//! Guarding navigation away from unsaved edits.

mod navigation;
mod session;

pub use navigation::{unload_decision, GuardState, NavigationDecision, NavigationGuard, UnloadDecision};
pub use session::EditSession;
