use super::{unload_decision, NavigationDecision, NavigationGuard, UnloadDecision};

/// A form being edited, with the guard that protects it.
///
/// The session is dirty while the draft differs from the last saved value.
#[derive(Debug)]
pub struct EditSession<T> {
    baseline: T,
    draft: T,
    guard: NavigationGuard,
}

impl<T: Clone + PartialEq> EditSession<T> {
    pub fn new(location: impl Into<String>, value: T) -> Self {
        Self {
            draft: value.clone(),
            baseline: value,
            guard: NavigationGuard::new(location),
        }
    }

    pub fn draft(&self) -> &T {
        &self.draft
    }

    pub fn baseline(&self) -> &T {
        &self.baseline
    }

    /// Applies `edit` to the draft. Returns whether the session is dirty afterwards.
    pub fn update(&mut self, edit: impl FnOnce(&mut T)) -> bool {
        edit(&mut self.draft);
        self.is_dirty()
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.baseline
    }

    pub fn mark_saved(&mut self) {
        self.baseline = self.draft.clone();
    }

    pub fn revert(&mut self) {
        self.draft = self.baseline.clone();
    }

    pub fn guard(&self) -> &NavigationGuard {
        &self.guard
    }

    pub fn navigate(&mut self, destination: impl Into<String>) -> NavigationDecision {
        let dirty = self.is_dirty();
        self.guard.attempt(destination, dirty)
    }

    pub fn confirm_navigation(&mut self) -> NavigationDecision {
        self.guard.confirm()
    }

    pub fn cancel_navigation(&mut self) -> NavigationDecision {
        self.guard.cancel()
    }

    pub fn unload_decision(&self) -> UnloadDecision {
        unload_decision(self.is_dirty())
    }
}
