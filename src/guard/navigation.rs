/// Where the guard stands between an intercepted navigation and the user's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    Idle,
    Blocking { pending: String },
}

/// What the host should do with a navigation attempt or prompt answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    /// Navigate to the location now.
    Proceed(String),
    /// Hold the navigation and show the confirmation prompt.
    Prompt,
    /// Stay put; no new prompt.
    Suppress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnloadDecision {
    Allow,
    RequestConfirmation,
}

/// Whether unloading the whole document needs the host's own confirmation prompt.
pub fn unload_decision(dirty: bool) -> UnloadDecision {
    if dirty {
        UnloadDecision::RequestConfirmation
    } else {
        UnloadDecision::Allow
    }
}

/// Block-confirm protocol for leaving a view with unsaved edits.
///
/// One guard belongs to one edit session; it is intentionally not `Clone`.
#[derive(Debug)]
pub struct NavigationGuard {
    current: String,
    state: GuardState,
}

impl NavigationGuard {
    pub fn new(current: impl Into<String>) -> Self {
        Self {
            current: current.into(),
            state: GuardState::Idle,
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }

    pub fn is_blocking(&self) -> bool {
        matches!(self.state, GuardState::Blocking { .. })
    }

    pub fn pending(&self) -> Option<&str> {
        match &self.state {
            GuardState::Blocking { pending } => Some(pending),
            GuardState::Idle => None,
        }
    }

    pub fn attempt(&mut self, destination: impl Into<String>, dirty: bool) -> NavigationDecision {
        let destination = destination.into();
        if let GuardState::Blocking { pending } = &self.state {
            tracing::debug!(%pending, attempted = %destination, "navigation already held");
            return NavigationDecision::Suppress;
        }
        if dirty && destination != self.current {
            tracing::debug!(from = %self.current, to = %destination, "holding navigation");
            self.state = GuardState::Blocking {
                pending: destination,
            };
            return NavigationDecision::Prompt;
        }
        self.current.clone_from(&destination);
        NavigationDecision::Proceed(destination)
    }

    pub fn confirm(&mut self) -> NavigationDecision {
        match std::mem::replace(&mut self.state, GuardState::Idle) {
            GuardState::Blocking { pending } => {
                tracing::debug!(to = %pending, "navigation confirmed");
                self.current.clone_from(&pending);
                NavigationDecision::Proceed(pending)
            }
            GuardState::Idle => NavigationDecision::Suppress,
        }
    }

    pub fn cancel(&mut self) -> NavigationDecision {
        if let GuardState::Blocking { pending } = std::mem::replace(&mut self.state, GuardState::Idle)
        {
            tracing::debug!(discarded = %pending, "navigation cancelled");
        }
        NavigationDecision::Suppress
    }

    /// Location moved by the host outside the guard, e.g. after a save redirect.
    pub fn set_current(&mut self, location: impl Into<String>) {
        self.current = location.into();
    }
}
