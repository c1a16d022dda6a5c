// Guarded entry state machine

use crate::error::{AuthError, Result};
use crate::gate::GateDecision;

/// State of a guarded entry.
///
/// `Checking` is initial; the other two are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    /// Session not yet evaluated
    Checking,
    /// Content may render
    Authenticated,
    /// Content must not render
    Unauthenticated { redirect_to: String },
}

impl GateState {
    /// Whether the state is terminal
    pub fn is_settled(&self) -> bool {
        !matches!(self, GateState::Checking)
    }
}

/// One pass through the gate for a guarded feature.
///
/// Content is produced only in [`GateState::Authenticated`]; while checking
/// or after a denial the content closure is never called.
#[derive(Debug, Clone)]
pub struct GuardedEntry {
    tenant_id: String,
    state: GateState,
}

impl GuardedEntry {
    /// Start a guarded entry in `Checking`
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            state: GateState::Checking,
        }
    }

    /// Tenant this entry guards
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Current state
    pub fn state(&self) -> &GateState {
        &self.state
    }

    /// Consume the entry, returning its state
    pub fn into_state(self) -> GateState {
        self.state
    }

    /// Apply a decision. A settled entry keeps its first decision.
    pub fn settle(&mut self, decision: GateDecision) -> &GateState {
        if self.state == GateState::Checking {
            self.state = match decision {
                GateDecision::Allow => GateState::Authenticated,
                GateDecision::Redirect { location } => GateState::Unauthenticated {
                    redirect_to: location,
                },
            };
        }
        &self.state
    }

    /// Apply a decision, failing if the entry was already settled
    pub fn try_settle(&mut self, decision: GateDecision) -> Result<&GateState> {
        if self.state.is_settled() {
            return Err(AuthError::AlreadySettled);
        }
        Ok(self.settle(decision))
    }

    /// Produce content only when authenticated
    pub fn render<T>(&self, content: impl FnOnce() -> T) -> Option<T> {
        match self.state {
            GateState::Authenticated => Some(content()),
            _ => None,
        }
    }

    /// Redirect to perform, if denied
    pub fn redirect_target(&self) -> Option<&str> {
        match &self.state {
            GateState::Unauthenticated { redirect_to } => Some(redirect_to),
            _ => None,
        }
    }
}
