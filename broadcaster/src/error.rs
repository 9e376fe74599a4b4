use thiserror::Error;

use crate::SubscriptionId;

/// A single callback that panicked during an isolated dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackFailure {
    pub id: SubscriptionId,
    pub message: String,
}

impl std::fmt::Display for CallbackFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "subscription {}: {}", self.id, self.message) }
}

/// Returned from: `Broadcaster::try_dispatch`
#[derive(Debug, Error)]
pub enum DispatchError {
    /// One or more callbacks panicked. Every other callback was still invoked.
    #[error("{} of {invoked} invoked callbacks panicked: {}", .failures.len(), render(.failures))]
    CallbacksPanicked { invoked: usize, failures: Vec<CallbackFailure> },
}

impl DispatchError {
    pub fn failures(&self) -> &[CallbackFailure] {
        match self {
            Self::CallbacksPanicked { failures, .. } => failures,
        }
    }
}

fn render(failures: &[CallbackFailure]) -> String { failures.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ") }

/// Render a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
