use thiserror::Error;

/// Failure surface of the external collaborators (knowledge, lookup,
/// ticketing, commerce). Handlers translate these into user-facing text;
/// they never cross the dispatcher boundary as raw errors.
#[derive(Debug, Clone, Error)]
pub enum CollaboratorError {
    #[error("record not found")]
    NotFound,
    #[error("collaborator unavailable: {reason}")]
    Unavailable { reason: String },
}

impl CollaboratorError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}
