use std::error::Error;
use std::fmt::{self, Display};
use uuid::Uuid;

/// Errors that can occur while manipulating a `Conversation`.
///
/// Lookups of unknown ids are not errors; they degrade to empty results.
#[derive(Debug, PartialEq, Eq)]
pub enum ContextError {
    /// The root branch anchors the conversation and cannot be removed.
    CannotDeleteRootBranch(Uuid),
}

impl Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextError::CannotDeleteRootBranch(branch_id) => {
                write!(f, "cannot delete root branch {branch_id}")
            }
        }
    }
}

impl Error for ContextError {}
