use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use super::instance::Checklist;
use super::policy::CreditPolicy;

/// Identifies one student's session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub String);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A student's checklist behind its own lock. All operations on one
/// student serialize through this mutex; different students never contend.
pub type SharedChecklist = Arc<Mutex<Checklist>>;

/// Storage abstraction so the service module can be exercised in isolation.
pub trait ChecklistRepository: Send + Sync {
    fn fetch(&self, student: &StudentId) -> Result<Option<SharedChecklist>, RepositoryError>;
    /// Returns the existing session or creates an empty one under `policy`.
    fn open(
        &self,
        student: &StudentId,
        policy: &CreditPolicy,
    ) -> Result<SharedChecklist, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("no checklist stored for student")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
