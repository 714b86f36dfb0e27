pub mod alert;
pub mod baby;
pub mod calendar_event;

pub use alert::*;
pub use baby::*;
pub use calendar_event::*;

/// Returned when an operation targets a record that does not exist
#[derive(Debug, thiserror::Error)]
#[error("{kind} not found: {id}")]
pub struct NotFoundError {
    pub kind: &'static str,
    pub id: String,
}

impl NotFoundError {
    pub fn new(kind: &'static str, id: impl Into<String>) -> Self {
        Self { kind, id: id.into() }
    }
}
