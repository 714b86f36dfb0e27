use shared::IdKind;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct DomainBaby {
    pub id: String,
    pub name: String,
    /// YYYY-MM-DD
    pub birthdate: String,
    pub created_at: String,
    pub updated_at: String,
}

impl DomainBaby {
    pub fn generate_id() -> String {
        IdKind::Baby.format_id(&Uuid::new_v4().to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BabyValidationError {
    #[error("Baby name cannot be empty")]
    EmptyName,
    #[error("Baby name cannot exceed 100 characters")]
    NameTooLong,
    #[error("Invalid birthdate format: {0}. Expected YYYY-MM-DD")]
    InvalidBirthdateFormat(String),
    #[error("Invalid birthdate: {0}")]
    InvalidBirthdate(String),
}
