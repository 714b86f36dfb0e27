use anyhow::Result;
use chrono::{Datelike, NaiveDate, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::models::{BabyValidationError, DomainBaby, NotFoundError};
use crate::storage::BabyStorage;
use shared::{CreateBabyRequest, UpdateBabyRequest};

/// Service for managing baby profiles
#[derive(Clone)]
pub struct BabyService {
    storage: Arc<dyn BabyStorage>,
}

impl BabyService {
    pub fn new(storage: Arc<dyn BabyStorage>) -> Self {
        Self { storage }
    }

    /// Create a new baby profile
    pub async fn create_baby(&self, request: CreateBabyRequest) -> Result<DomainBaby> {
        info!("Creating baby: name={}, birthdate={}", request.name, request.birthdate);

        validate_name(&request.name)?;
        validate_birthdate(&request.birthdate)?;

        let now = Utc::now().to_rfc3339();
        let baby = DomainBaby {
            id: DomainBaby::generate_id(),
            name: request.name.trim().to_string(),
            birthdate: request.birthdate,
            created_at: now.clone(),
            updated_at: now,
        };

        self.storage.store_baby(&baby).await?;

        info!("Created baby: {} with ID: {}", baby.name, baby.id);
        Ok(baby)
    }

    /// Get a baby by ID
    pub async fn get_baby(&self, baby_id: &str) -> Result<Option<DomainBaby>> {
        let baby = self.storage.get_baby(baby_id).await?;
        if baby.is_none() {
            warn!("Baby not found: {}", baby_id);
        }
        Ok(baby)
    }

    /// Get a baby by ID, failing with `NotFoundError` if it doesn't exist
    pub async fn require_baby(&self, baby_id: &str) -> Result<DomainBaby> {
        self.get_baby(baby_id)
            .await?
            .ok_or_else(|| NotFoundError::new("Baby", baby_id).into())
    }

    /// List all babies
    pub async fn list_babies(&self) -> Result<Vec<DomainBaby>> {
        let babies = self.storage.list_babies().await?;
        info!("Found {} babies", babies.len());
        Ok(babies)
    }

    /// Update an existing baby
    pub async fn update_baby(&self, baby_id: &str, request: UpdateBabyRequest) -> Result<DomainBaby> {
        info!("Updating baby: {}", baby_id);

        let mut baby = self.require_baby(baby_id).await?;

        if let Some(name) = request.name {
            validate_name(&name)?;
            baby.name = name.trim().to_string();
        }
        if let Some(birthdate) = request.birthdate {
            validate_birthdate(&birthdate)?;
            baby.birthdate = birthdate;
        }
        baby.updated_at = Utc::now().to_rfc3339();

        self.storage.update_baby(&baby).await?;

        info!("Updated baby: {} with ID: {}", baby.name, baby.id);
        Ok(baby)
    }

    /// Delete a baby along with its events and alerts
    pub async fn delete_baby(&self, baby_id: &str) -> Result<()> {
        info!("Deleting baby: {}", baby_id);

        if !self.storage.delete_baby(baby_id).await? {
            return Err(NotFoundError::new("Baby", baby_id).into());
        }

        info!("Deleted baby: {}", baby_id);
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), BabyValidationError> {
    if name.trim().is_empty() {
        return Err(BabyValidationError::EmptyName);
    }
    if name.trim().chars().count() > 100 {
        return Err(BabyValidationError::NameTooLong);
    }
    Ok(())
}

/// Birthdates are strict `YYYY-MM-DD` calendar dates, not in the future
fn validate_birthdate(birthdate: &str) -> Result<(), BabyValidationError> {
    if birthdate.len() != 10 {
        return Err(BabyValidationError::InvalidBirthdateFormat(birthdate.to_string()));
    }
    let date = NaiveDate::parse_from_str(birthdate, "%Y-%m-%d")
        .map_err(|_| BabyValidationError::InvalidBirthdateFormat(birthdate.to_string()))?;

    if date.year() < 1900 {
        return Err(BabyValidationError::InvalidBirthdate(format!(
            "{} is before 1900",
            birthdate
        )));
    }
    if date > Utc::now().date_naive() {
        return Err(BabyValidationError::InvalidBirthdate(format!(
            "{} is in the future",
            birthdate
        )));
    }
    Ok(())
}
