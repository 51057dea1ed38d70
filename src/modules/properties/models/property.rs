use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::{AppError, Result};

/// Ownership entity holding one or more properties
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Llc {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Property {
    pub id: i64,
    pub llc_id: i64,
    pub name: String,
    pub address: String,
}

/// Fields supplied when registering a property
#[derive(Debug, Clone, Deserialize)]
pub struct NewProperty {
    pub llc_id: i64,
    pub name: String,
    pub address: String,
}

impl NewProperty {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Property name cannot be empty"));
        }
        if self.name.len() > 100 {
            return Err(AppError::validation(
                "Property name cannot exceed 100 characters",
            ));
        }
        if self.address.trim().is_empty() {
            return Err(AppError::validation("Property address cannot be empty"));
        }
        if self.address.len() > 200 {
            return Err(AppError::validation(
                "Property address cannot exceed 200 characters",
            ));
        }
        Ok(())
    }
}

pub fn validate_llc_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("LLC name cannot be empty"));
    }
    if name.len() > 100 {
        return Err(AppError::validation("LLC name cannot exceed 100 characters"));
    }
    Ok(())
}
