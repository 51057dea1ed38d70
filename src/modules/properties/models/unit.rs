use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::billing::validate_due_day;
use crate::core::{validate_amount, AppError, Result};

/// A rentable unit within a property, with its tenant and rent terms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Unit {
    pub id: i64,
    pub property_id: i64,
    pub unit_number: String,
    pub renter_name: String,
    pub phone_number: String,
    pub email: String,
    /// Recurring monthly rent
    pub rent_amount: Decimal,
    /// Day of month rent falls due (1..=31, clamped in short months)
    pub rent_due_day: u32,
}

/// Fields supplied when creating or editing a unit
#[derive(Debug, Clone, Deserialize)]
pub struct UnitFields {
    pub unit_number: String,
    pub renter_name: String,
    pub phone_number: String,
    pub email: String,
    pub rent_amount: Decimal,
    pub rent_due_day: u32,
}

impl UnitFields {
    pub fn validate(&self) -> Result<()> {
        if self.unit_number.trim().is_empty() {
            return Err(AppError::validation("Unit number cannot be empty"));
        }
        if self.unit_number.len() > 20 {
            return Err(AppError::validation(
                "Unit number cannot exceed 20 characters",
            ));
        }
        if self.renter_name.trim().is_empty() {
            return Err(AppError::validation("Renter name cannot be empty"));
        }
        validate_amount("Rent amount", self.rent_amount)?;
        validate_due_day(self.rent_due_day)
    }

    pub(crate) fn into_unit(self, id: i64, property_id: i64) -> Unit {
        Unit {
            id,
            property_id,
            unit_number: self.unit_number,
            renter_name: self.renter_name,
            phone_number: self.phone_number,
            email: self.email,
            rent_amount: self.rent_amount,
            rent_due_day: self.rent_due_day,
        }
    }
}
