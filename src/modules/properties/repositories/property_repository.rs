use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::properties::models::{validate_llc_name, Llc, NewProperty, Property, Unit, UnitFields};

/// Storage for the ownership hierarchy: LLCs, their properties and the
/// rentable units inside them
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    async fn create_llc(&self, name: &str) -> Result<Llc>;

    /// Fails with NotFound when the owning LLC does not exist
    async fn create_property(&self, property: &NewProperty) -> Result<Property>;

    async fn find_property(&self, id: i64) -> Result<Option<Property>>;

    /// Fails with NotFound when the property does not exist
    async fn create_unit(&self, property_id: i64, fields: &UnitFields) -> Result<Unit>;

    async fn find_unit(&self, id: i64) -> Result<Option<Unit>>;

    /// Replace a unit's editable fields; rent changes only affect invoices
    /// generated afterwards
    async fn update_unit(&self, id: i64, fields: &UnitFields) -> Result<Unit>;

    /// Delete a unit together with its invoices and their transactions
    async fn delete_unit(&self, id: i64) -> Result<()>;

    async fn list_units_for_property(&self, property_id: i64) -> Result<Vec<Unit>>;

    async fn list_units(&self) -> Result<Vec<Unit>>;
}

const UNIT_COLUMNS: &str = "id, property_id, unit_number, renter_name, phone_number, email, \
                            rent_amount, rent_due_day";

/// Turn a foreign-key failure into NotFound for the named parent
fn map_parent_error(err: sqlx::Error, parent: String) -> AppError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return AppError::not_found(parent);
        }
    }
    AppError::Database(err)
}

pub struct MySqlPropertyRepository {
    pool: MySqlPool,
}

impl MySqlPropertyRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PropertyRepository for MySqlPropertyRepository {
    async fn create_llc(&self, name: &str) -> Result<Llc> {
        validate_llc_name(name)?;
        let name = name.trim().to_string();

        let result = sqlx::query("INSERT INTO llcs (name) VALUES (?)")
            .bind(&name)
            .execute(&self.pool)
            .await?;

        Ok(Llc {
            id: result.last_insert_id() as i64,
            name,
        })
    }

    async fn create_property(&self, property: &NewProperty) -> Result<Property> {
        property.validate()?;

        let result = sqlx::query("INSERT INTO properties (llc_id, name, address) VALUES (?, ?, ?)")
            .bind(property.llc_id)
            .bind(&property.name)
            .bind(&property.address)
            .execute(&self.pool)
            .await
            .map_err(|e| map_parent_error(e, format!("LLC {}", property.llc_id)))?;

        Ok(Property {
            id: result.last_insert_id() as i64,
            llc_id: property.llc_id,
            name: property.name.clone(),
            address: property.address.clone(),
        })
    }

    async fn find_property(&self, id: i64) -> Result<Option<Property>> {
        let property = sqlx::query_as::<_, Property>(
            "SELECT id, llc_id, name, address FROM properties WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(property)
    }

    async fn create_unit(&self, property_id: i64, fields: &UnitFields) -> Result<Unit> {
        fields.validate()?;

        let result = sqlx::query(
            r#"
            INSERT INTO units (
                property_id, unit_number, renter_name, phone_number, email,
                rent_amount, rent_due_day
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(property_id)
        .bind(&fields.unit_number)
        .bind(&fields.renter_name)
        .bind(&fields.phone_number)
        .bind(&fields.email)
        .bind(fields.rent_amount)
        .bind(fields.rent_due_day)
        .execute(&self.pool)
        .await
        .map_err(|e| map_parent_error(e, format!("Property {}", property_id)))?;

        Ok(fields
            .clone()
            .into_unit(result.last_insert_id() as i64, property_id))
    }

    async fn find_unit(&self, id: i64) -> Result<Option<Unit>> {
        let unit = sqlx::query_as::<_, Unit>(&format!(
            "SELECT {} FROM units WHERE id = ?",
            UNIT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(unit)
    }

    async fn update_unit(&self, id: i64, fields: &UnitFields) -> Result<Unit> {
        fields.validate()?;

        let mut tx = self.pool.begin().await?;

        let property_id: Option<i64> =
            sqlx::query_scalar("SELECT property_id FROM units WHERE id = ? FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let property_id = property_id.ok_or_else(|| AppError::not_found(format!("Unit {}", id)))?;

        sqlx::query(
            r#"
            UPDATE units
            SET unit_number = ?, renter_name = ?, phone_number = ?, email = ?,
                rent_amount = ?, rent_due_day = ?
            WHERE id = ?
            "#,
        )
        .bind(&fields.unit_number)
        .bind(&fields.renter_name)
        .bind(&fields.phone_number)
        .bind(&fields.email)
        .bind(fields.rent_amount)
        .bind(fields.rent_due_day)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(fields.clone().into_unit(id, property_id))
    }

    async fn delete_unit(&self, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        // Children first so the cascade holds even without ON DELETE CASCADE
        sqlx::query(
            r#"
            DELETE pt FROM payment_transactions pt
            INNER JOIN rent_invoices ri ON ri.id = pt.rent_invoice_id
            WHERE ri.unit_id = ?
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM rent_invoices WHERE unit_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM units WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            // Dropping the transaction rolls it back
            return Err(AppError::not_found(format!("Unit {}", id)));
        }

        tx.commit().await?;

        tracing::info!(unit_id = id, "Deleted unit with its invoices and transactions");
        Ok(())
    }

    async fn list_units_for_property(&self, property_id: i64) -> Result<Vec<Unit>> {
        let units = sqlx::query_as::<_, Unit>(&format!(
            "SELECT {} FROM units WHERE property_id = ? ORDER BY id",
            UNIT_COLUMNS
        ))
        .bind(property_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(units)
    }

    async fn list_units(&self) -> Result<Vec<Unit>> {
        let units = sqlx::query_as::<_, Unit>(&format!(
            "SELECT {} FROM units ORDER BY property_id, id",
            UNIT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(units)
    }
}
