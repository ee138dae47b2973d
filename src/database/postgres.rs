use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use futures::TryStreamExt;
use rust_decimal::Decimal;
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::auth::UserId;
use crate::config::DatabaseConfig;
use crate::database::models::income::{parse_income_id, Income, IncomePatch, NewIncome};
use crate::database::store::{IncomeStore, StoreError};
use crate::ownership::RecordLookup;

const INCOME_COLUMNS: &str = "id, owner, income_date, income_title, income_amount, \
     income_receipt, category_id, created_at, updated_at";

#[derive(Debug, FromRow)]
struct IncomeRow {
    id: Uuid,
    owner: String,
    income_date: Option<NaiveDate>,
    income_title: Option<String>,
    income_amount: Option<Decimal>,
    income_receipt: Option<String>,
    category_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<IncomeRow> for Income {
    fn from(row: IncomeRow) -> Self {
        Self {
            id: row.id,
            owner: UserId::new(row.owner),
            income_date: row.income_date,
            income_title: row.income_title,
            income_amount: row.income_amount,
            income_receipt: row.income_receipt,
            category_id: row.category_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Postgres-backed income store
pub struct PgIncomeStore {
    pool: PgPool,
}

impl PgIncomeStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let url = config
            .url
            .as_deref()
            .ok_or(StoreError::ConfigMissing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!(
            "Connected to database {}",
            config.redacted_url().unwrap_or_default()
        );
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the embedded migrations under `migrations/`
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }
}

#[async_trait]
impl RecordLookup<Income> for PgIncomeStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Income>, StoreError> {
        let Some(id) = parse_income_id(id) else {
            return Ok(None);
        };

        let sql = format!("SELECT {} FROM incomes WHERE id = $1", INCOME_COLUMNS);
        let row = sqlx::query_as::<_, IncomeRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Income::from))
    }
}

#[async_trait]
impl IncomeStore for PgIncomeStore {
    async fn create(&self, owner: &UserId, fields: NewIncome) -> Result<Income, StoreError> {
        let sql = format!(
            "INSERT INTO incomes (id, owner, income_date, income_title, income_amount, income_receipt, category_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {}",
            INCOME_COLUMNS
        );

        let row = sqlx::query_as::<_, IncomeRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(owner.as_str())
            .bind(fields.income_date)
            .bind(fields.income_title)
            .bind(fields.income_amount)
            .bind(fields.income_receipt)
            .bind(fields.category_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn update_by_id(&self, id: &str, patch: &IncomePatch) -> Result<Option<Income>, StoreError> {
        let Some(id) = parse_income_id(id) else {
            return Ok(None);
        };

        // owner and id are not part of the SET list
        let sql = format!(
            "UPDATE incomes SET \
               income_date = COALESCE($2, income_date), \
               income_title = COALESCE($3, income_title), \
               income_amount = COALESCE($4, income_amount), \
               income_receipt = COALESCE($5, income_receipt), \
               category_id = COALESCE($6, category_id), \
               updated_at = now() \
             WHERE id = $1 \
             RETURNING {}",
            INCOME_COLUMNS
        );

        let row = sqlx::query_as::<_, IncomeRow>(&sql)
            .bind(id)
            .bind(patch.income_date)
            .bind(patch.income_title.as_deref())
            .bind(patch.income_amount)
            .bind(patch.income_receipt.as_deref())
            .bind(patch.category_id.as_deref())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Income::from))
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        let Some(id) = parse_income_id(id) else {
            return Ok(false);
        };

        let result = sqlx::query("DELETE FROM incomes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_all(&self) -> Result<Vec<Income>, StoreError> {
        let sql = format!(
            "SELECT {} FROM incomes ORDER BY created_at ASC, id ASC",
            INCOME_COLUMNS
        );

        let rows: Vec<Income> = sqlx::query_as::<_, IncomeRow>(&sql)
            .fetch(&self.pool)
            .map_ok(Income::from)
            .try_collect()
            .await?;

        Ok(rows)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}

// Run against a live database: DATABASE_URL=postgres://... cargo test postgres
// Without DATABASE_URL these tests return early.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    async fn live_store() -> Option<PgIncomeStore> {
        let url = std::env::var("DATABASE_URL").ok().filter(|u| !u.is_empty())?;
        let mut config = AppConfig::development().database;
        config.url = Some(url);
        config.max_connections = 2;

        let store = PgIncomeStore::connect(&config).await.expect("connect to DATABASE_URL");
        store.migrate().await.expect("apply migrations");
        Some(store)
    }

    fn income(title: &str, amount: Option<Decimal>) -> NewIncome {
        NewIncome {
            income_title: Some(title.to_string()),
            income_amount: amount,
            category_id: Some("cat-1".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn update_merges_only_supplied_fields() {
        let Some(store) = live_store().await else { return };
        let owner = UserId::new("pg-alice");
        let created = store
            .create(&owner, income("Salary", Some(Decimal::new(1200, 0))))
            .await
            .unwrap();
        let id = created.id.to_string();

        let patch = IncomePatch {
            income_amount: Some(Decimal::new(500, 0)),
            ..Default::default()
        };
        let updated = store.update_by_id(&id, &patch).await.unwrap().unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.owner, owner);
        assert_eq!(updated.income_amount, Some(Decimal::new(500, 0)));
        assert_eq!(updated.income_title.as_deref(), Some("Salary"));
        assert_eq!(updated.category_id.as_deref(), Some("cat-1"));
        assert!(updated.updated_at >= created.updated_at);

        store.delete_by_id(&id).await.unwrap();
    }

    #[tokio::test]
    async fn update_of_missing_row_does_not_insert() {
        let Some(store) = live_store().await else { return };
        let id = Uuid::new_v4().to_string();
        let patch = IncomePatch {
            income_title: Some("Ghost".to_string()),
            ..Default::default()
        };

        assert_eq!(store.update_by_id(&id, &patch).await.unwrap(), None);
        assert_eq!(store.find_by_id(&id).await.unwrap(), None);
        assert_eq!(store.update_by_id("not-a-uuid", &patch).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_went_away() {
        let Some(store) = live_store().await else { return };
        let created = store
            .create(&UserId::new("pg-bob"), income("Bonus", None))
            .await
            .unwrap();
        let id = created.id.to_string();

        assert!(store.delete_by_id(&id).await.unwrap());
        assert!(!store.delete_by_id(&id).await.unwrap());
        assert_eq!(store.find_by_id(&id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn amounts_keep_scale_and_magnitude() {
        let Some(store) = live_store().await else { return };
        let owner = UserId::new("pg-carol");

        for amount in [Decimal::new(75_555, 3), Decimal::new(1_000_000_000_000, 0)] {
            let created = store.create(&owner, income("Odd", Some(amount))).await.unwrap();
            assert_eq!(created.income_amount, Some(amount));

            let found = store.find_by_id(&created.id.to_string()).await.unwrap().unwrap();
            assert_eq!(found.income_amount, Some(amount));

            store.delete_by_id(&created.id.to_string()).await.unwrap();
        }
    }

    #[tokio::test]
    async fn closed_pool_fails_health_check() {
        let Some(store) = live_store().await else { return };
        assert!(store.health_check().await.is_ok());

        store.close().await;
        assert!(matches!(store.health_check().await, Err(StoreError::Connection(_))));
    }
}
