use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::UserId;
use crate::database::models::income::{parse_income_id, Income, IncomePatch, NewIncome};
use crate::database::store::{IncomeStore, StoreError};
use crate::ownership::RecordLookup;

#[derive(Default)]
struct Inner {
    next_seq: u64,
    rows: HashMap<Uuid, (u64, Income)>,
}

/// Process-local store. Used by the test suite and `--in-memory` runs.
#[derive(Default)]
pub struct MemoryIncomeStore {
    inner: RwLock<Inner>,
}

impl MemoryIncomeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl RecordLookup<Income> for MemoryIncomeStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Income>, StoreError> {
        let Some(id) = parse_income_id(id) else {
            return Ok(None);
        };
        let inner = self.inner.read().await;
        Ok(inner.rows.get(&id).map(|(_, income)| income.clone()))
    }
}

#[async_trait]
impl IncomeStore for MemoryIncomeStore {
    async fn create(&self, owner: &UserId, fields: NewIncome) -> Result<Income, StoreError> {
        let now = Utc::now();
        let income = Income {
            id: Uuid::new_v4(),
            owner: owner.clone(),
            income_date: fields.income_date,
            income_title: fields.income_title,
            income_amount: fields.income_amount,
            income_receipt: fields.income_receipt,
            category_id: fields.category_id,
            created_at: now,
            updated_at: now,
        };

        let mut inner = self.inner.write().await;
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.rows.insert(income.id, (seq, income.clone()));
        Ok(income)
    }

    async fn update_by_id(&self, id: &str, patch: &IncomePatch) -> Result<Option<Income>, StoreError> {
        let Some(id) = parse_income_id(id) else {
            return Ok(None);
        };
        let mut inner = self.inner.write().await;
        let Some((_, income)) = inner.rows.get_mut(&id) else {
            return Ok(None);
        };

        patch.apply_to(income);
        income.updated_at = Utc::now();
        Ok(Some(income.clone()))
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        let Some(id) = parse_income_id(id) else {
            return Ok(false);
        };
        let mut inner = self.inner.write().await;
        Ok(inner.rows.remove(&id).is_some())
    }

    async fn list_all(&self) -> Result<Vec<Income>, StoreError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<_> = inner.rows.values().cloned().collect();
        rows.sort_by_key(|(seq, _)| *seq);
        Ok(rows.into_iter().map(|(_, income)| income).collect())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
