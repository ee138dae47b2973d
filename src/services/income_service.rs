use std::sync::Arc;

use crate::auth::UserId;
use crate::database::{Income, IncomePatch, IncomeStore, NewIncome, StoreError};
use crate::ownership::{self, MutationError};
use crate::types::Mutation;

/// Record lifecycle for incomes: create and list pass through, update and
/// delete go through the ownership gate first.
#[derive(Clone)]
pub struct IncomeService {
    store: Arc<dyn IncomeStore>,
}

impl IncomeService {
    pub fn new(store: Arc<dyn IncomeStore>) -> Self {
        Self { store }
    }

    /// Every record, regardless of caller
    pub async fn list(&self) -> Result<Vec<Income>, MutationError> {
        Ok(self.store.list_all().await?)
    }

    pub async fn create(
        &self,
        caller: Option<&UserId>,
        fields: NewIncome,
    ) -> Result<Income, MutationError> {
        fields.validate()?;
        let owner = caller.ok_or(MutationError::Unauthenticated)?;

        let income = self.store.create(owner, fields).await?;
        tracing::info!(income_id = %income.id, owner = %owner, "income created");
        Ok(income)
    }

    /// The body is only parsed once the caller is known to own the record.
    pub async fn update(
        &self,
        id: &str,
        caller: Option<&UserId>,
        body: &[u8],
    ) -> Result<Income, MutationError> {
        let current =
            ownership::authorize::<Income, _>(id, caller, Mutation::Update, self.store.as_ref())
                .await?
                .into_result()?;

        let patch = IncomePatch::from_body(body)?;

        if patch.is_empty() {
            return Ok(current);
        }

        // Lost a race with a delete: report it like any other missing record
        let updated = self
            .store
            .update_by_id(id, &patch)
            .await?
            .ok_or(MutationError::NotFound)?;

        tracing::info!(income_id = %updated.id, "income updated");
        Ok(updated)
    }

    /// Returns the id that was removed
    pub async fn delete(&self, id: &str, caller: Option<&UserId>) -> Result<String, MutationError> {
        ownership::authorize::<Income, _>(id, caller, Mutation::Delete, self.store.as_ref())
            .await?
            .into_result()?;

        if !self.store.delete_by_id(id).await? {
            return Err(MutationError::NotFound);
        }

        tracing::info!(income_id = %id, "income deleted");
        Ok(id.to_string())
    }

    pub async fn health_check(&self) -> Result<(), StoreError> {
        self.store.health_check().await
    }
}
