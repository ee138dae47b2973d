use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::auth::UserId;
use crate::ownership::{MutationError, OwnedRecord};

/// A stored income record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub id: Uuid,
    pub owner: UserId,
    pub income_date: Option<NaiveDate>,
    pub income_title: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub income_amount: Option<Decimal>,
    pub income_receipt: Option<String>,
    pub category_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OwnedRecord for Income {
    fn owner(&self) -> &UserId {
        &self.owner
    }
}

/// Body of POST /api/income. Owner, id and timestamps are not accepted from callers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewIncome {
    #[serde(default)]
    pub income_date: Option<NaiveDate>,
    #[serde(default)]
    pub income_title: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub income_amount: Option<Decimal>,
    #[serde(default)]
    pub income_receipt: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
}

impl NewIncome {
    /// Rejects the payload only when both title and amount are missing.
    /// An empty title and a zero amount count as missing.
    pub fn validate(&self) -> Result<(), MutationError> {
        let has_title = self.income_title.as_deref().is_some_and(|t| !t.is_empty());
        let has_amount = self.income_amount.is_some_and(|a| !a.is_zero());

        if has_title || has_amount {
            return Ok(());
        }

        let mut field_errors = HashMap::new();
        field_errors.insert("income_title".to_string(), "Provide a title or an amount".to_string());
        field_errors.insert("income_amount".to_string(), "Provide a title or an amount".to_string());
        Err(MutationError::Validation {
            message: "Please fill these fields".to_string(),
            field_errors,
        })
    }
}

/// Body of PUT /api/income/:id.
///
/// Only the fields listed here can be changed; anything else in the request
/// body (including `owner` and `id`) is dropped during deserialization.
/// Absent and null fields leave the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncomePatch {
    #[serde(default)]
    pub income_date: Option<NaiveDate>,
    #[serde(default)]
    pub income_title: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub income_amount: Option<Decimal>,
    #[serde(default)]
    pub income_receipt: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
}

impl IncomePatch {
    /// Parse a raw request body. An empty body is an empty patch.
    pub fn from_body(body: &[u8]) -> Result<Self, MutationError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body).map_err(|e| MutationError::InvalidBody(e.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.income_date.is_none()
            && self.income_title.is_none()
            && self.income_amount.is_none()
            && self.income_receipt.is_none()
            && self.category_id.is_none()
    }

    /// Merge onto an existing record. Never touches `id` or `owner`.
    pub fn apply_to(&self, income: &mut Income) {
        if let Some(date) = self.income_date {
            income.income_date = Some(date);
        }
        if let Some(title) = &self.income_title {
            income.income_title = Some(title.clone());
        }
        if let Some(amount) = self.income_amount {
            income.income_amount = Some(amount);
        }
        if let Some(receipt) = &self.income_receipt {
            income.income_receipt = Some(receipt.clone());
        }
        if let Some(category) = &self.category_id {
            income.category_id = Some(category.clone());
        }
    }
}

/// Record ids are UUIDs; anything else can never match a stored record.
pub fn parse_income_id(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id).ok()
}
