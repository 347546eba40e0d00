//! Validated create/update/delete for household records.
//!
//! Every operation builds the complete next collection, persists it in one
//! write, and only then swaps it into the state, so a failed write leaves
//! both the store and the in-memory book untouched.

use chrono::Utc;

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::{FinanceState, Record, RecordDraft, RecordId, RecordPatch, MAX_AMOUNT};
use crate::storage::{snapshot, KeyValueStore};

/// Provides validated CRUD helpers for household records.
pub struct RecordService;

impl RecordService {
    /// Validates the draft, assigns a fresh id, and appends the record.
    pub fn create(
        state: &mut FinanceState,
        store: &dyn KeyValueStore,
        draft: RecordDraft,
    ) -> ServiceResult<Record> {
        let amount = parse_amount(draft.amount.as_deref())?;
        if !state.categories.contains(draft.kind, &draft.category) {
            return Err(ServiceError::Validation(format!(
                "Category `{}` is not registered for {}",
                draft.category, draft.kind
            )));
        }
        let id = RecordId::allocate(
            state.records.iter().map(|record| record.id),
            Utc::now().timestamp_millis(),
        );
        let record = Record {
            id,
            date: draft.date,
            amount,
            category: draft.category,
            memo: draft.memo,
            kind: draft.kind,
        };

        let mut next = state.records.clone();
        next.push(record.clone());
        snapshot::save_records(store, &next)?;
        state.records = next;
        tracing::info!(id = %record.id, kind = %record.kind, amount, "record created");
        Ok(record)
    }

    /// Applies `patch` to the record identified by `id`; the id never changes.
    ///
    /// The category is not checked against the registry here: edited records
    /// may keep or take categories that are no longer listed.
    pub fn update(
        state: &mut FinanceState,
        store: &dyn KeyValueStore,
        id: RecordId,
        patch: RecordPatch,
    ) -> ServiceResult<Record> {
        let index = state
            .records
            .iter()
            .position(|record| record.id == id)
            .ok_or(ServiceError::NotFound(id))?;
        let amount = match patch.amount.as_deref() {
            Some(raw) => Some(parse_amount(Some(raw))?),
            None => None,
        };

        let mut updated = state.records[index].clone();
        if let Some(date) = patch.date {
            updated.date = date;
        }
        if let Some(amount) = amount {
            updated.amount = amount;
        }
        if let Some(category) = patch.category {
            updated.category = category;
        }
        if let Some(memo) = patch.memo {
            updated.memo = memo;
        }
        if let Some(kind) = patch.kind {
            updated.kind = kind;
        }

        let mut next = state.records.clone();
        next[index] = updated.clone();
        snapshot::save_records(store, &next)?;
        state.records = next;
        tracing::info!(id = %id, "record updated");
        Ok(updated)
    }

    /// Removes the record if present. Deleting an unknown id is a no-op that
    /// still rewrites the (unchanged) collection.
    pub fn delete(
        state: &mut FinanceState,
        store: &dyn KeyValueStore,
        id: RecordId,
    ) -> ServiceResult<()> {
        let next: Vec<Record> = state
            .records
            .iter()
            .filter(|record| record.id != id)
            .cloned()
            .collect();
        let removed = next.len() != state.records.len();
        snapshot::save_records(store, &next)?;
        state.records = next;
        if removed {
            tracing::info!(id = %id, "record deleted");
        } else {
            tracing::debug!(id = %id, "delete ignored unknown record");
        }
        Ok(())
    }
}

/// Parses raw amount input into whole currency units.
///
/// Missing, blank, non-numeric, and numerically zero input (`"0"`, `"00"`,
/// `"0.0"`) are rejected, as are negative or fractional values.
pub fn parse_amount(raw: Option<&str>) -> ServiceResult<u64> {
    let text = raw.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(ServiceError::Validation("Amount is required".into()));
    }
    let value = match text.parse::<u64>() {
        Ok(value) => value as f64,
        Err(_) => text
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| ServiceError::Validation(format!("Amount `{text}` is not a number")))?,
    };
    if value == 0.0 {
        return Err(ServiceError::Validation("Amount must not be zero".into()));
    }
    if value < 0.0 || value.fract() != 0.0 {
        return Err(ServiceError::Validation(format!(
            "Amount `{text}` must be a positive whole number"
        )));
    }
    let amount = match text.parse::<u64>() {
        Ok(exact) => exact,
        Err(_) if value <= MAX_AMOUNT as f64 => value as u64,
        Err(_) => u64::MAX,
    };
    if amount > MAX_AMOUNT {
        return Err(ServiceError::Validation(format!(
            "Amount `{text}` exceeds {MAX_AMOUNT}"
        )));
    }
    Ok(amount)
}
