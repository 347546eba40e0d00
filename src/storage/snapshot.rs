//! Decoding and encoding of the persisted household book.
//!
//! Reads never fail: an absent, unreadable, or corrupt blob degrades to the
//! empty or built-in default value with a warning, so a damaged store can
//! always be opened.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::{
    category::{default_categories, CategoryColors, CategoryLists},
    Color, FinanceState, Record, RecordKind,
};

use super::{keys, KeyValueStore, Result};

/// Loads every persisted blob into a fresh state.
pub fn load_state(store: &dyn KeyValueStore) -> FinanceState {
    let records = load_records(store);
    let categories = CategoryLists::new(
        load_categories(store, RecordKind::Expense),
        load_categories(store, RecordKind::Income),
    );
    let colors = load_colors(store);
    tracing::debug!(records = records.len(), "household book loaded");
    FinanceState {
        records,
        categories,
        colors,
    }
}

/// Decodes the record collection entry by entry, skipping malformed entries
/// and duplicate ids.
pub fn load_records(store: &dyn KeyValueStore) -> Vec<Record> {
    let Some(entries) = read_json::<Vec<Value>>(store, keys::RECORDS) else {
        return Vec::new();
    };
    let mut records: Vec<Record> = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<Record>(entry) {
            Ok(record) if record.amount == 0 => {
                tracing::warn!(index, id = %record.id, "skipping stored record with zero amount");
            }
            Ok(record) if records.iter().any(|existing| existing.id == record.id) => {
                tracing::warn!(index, id = %record.id, "skipping stored record with duplicate id");
            }
            Ok(record) => records.push(record),
            Err(err) => {
                tracing::warn!(index, error = %err, "skipping malformed stored record");
            }
        }
    }
    records
}

pub fn load_categories(store: &dyn KeyValueStore, kind: RecordKind) -> Vec<String> {
    match read_json::<Vec<String>>(store, keys::categories(kind)) {
        Some(names) => {
            let mut unique: Vec<String> = Vec::with_capacity(names.len());
            for name in names {
                if !unique.contains(&name) {
                    unique.push(name);
                }
            }
            unique
        }
        None => default_categories(kind),
    }
}

/// Decodes the color map entry by entry, so one bad color drops only itself.
/// An absent or non-object blob yields the seeded defaults.
pub fn load_colors(store: &dyn KeyValueStore) -> CategoryColors {
    let Some(value) = read_json::<Value>(store, keys::CATEGORY_COLORS) else {
        return CategoryColors::default();
    };
    let Value::Object(kinds) = value else {
        tracing::warn!(key = keys::CATEGORY_COLORS, "stored color map is not an object, using defaults");
        return CategoryColors::default();
    };
    let mut colors = CategoryColors {
        expense: BTreeMap::new(),
        income: BTreeMap::new(),
    };
    for kind in RecordKind::ALL {
        let Some(entries) = kinds.get(kind.as_str()) else {
            continue;
        };
        let Some(entries) = entries.as_object() else {
            tracing::warn!(%kind, "skipping malformed stored color section");
            continue;
        };
        for (category, raw) in entries {
            match raw.as_str().map(str::parse::<Color>) {
                Some(Ok(color)) => colors.insert(kind, category.as_str(), color),
                _ => tracing::warn!(%kind, category = %category, "skipping malformed stored color"),
            }
        }
    }
    colors
}

pub fn save_records(store: &dyn KeyValueStore, records: &[Record]) -> Result<()> {
    write_json(store, keys::RECORDS, &records)
}

pub fn save_categories(store: &dyn KeyValueStore, kind: RecordKind, names: &[String]) -> Result<()> {
    write_json(store, keys::categories(kind), &names)
}

pub fn save_colors(store: &dyn KeyValueStore, colors: &CategoryColors) -> Result<()> {
    write_json(store, keys::CATEGORY_COLORS, colors)
}

fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            tracing::warn!(key, error = %err, "stored blob unreadable, using default");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        // Cleared keys are stored as `null`.
        Ok(Value::Null) => None,
        Ok(value) => match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                tracing::warn!(key, error = %err, "stored blob has unexpected shape, using default");
                None
            }
        },
        Err(err) => {
            tracing::warn!(key, error = %err, "stored blob is not valid JSON, using default");
            None
        }
    }
}

fn write_json<T: serde::Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let json = serde_json::to_string(value)?;
    store.put(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn empty_store_yields_defaults() {
        let store = MemoryStore::new();
        let state = load_state(&store);
        assert!(state.records.is_empty());
        assert_eq!(state.categories, CategoryLists::default());
        assert_eq!(state.colors, CategoryColors::default());
    }

    #[test]
    fn corrupt_blobs_degrade_to_defaults() {
        let store = MemoryStore::with_entries([
            (keys::RECORDS, "{not json"),
            (keys::EXPENSE_CATEGORIES, "42"),
            (keys::CATEGORY_COLORS, "[]"),
        ]);
        let state = load_state(&store);
        assert!(state.records.is_empty());
        assert_eq!(
            state.categories.get(RecordKind::Expense),
            default_categories(RecordKind::Expense).as_slice()
        );
        assert_eq!(state.colors, CategoryColors::default());
    }

    #[test]
    fn malformed_entries_are_skipped_individually() {
        let store = MemoryStore::with_entries([(
            keys::RECORDS,
            r#"[
                {"id":1,"date":"2024-05-10","amount":1000,"category":"食費","memo":"","type":"expense"},
                {"id":2,"date":"not-a-date","amount":5,"category":"食費","memo":"","type":"expense"},
                {"id":1,"date":"2024-05-11","amount":9,"category":"食費","memo":"","type":"expense"},
                {"id":3,"date":"2024-05-12","amount":0,"category":"食費","memo":"","type":"expense"}
            ]"#,
        )]);
        let records = load_records(&store);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].amount, 1000);
    }

    #[test]
    fn one_bad_color_keeps_the_rest() {
        let store = MemoryStore::with_entries([(
            keys::CATEGORY_COLORS,
            r##"{"expense":{"食費":"#010203","趣味":"purple"},"income":{"給料":"#0a0b0c"}}"##,
        )]);
        let colors = load_colors(&store);
        assert_eq!(colors.get(RecordKind::Expense, "食費").map(|c| c.to_hex()).as_deref(), Some("#010203"));
        assert_eq!(colors.get(RecordKind::Expense, "趣味"), None);
        assert_eq!(colors.get(RecordKind::Income, "給料").map(|c| c.to_hex()).as_deref(), Some("#0a0b0c"));
        assert_eq!(colors.expense.len(), 1);
    }

    #[test]
    fn null_blob_means_absent() {
        let store = MemoryStore::with_entries([(keys::INCOME_CATEGORIES, "null")]);
        assert_eq!(
            load_categories(&store, RecordKind::Income),
            default_categories(RecordKind::Income)
        );
    }

    #[test]
    fn saved_records_reload_identically() {
        let store = MemoryStore::new();
        let raw = r#"[{"id":1,"date":"2024-05-10","amount":1000,"category":"食費","memo":"昼","type":"expense"}]"#;
        let records: Vec<Record> = serde_json::from_str(raw).unwrap();
        save_records(&store, &records).unwrap();
        assert_eq!(load_records(&store), records);
    }
}
