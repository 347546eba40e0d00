//! Domain types representing income and expense records.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::common::*;

/// Stable record identifier, unique within the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl RecordId {
    /// Allocates an identifier from a creation timestamp, bumped past every
    /// existing id so it never collides or goes backwards.
    pub fn allocate<I>(existing: I, now_millis: i64) -> Self
    where
        I: IntoIterator<Item = RecordId>,
    {
        let floor = existing
            .into_iter()
            .map(|id| id.0.saturating_add(1))
            .max()
            .unwrap_or(i64::MIN);
        RecordId(now_millis.max(floor))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a record adds to or takes from the household purse.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    #[default]
    Expense,
    Income,
}

impl RecordKind {
    pub const ALL: [RecordKind; 2] = [RecordKind::Expense, RecordKind::Income];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Expense => "expense",
            RecordKind::Income => "income",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "expense" => Some(RecordKind::Expense),
            "income" => Some(RecordKind::Income),
            _ => None,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Largest amount a record may carry (2^53 - 1, the integer range older
/// snapshots could represent exactly).
pub const MAX_AMOUNT: u64 = 9_007_199_254_740_991;

/// Category shown for stored records that lost theirs.
pub const UNKNOWN_CATEGORY: &str = "不明";

/// One financial event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub date: NaiveDate,
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: u64,
    #[serde(default = "unknown_category", deserialize_with = "deserialize_category")]
    pub category: String,
    #[serde(default)]
    pub memo: String,
    #[serde(rename = "type", default, deserialize_with = "deserialize_kind")]
    pub kind: RecordKind,
}

impl Record {
    pub fn has_memo(&self) -> bool {
        !self.memo.is_empty()
    }
}

impl Displayable for Record {
    fn display_label(&self) -> String {
        if self.has_memo() {
            format!("{} {} ({})", self.date, self.category, self.memo)
        } else {
            format!("{} {}", self.date, self.category)
        }
    }
}

/// Unvalidated input for a new record; `amount` is raw form text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDraft {
    pub date: NaiveDate,
    pub amount: Option<String>,
    pub category: String,
    pub memo: String,
    pub kind: RecordKind,
}

impl RecordDraft {
    pub fn new(
        kind: RecordKind,
        date: NaiveDate,
        amount: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            date,
            amount: Some(amount.into()),
            category: category.into(),
            memo: String::new(),
            kind,
        }
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }
}

/// Field-level changes applied by an edit. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    pub date: Option<NaiveDate>,
    pub amount: Option<String>,
    pub category: Option<String>,
    pub memo: Option<String>,
    pub kind: Option<RecordKind>,
}

impl RecordPatch {
    pub fn has_effect(&self) -> bool {
        self.date.is_some()
            || self.amount.is_some()
            || self.category.is_some()
            || self.memo.is_some()
            || self.kind.is_some()
    }
}

// Older snapshots stored whatever the form produced, so accept numeric
// strings and whole floats alongside integers.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredAmount {
    Whole(u64),
    Fractional(f64),
    Text(String),
}

fn deserialize_amount<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = match StoredAmount::deserialize(deserializer)? {
        StoredAmount::Whole(value) if value <= MAX_AMOUNT => return Ok(value),
        StoredAmount::Whole(value) => value as f64,
        StoredAmount::Fractional(value) => value,
        StoredAmount::Text(text) => {
            let trimmed = text.trim();
            if let Ok(value) = trimmed.parse::<u64>() {
                if value <= MAX_AMOUNT {
                    return Ok(value);
                }
            }
            trimmed
                .parse::<f64>()
                .map_err(|_| D::Error::custom(format!("invalid amount `{text}`")))?
        }
    };
    if value.is_finite() && value >= 0.0 && value <= MAX_AMOUNT as f64 {
        Ok(value.trunc() as u64)
    } else {
        Err(D::Error::custom(format!("invalid amount `{value}`")))
    }
}

fn unknown_category() -> String {
    UNKNOWN_CATEGORY.to_string()
}

// `null` and empty names read as the unknown category.
fn deserialize_category<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let name = Option::<String>::deserialize(deserializer)?;
    Ok(name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(unknown_category))
}

// Missing, `null` and empty types read as expenses.
fn deserialize_kind<'de, D>(deserializer: D) -> Result<RecordKind, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<String>::deserialize(deserializer)? {
        None => Ok(RecordKind::default()),
        Some(raw) if raw.is_empty() => Ok(RecordKind::default()),
        Some(raw) => RecordKind::parse(&raw)
            .ok_or_else(|| D::Error::custom(format!("unknown record type `{raw}`"))),
    }
}
