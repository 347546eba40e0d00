//! Domain types for category lists and their display colors.

use std::{collections::BTreeMap, fmt, str::FromStr};

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::record::RecordKind;

pub const DEFAULT_EXPENSE_CATEGORIES: [&str; 5] = ["食費", "交通費", "衣服", "趣味", "その他"];
pub const DEFAULT_INCOME_CATEGORIES: [&str; 2] = ["給料", "その他"];

const DEFAULT_EXPENSE_COLORS: [(&str, u32); 5] = [
    ("食費", 0xff6384),
    ("交通費", 0x36a2eb),
    ("趣味", 0x4bc0c0),
    ("衣服", 0xffcd56),
    ("その他", 0x9966ff),
];
const DEFAULT_INCOME_COLORS: [(&str, u32); 2] = [("給料", 0x36a2eb), ("その他", 0xffcd56)];

/// Built-in category names for a record kind.
pub fn default_categories(kind: RecordKind) -> Vec<String> {
    let names: &[&str] = match kind {
        RecordKind::Expense => &DEFAULT_EXPENSE_CATEGORIES,
        RecordKind::Income => &DEFAULT_INCOME_CATEGORIES,
    };
    names.iter().map(|name| name.to_string()).collect()
}

/// Ordered, duplicate-free category names, one list per record kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLists {
    expense: Vec<String>,
    income: Vec<String>,
}

impl Default for CategoryLists {
    fn default() -> Self {
        Self {
            expense: default_categories(RecordKind::Expense),
            income: default_categories(RecordKind::Income),
        }
    }
}

impl CategoryLists {
    pub fn new(expense: Vec<String>, income: Vec<String>) -> Self {
        Self { expense, income }
    }

    pub fn get(&self, kind: RecordKind) -> &[String] {
        match kind {
            RecordKind::Expense => &self.expense,
            RecordKind::Income => &self.income,
        }
    }

    pub fn contains(&self, kind: RecordKind, name: &str) -> bool {
        self.get(kind).iter().any(|existing| existing == name)
    }

    /// Replaces one kind's list wholesale.
    pub fn set(&mut self, kind: RecordKind, names: Vec<String>) {
        match kind {
            RecordKind::Expense => self.expense = names,
            RecordKind::Income => self.income = names,
        }
    }
}

/// A 24-bit RGB display color, serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u32);

impl Color {
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Uniformly random over the full 24-bit range.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Color(rng.gen_range(0..=0x00ff_ffff))
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        ((self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8)
    }

    pub fn to_hex(&self) -> String {
        format!("#{:06x}", self.0)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color `{0}`")]
pub struct ParseColorError(pub String);

impl FromStr for Color {
    type Err = ParseColorError;

    /// Accepts `#rrggbb`, `#rgb`, and CSS `rgb(r, g, b)` notation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let err = || ParseColorError(s.to_string());
        if let Some(hex) = raw.strip_prefix('#') {
            if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(err());
            }
            return match hex.len() {
                6 => u32::from_str_radix(hex, 16).map(Color).map_err(|_| err()),
                3 => {
                    let expanded: String = hex.chars().flat_map(|c| [c, c]).collect();
                    u32::from_str_radix(&expanded, 16)
                        .map(Color)
                        .map_err(|_| err())
                }
                _ => Err(err()),
            };
        }
        let inner = raw
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(err)?;
        let channels: Vec<u8> = inner
            .split(',')
            .map(|part| part.trim().parse::<u8>())
            .collect::<Result<_, _>>()
            .map_err(|_| err())?;
        match channels.as_slice() {
            [r, g, b] => Ok(Color::from_rgb(*r, *g, *b)),
            _ => Err(err()),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Persisted (kind, category) to color associations.
///
/// Entries are never dropped when a category leaves the registry; stale
/// colors are simply unused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryColors {
    #[serde(default)]
    pub expense: BTreeMap<String, Color>,
    #[serde(default)]
    pub income: BTreeMap<String, Color>,
}

impl Default for CategoryColors {
    fn default() -> Self {
        let seed = |pairs: &[(&str, u32)]| {
            pairs
                .iter()
                .map(|(name, rgb)| (name.to_string(), Color(*rgb)))
                .collect()
        };
        Self {
            expense: seed(&DEFAULT_EXPENSE_COLORS),
            income: seed(&DEFAULT_INCOME_COLORS),
        }
    }
}

impl CategoryColors {
    pub fn get(&self, kind: RecordKind, category: &str) -> Option<Color> {
        self.for_kind(kind).get(category).copied()
    }

    pub fn insert(&mut self, kind: RecordKind, category: impl Into<String>, color: Color) {
        self.for_kind_mut(kind).insert(category.into(), color);
    }

    pub fn for_kind(&self, kind: RecordKind) -> &BTreeMap<String, Color> {
        match kind {
            RecordKind::Expense => &self.expense,
            RecordKind::Income => &self.income,
        }
    }

    fn for_kind_mut(&mut self, kind: RecordKind) -> &mut BTreeMap<String, Color> {
        match kind {
            RecordKind::Expense => &mut self.expense,
            RecordKind::Income => &mut self.income,
        }
    }
}
