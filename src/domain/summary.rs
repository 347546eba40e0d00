use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{
    category::Color,
    common::YearMonth,
    record::{Record, RecordKind},
};

/// Income and expense totals for the month scope.
///
/// Sums saturate at `u64::MAX` and `net` at the `i64` bounds; record amounts
/// are capped so real books never get near either.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonthTotals {
    pub income: u64,
    pub expense: u64,
    pub net: i64,
}

impl MonthTotals {
    pub fn from_parts(income: u64, expense: u64) -> Self {
        Self {
            income,
            expense,
            net: net_of(income, expense),
        }
    }
}

fn net_of(income: u64, expense: u64) -> i64 {
    let net = i128::from(income) - i128::from(expense);
    i64::try_from(net).unwrap_or(if net < 0 { i64::MIN } else { i64::MAX })
}

/// Per-date sums used for calendar annotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DayTotals {
    pub income: u64,
    pub expense: u64,
}

impl DayTotals {
    pub fn add(&mut self, kind: RecordKind, amount: u64) {
        match kind {
            RecordKind::Income => self.income = self.income.saturating_add(amount),
            RecordKind::Expense => self.expense = self.expense.saturating_add(amount),
        }
    }
}

/// Records sharing one date, partitioned by kind in stored order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyGroup {
    pub date: NaiveDate,
    pub income: Vec<Record>,
    pub expense: Vec<Record>,
}

impl DailyGroup {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            income: Vec::new(),
            expense: Vec::new(),
        }
    }

    pub fn push(&mut self, record: Record) {
        match record.kind {
            RecordKind::Income => self.income.push(record),
            RecordKind::Expense => self.expense.push(record),
        }
    }

    pub fn len(&self) -> usize {
        self.income.len() + self.expense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: u64,
    pub color: Color,
}

/// Category sums for one kind, ordered by first appearance in the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRollup {
    pub kind: RecordKind,
    pub entries: Vec<CategoryTotal>,
}

impl CategoryRollup {
    pub fn total(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |sum, entry| sum.saturating_add(entry.total))
    }

    pub fn get(&self, category: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|entry| entry.category == category)
            .map(|entry| entry.total)
    }

    pub fn to_map(&self) -> BTreeMap<String, u64> {
        self.entries
            .iter()
            .map(|entry| (entry.category.clone(), entry.total))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything the views need for one month, recomputed on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthAggregate {
    pub month: YearMonth,
    /// Most recent date first.
    pub daily_groups: Vec<DailyGroup>,
    pub calendar_totals: BTreeMap<NaiveDate, DayTotals>,
    pub month_totals: MonthTotals,
    pub expense_categories: CategoryRollup,
    pub income_categories: CategoryRollup,
}

impl MonthAggregate {
    pub fn category_totals(&self, kind: RecordKind) -> &CategoryRollup {
        match kind {
            RecordKind::Expense => &self.expense_categories,
            RecordKind::Income => &self.income_categories,
        }
    }

    pub fn record_count(&self) -> usize {
        self.daily_groups.iter().map(DailyGroup::len).sum()
    }
}
