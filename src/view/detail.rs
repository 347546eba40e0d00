use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{MonthAggregate, Record, RecordId, RecordKind};

use super::format::date_label;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    pub id: RecordId,
    pub category: String,
    pub memo: String,
    pub amount: u64,
    pub kind: RecordKind,
    pub display_sign: char,
}

impl LineItem {
    fn from_record(record: &Record) -> Self {
        Self {
            id: record.id,
            category: record.category.clone(),
            memo: record.memo.clone(),
            amount: record.amount,
            kind: record.kind,
            display_sign: display_sign(record.kind),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailGroup {
    pub date: NaiveDate,
    pub date_label: String,
    pub items: Vec<LineItem>,
}

pub fn display_sign(kind: RecordKind) -> char {
    match kind {
        RecordKind::Income => '＋',
        RecordKind::Expense => '－',
    }
}

/// Newest date first; income lines precede expense lines within a day.
pub fn detail_list(aggregate: &MonthAggregate) -> Vec<DetailGroup> {
    aggregate
        .daily_groups
        .iter()
        .map(|group| DetailGroup {
            date: group.date,
            date_label: date_label(group.date),
            items: group
                .income
                .iter()
                .chain(group.expense.iter())
                .map(LineItem::from_record)
                .collect(),
        })
        .collect()
}
