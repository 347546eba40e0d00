//! Month-scoped aggregation over the record collection.
//!
//! Everything here is recomputed from the full collection on each call; the
//! only write is color assignment for categories seen for the first time.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{
    CategoryRollup, CategoryTotal, DailyGroup, DayTotals, FinanceState, MonthAggregate,
    MonthTotals, Record, RecordKind, YearMonth,
};
use crate::storage::KeyValueStore;

use super::{CategoryService, ServiceResult};

pub struct SummaryService;

impl SummaryService {
    /// Records whose nominal date falls in `month`, in stored order.
    pub fn month_scope(records: &[Record], month: YearMonth) -> Vec<&Record> {
        records
            .iter()
            .filter(|record| month.contains(record.date))
            .collect()
    }

    /// Groups the month's records by date, newest date first. Within a date
    /// the income and expense lists keep stored order.
    pub fn daily_groups(records: &[Record], month: YearMonth) -> Vec<DailyGroup> {
        let mut by_date: BTreeMap<NaiveDate, DailyGroup> = BTreeMap::new();
        for record in Self::month_scope(records, month) {
            by_date
                .entry(record.date)
                .or_insert_with(|| DailyGroup::new(record.date))
                .push(record.clone());
        }
        by_date.into_values().rev().collect()
    }

    pub fn calendar_totals(records: &[Record], month: YearMonth) -> BTreeMap<NaiveDate, DayTotals> {
        let mut totals: BTreeMap<NaiveDate, DayTotals> = BTreeMap::new();
        for record in Self::month_scope(records, month) {
            totals
                .entry(record.date)
                .or_default()
                .add(record.kind, record.amount);
        }
        totals
    }

    pub fn month_totals(records: &[Record], month: YearMonth) -> MonthTotals {
        let (income, expense) = Self::month_scope(records, month).into_iter().fold(
            (0u64, 0u64),
            |(income, expense), record| match record.kind {
                RecordKind::Income => (income.saturating_add(record.amount), expense),
                RecordKind::Expense => (income, expense.saturating_add(record.amount)),
            },
        );
        MonthTotals::from_parts(income, expense)
    }

    /// Per-category sums for one kind, ordered by first appearance. Categories
    /// without records in the month are absent rather than zero.
    pub fn category_totals(
        records: &[Record],
        month: YearMonth,
        kind: RecordKind,
    ) -> Vec<(String, u64)> {
        let mut totals: Vec<(String, u64)> = Vec::new();
        for record in Self::month_scope(records, month)
            .into_iter()
            .filter(|record| record.kind == kind)
        {
            match totals.iter_mut().find(|(name, _)| *name == record.category) {
                Some((_, total)) => *total = total.saturating_add(record.amount),
                None => totals.push((record.category.clone(), record.amount)),
            }
        }
        totals
    }

    /// Category sums for one kind with their display colors resolved.
    pub fn category_rollup(
        state: &mut FinanceState,
        store: &dyn KeyValueStore,
        month: YearMonth,
        kind: RecordKind,
    ) -> ServiceResult<CategoryRollup> {
        let totals = Self::category_totals(&state.records, month, kind);
        let mut entries = Vec::with_capacity(totals.len());
        for (category, total) in totals {
            let color = CategoryService::resolve_color(state, store, kind, &category)?;
            entries.push(CategoryTotal {
                category,
                total,
                color,
            });
        }
        Ok(CategoryRollup { kind, entries })
    }

    /// Full aggregation for one month.
    pub fn aggregate(
        state: &mut FinanceState,
        store: &dyn KeyValueStore,
        month: YearMonth,
    ) -> ServiceResult<MonthAggregate> {
        let expense_categories =
            Self::category_rollup(state, store, month, RecordKind::Expense)?;
        let income_categories = Self::category_rollup(state, store, month, RecordKind::Income)?;
        let aggregate = MonthAggregate {
            month,
            daily_groups: Self::daily_groups(&state.records, month),
            calendar_totals: Self::calendar_totals(&state.records, month),
            month_totals: Self::month_totals(&state.records, month),
            expense_categories,
            income_categories,
        };
        tracing::debug!(
            %month,
            records = aggregate.record_count(),
            income = aggregate.month_totals.income,
            expense = aggregate.month_totals.expense,
            "month aggregated"
        );
        Ok(aggregate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RecordId;
    use crate::storage::{keys, MemoryStore};

    fn record(id: i64, date: (i32, u32, u32), amount: u64, category: &str, kind: RecordKind) -> Record {
        Record {
            id: RecordId(id),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            amount,
            category: category.into(),
            memo: String::new(),
            kind,
        }
    }

    fn may_2024() -> YearMonth {
        YearMonth::new(2024, 4).unwrap()
    }

    #[test]
    fn single_expense_month_totals() {
        let records = vec![record(1, (2024, 5, 10), 1000, "食費", RecordKind::Expense)];
        let totals = SummaryService::month_totals(&records, may_2024());
        assert_eq!(totals, MonthTotals { income: 0, expense: 1000, net: -1000 });
        let by_category = SummaryService::category_totals(&records, may_2024(), RecordKind::Expense);
        assert_eq!(by_category, vec![("食費".to_string(), 1000)]);
    }

    #[test]
    fn other_months_are_excluded() {
        let records = vec![
            record(1, (2024, 4, 30), 300, "食費", RecordKind::Expense),
            record(2, (2024, 5, 1), 500, "食費", RecordKind::Expense),
            record(3, (2023, 5, 1), 700, "給料", RecordKind::Income),
        ];
        let totals = SummaryService::month_totals(&records, may_2024());
        assert_eq!(totals.expense, 500);
        assert_eq!(totals.income, 0);
    }

    #[test]
    fn daily_groups_sort_newest_first_and_partition_by_kind() {
        let records = vec![
            record(1, (2024, 5, 3), 100, "食費", RecordKind::Expense),
            record(2, (2024, 5, 20), 200, "給料", RecordKind::Income),
            record(3, (2024, 5, 3), 300, "給料", RecordKind::Income),
            record(4, (2024, 5, 3), 400, "趣味", RecordKind::Expense),
        ];
        let groups = SummaryService::daily_groups(&records, may_2024());
        let dates: Vec<u32> = groups.iter().map(|g| chrono::Datelike::day(&g.date)).collect();
        assert_eq!(dates, vec![20, 3]);
        let third = &groups[1];
        assert_eq!(third.income.iter().map(|r| r.id.0).collect::<Vec<_>>(), vec![3]);
        assert_eq!(third.expense.iter().map(|r| r.id.0).collect::<Vec<_>>(), vec![1, 4]);
    }

    #[test]
    fn calendar_totals_split_income_and_expense() {
        let records = vec![
            record(1, (2024, 5, 8), 500, "給料", RecordKind::Income),
            record(2, (2024, 5, 8), 300, "食費", RecordKind::Expense),
        ];
        let totals = SummaryService::calendar_totals(&records, may_2024());
        let day = totals[&NaiveDate::from_ymd_opt(2024, 5, 8).unwrap()];
        assert_eq!(day, DayTotals { income: 500, expense: 300 });
    }

    #[test]
    fn category_totals_follow_first_appearance() {
        let records = vec![
            record(1, (2024, 5, 8), 100, "趣味", RecordKind::Expense),
            record(2, (2024, 5, 9), 200, "食費", RecordKind::Expense),
            record(3, (2024, 5, 10), 50, "趣味", RecordKind::Expense),
        ];
        let totals = SummaryService::category_totals(&records, may_2024(), RecordKind::Expense);
        assert_eq!(
            totals,
            vec![("趣味".to_string(), 150), ("食費".to_string(), 200)]
        );
    }

    #[test]
    fn aggregate_is_idempotent_and_assigns_colors_once() {
        let store = MemoryStore::new();
        let mut state = FinanceState {
            records: vec![
                record(1, (2024, 5, 8), 100, "旅費", RecordKind::Expense),
                record(2, (2024, 5, 9), 900, "賞与", RecordKind::Income),
            ],
            ..FinanceState::default()
        };
        let first = SummaryService::aggregate(&mut state, &store, may_2024()).unwrap();
        let colors_after_first = store.raw(keys::CATEGORY_COLORS).expect("colors persisted");
        let second = SummaryService::aggregate(&mut state, &store, may_2024()).unwrap();
        assert_eq!(first, second);
        assert_eq!(store.raw(keys::CATEGORY_COLORS), Some(colors_after_first));
    }

    #[test]
    fn category_sums_match_month_totals() {
        let store = MemoryStore::new();
        let mut state = FinanceState {
            records: vec![
                record(1, (2024, 5, 1), 120, "食費", RecordKind::Expense),
                record(2, (2024, 5, 2), 80, "交通費", RecordKind::Expense),
                record(3, (2024, 5, 2), 3000, "給料", RecordKind::Income),
                record(4, (2024, 5, 9), 40, "食費", RecordKind::Expense),
                record(5, (2024, 6, 1), 999, "食費", RecordKind::Expense),
            ],
            ..FinanceState::default()
        };
        let aggregate = SummaryService::aggregate(&mut state, &store, may_2024()).unwrap();
        assert_eq!(aggregate.expense_categories.total(), aggregate.month_totals.expense);
        assert_eq!(aggregate.income_categories.total(), aggregate.month_totals.income);
        assert_eq!(
            aggregate.month_totals.net,
            aggregate.month_totals.income as i64 - aggregate.month_totals.expense as i64
        );
    }
}
