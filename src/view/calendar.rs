use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::domain::{MonthAggregate, YearMonth};

/// Per-day annotation; zero components are omitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CalendarCell {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expense: Option<u64>,
}

impl CalendarCell {
    pub fn is_empty(&self) -> bool {
        self.income.is_none() && self.expense.is_none()
    }
}

pub fn calendar_cells(aggregate: &MonthAggregate) -> BTreeMap<NaiveDate, CalendarCell> {
    aggregate
        .calendar_totals
        .iter()
        .map(|(date, totals)| {
            let cell = CalendarCell {
                income: (totals.income > 0).then_some(totals.income),
                expense: (totals.expense > 0).then_some(totals.expense),
            };
            (*date, cell)
        })
        .filter(|(_, cell)| !cell.is_empty())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridDay {
    pub date: NaiveDate,
    pub is_today: bool,
}

/// Sunday-first week rows; `None` marks padding before the 1st and after
/// the last day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    pub month: YearMonth,
    pub weeks: Vec<[Option<GridDay>; 7]>,
}

impl MonthGrid {
    pub fn days(&self) -> impl Iterator<Item = &GridDay> {
        self.weeks.iter().flat_map(|week| week.iter().flatten())
    }
}

pub fn month_grid(month: YearMonth, today: NaiveDate) -> MonthGrid {
    let first = month.first_day();
    let mut weeks = Vec::new();
    let mut week: [Option<GridDay>; 7] = [None; 7];
    let mut column = first.weekday().num_days_from_sunday() as usize;

    for offset in 0..month.days_in_month() {
        let date = first + chrono::Days::new(offset as u64);
        week[column] = Some(GridDay {
            date,
            is_today: date == today,
        });
        column += 1;
        if column == 7 {
            weeks.push(week);
            week = [None; 7];
            column = 0;
        }
    }
    if column > 0 {
        weeks.push(week);
    }
    MonthGrid { month, weeks }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn may_2024_starts_on_wednesday() {
        let month = YearMonth::new(2024, 4).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let grid = month_grid(month, today);
        assert_eq!(grid.weeks.len(), 5);
        assert!(grid.weeks[0][..3].iter().all(Option::is_none));
        assert_eq!(grid.weeks[0][3].unwrap().date.day(), 1);
        assert_eq!(grid.days().count(), 31);
        assert_eq!(grid.days().filter(|day| day.is_today).count(), 1);
        assert!(grid.weeks[4][6].is_none());
    }

    #[test]
    fn today_outside_month_marks_nothing() {
        let month = YearMonth::new(2024, 1).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let grid = month_grid(month, today);
        assert_eq!(grid.days().count(), 29);
        assert!(grid.days().all(|day| !day.is_today));
    }
}
