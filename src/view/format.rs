use chrono::{Datelike, NaiveDate};

use crate::domain::YearMonth;

/// Weekday names starting from Sunday, matching the calendar header order.
pub const WEEKDAY_LABELS: [&str; 7] = ["日", "月", "火", "水", "木", "金", "土"];

/// Groups digits in threes: `1234567` becomes `1,234,567`.
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_signed(amount: i64) -> String {
    let grouped = format_amount(amount.unsigned_abs());
    if amount < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

pub fn format_yen(amount: u64) -> String {
    format!("{}円", format_amount(amount))
}

/// Detail-list heading, e.g. `5月10日(金)`.
pub fn date_label(date: NaiveDate) -> String {
    let weekday = WEEKDAY_LABELS[date.weekday().num_days_from_sunday() as usize];
    format!("{}月{}日({})", date.month(), date.day(), weekday)
}

/// Month heading, e.g. `2024年5月`.
pub fn month_label(month: YearMonth) -> String {
    format!("{}年{}月", month.year(), month.month())
}
