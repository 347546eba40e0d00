//! Render-ready projections of a month aggregate.
//!
//! Pure shape conversion: nothing here reads storage or applies business
//! rules beyond formatting.

pub mod calendar;
pub mod chart;
pub mod detail;
pub mod format;

pub use calendar::{calendar_cells, month_grid, CalendarCell, GridDay, MonthGrid};
pub use chart::{chart_series, ChartSeries};
pub use detail::{detail_list, display_sign, DetailGroup, LineItem};
pub use format::{date_label, format_amount, format_signed, format_yen, month_label};
