pub mod category;
pub mod common;
pub mod record;
pub mod state;
pub mod summary;

pub use category::{CategoryColors, CategoryLists, Color};
pub use common::{Displayable, YearMonth};
pub use record::{
    Record, RecordDraft, RecordId, RecordKind, RecordPatch, MAX_AMOUNT, UNKNOWN_CATEGORY,
};
pub use state::FinanceState;
pub use summary::{
    CategoryRollup, CategoryTotal, DailyGroup, DayTotals, MonthAggregate, MonthTotals,
};
