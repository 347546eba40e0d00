use crate::domain::{
    category::{CategoryColors, CategoryLists},
    record::{Record, RecordId},
};

/// The complete in-memory household book: records, category lists, colors.
///
/// Services take this by reference; nothing reads it through globals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinanceState {
    pub records: Vec<Record>,
    pub categories: CategoryLists,
    pub colors: CategoryColors,
}

impl FinanceState {
    pub fn record(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.record(id).is_some()
    }
}
