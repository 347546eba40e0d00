use chrono::{Local, NaiveDate};

use crate::core::services::{
    CategoryService, RecordService, ServiceResult, SummaryService,
};
use crate::domain::{
    Color, FinanceState, MonthAggregate, Record, RecordDraft, RecordId, RecordKind, RecordPatch,
    YearMonth,
};
use crate::storage::{snapshot, KeyValueStore};

/// Facade that owns the household book, its storage backend, and the month
/// currently on screen.
///
/// Every entry point takes `&mut self`, so there is exactly one writer at a
/// time. After each successful mutation the current month is re-aggregated
/// from scratch and exposed through [`FinanceManager::current_view`].
pub struct FinanceManager {
    state: FinanceState,
    storage: Box<dyn KeyValueStore>,
    month: YearMonth,
    view: Option<MonthAggregate>,
}

impl FinanceManager {
    /// Loads the persisted book and opens on the current local month.
    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        let today = Local::now().date_naive();
        Self::open_at(storage, YearMonth::from_date(today))
    }

    pub fn open_at(storage: Box<dyn KeyValueStore>, month: YearMonth) -> Self {
        let state = snapshot::load_state(storage.as_ref());
        tracing::info!(records = state.records.len(), %month, "finance book opened");
        Self {
            state,
            storage,
            month,
            view: None,
        }
    }

    pub fn storage(&self) -> &dyn KeyValueStore {
        self.storage.as_ref()
    }

    pub fn state(&self) -> &FinanceState {
        &self.state
    }

    pub fn records(&self) -> &[Record] {
        &self.state.records
    }

    pub fn record(&self, id: RecordId) -> Option<&Record> {
        self.state.record(id)
    }

    pub fn categories(&self, kind: RecordKind) -> &[String] {
        CategoryService::list(&self.state, kind)
    }

    pub fn month(&self) -> YearMonth {
        self.month
    }

    /// Last aggregation of the current month, if one has been computed.
    pub fn current_view(&self) -> Option<&MonthAggregate> {
        self.view.as_ref()
    }

    pub fn create_record(&mut self, draft: RecordDraft) -> ServiceResult<Record> {
        let record = RecordService::create(&mut self.state, self.storage.as_ref(), draft)?;
        self.refresh_after_commit();
        Ok(record)
    }

    pub fn update_record(&mut self, id: RecordId, patch: RecordPatch) -> ServiceResult<Record> {
        let record = RecordService::update(&mut self.state, self.storage.as_ref(), id, patch)?;
        self.refresh_after_commit();
        Ok(record)
    }

    pub fn delete_record(&mut self, id: RecordId) -> ServiceResult<()> {
        RecordService::delete(&mut self.state, self.storage.as_ref(), id)?;
        self.refresh_after_commit();
        Ok(())
    }

    pub fn add_category(&mut self, kind: RecordKind, name: &str) -> ServiceResult<()> {
        CategoryService::add(&mut self.state, self.storage.as_ref(), kind, name)
    }

    pub fn remove_category(&mut self, kind: RecordKind, index: usize) -> ServiceResult<String> {
        CategoryService::remove_at(&mut self.state, self.storage.as_ref(), kind, index)
    }

    pub fn set_category_color(
        &mut self,
        kind: RecordKind,
        category: &str,
        color: Color,
    ) -> ServiceResult<()> {
        CategoryService::set_color(&mut self.state, self.storage.as_ref(), kind, category, color)?;
        self.refresh_after_commit();
        Ok(())
    }

    /// Aggregates an arbitrary month without moving the current view.
    pub fn aggregate(&mut self, month: YearMonth) -> ServiceResult<MonthAggregate> {
        SummaryService::aggregate(&mut self.state, self.storage.as_ref(), month)
    }

    /// Recomputes the current month's aggregation. On failure the cached
    /// view is cleared rather than left stale.
    pub fn refresh(&mut self) -> ServiceResult<&MonthAggregate> {
        match self.aggregate(self.month) {
            Ok(aggregate) => Ok(self.view.insert(aggregate)),
            Err(err) => {
                self.view = None;
                Err(err)
            }
        }
    }

    // The mutation is already persisted; a failed refresh must not turn it
    // into an error the caller would retry.
    fn refresh_after_commit(&mut self) {
        if let Err(err) = self.refresh() {
            tracing::warn!(month = %self.month, error = %err, "view refresh failed after commit");
        }
    }

    pub fn navigate_to(&mut self, month: YearMonth) -> ServiceResult<&MonthAggregate> {
        self.month = month;
        self.refresh()
    }

    pub fn navigate_to_date(&mut self, date: NaiveDate) -> ServiceResult<&MonthAggregate> {
        self.navigate_to(YearMonth::from_date(date))
    }

    pub fn previous_month(&mut self) -> ServiceResult<&MonthAggregate> {
        self.navigate_to(self.month.previous())
    }

    pub fn next_month(&mut self) -> ServiceResult<&MonthAggregate> {
        self.navigate_to(self.month.next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StoreError;
    use crate::storage::{keys, MemoryStore};

    /// Memory store that refuses every color map write.
    #[derive(Default)]
    struct ColorlessStore {
        inner: MemoryStore,
    }

    impl KeyValueStore for ColorlessStore {
        fn get(&self, key: &str) -> crate::storage::Result<Option<String>> {
            self.inner.get(key)
        }

        fn put(&self, key: &str, value: &str) -> crate::storage::Result<()> {
            if key == keys::CATEGORY_COLORS {
                return Err(StoreError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "colors are read-only",
                )));
            }
            self.inner.put(key, value)
        }
    }

    fn manager() -> FinanceManager {
        FinanceManager::open_at(
            Box::new(MemoryStore::new()),
            YearMonth::new(2024, 4).unwrap(),
        )
    }

    #[test]
    fn mutations_refresh_the_current_view() {
        let mut manager = manager();
        assert!(manager.current_view().is_none());
        let date = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        manager
            .create_record(RecordDraft::new(RecordKind::Expense, date, "1000", "食費"))
            .unwrap();
        let view = manager.current_view().expect("view refreshed");
        assert_eq!(view.month_totals.expense, 1000);
    }

    #[test]
    fn navigation_moves_scope() {
        let mut manager = manager();
        let view = manager.next_month().unwrap();
        assert_eq!(view.month, YearMonth::new(2024, 5).unwrap());
        manager.previous_month().unwrap();
        manager.previous_month().unwrap();
        assert_eq!(manager.month(), YearMonth::new(2024, 3).unwrap());
    }

    #[test]
    fn committed_create_succeeds_when_view_refresh_fails() {
        let mut manager = FinanceManager::open_at(
            Box::new(ColorlessStore::default()),
            YearMonth::new(2024, 4).unwrap(),
        );
        manager.add_category(RecordKind::Expense, "旅費").unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let record = manager
            .create_record(RecordDraft::new(RecordKind::Expense, date, "100", "旅費"))
            .expect("record is committed even though the color write fails");

        assert_eq!(manager.records(), std::slice::from_ref(&record));
        let persisted = manager.storage().get(keys::RECORDS).unwrap().unwrap();
        assert!(persisted.contains("旅費"));
        assert!(manager.current_view().is_none());
        assert!(manager.refresh().is_err());

        manager
            .update_record(
                record.id,
                RecordPatch {
                    memo: Some("新幹線".into()),
                    ..RecordPatch::default()
                },
            )
            .expect("update is committed");
        assert_eq!(manager.record(record.id).unwrap().memo, "新幹線");
        manager.delete_record(record.id).expect("delete is committed");
        assert!(manager.records().is_empty());
    }
}
