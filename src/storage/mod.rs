pub mod json_backend;
pub mod memory;
pub mod snapshot;

use crate::errors::StoreError;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Fixed keys under which the household book is persisted.
pub mod keys {
    use crate::domain::RecordKind;

    pub const RECORDS: &str = "financeData";
    pub const EXPENSE_CATEGORIES: &str = "expenseCategories";
    pub const INCOME_CATEGORIES: &str = "incomeCategories";
    pub const CATEGORY_COLORS: &str = "categoryColors";

    pub fn categories(kind: RecordKind) -> &'static str {
        match kind {
            RecordKind::Expense => EXPENSE_CATEGORIES,
            RecordKind::Income => INCOME_CATEGORIES,
        }
    }
}

/// Abstraction over blob stores addressed by string keys.
///
/// Writes must be visible to the next `get` and never partially applied.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        (**self).put(key, value)
    }
}

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;
