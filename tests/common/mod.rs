#![allow(dead_code)]

use std::sync::Mutex;

use chrono::NaiveDate;
use kakeibo_core::{
    config::ConfigManager,
    core::FinanceManager,
    domain::YearMonth,
    storage::{JsonFileStore, MemoryStore},
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated data directory that outlives the calling test.
pub fn temp_base() -> std::path::PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates a file-backed manager and config manager in a unique directory.
pub fn setup_test_env(month: YearMonth) -> (FinanceManager, ConfigManager) {
    let base = temp_base();
    let store = JsonFileStore::new(Some(base.join("data"))).expect("create json store");
    let manager = FinanceManager::open_at(Box::new(store), month);
    let config_manager =
        ConfigManager::with_base_dir(base).expect("create config manager for temp dir");
    (manager, config_manager)
}

pub fn memory_manager(month: YearMonth) -> FinanceManager {
    FinanceManager::open_at(Box::new(MemoryStore::new()), month)
}

pub fn ym(year: i32, month0: u32) -> YearMonth {
    YearMonth::new(year, month0).expect("valid month")
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}
