pub mod category_service;
pub mod record_service;
pub mod summary_service;

pub use category_service::CategoryService;
pub use record_service::RecordService;
pub use summary_service::SummaryService;

use crate::{
    domain::{category::ParseColorError, RecordId},
    errors::StoreError,
};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0}")]
    Validation(String),
    #[error("Record {0} not found")]
    NotFound(RecordId),
    #[error("Index {index} out of range for {len} categories")]
    InvalidIndex { index: usize, len: usize },
}

impl From<ParseColorError> for ServiceError {
    fn from(err: ParseColorError) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

impl ServiceError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ServiceError::Validation(_))
    }
}
