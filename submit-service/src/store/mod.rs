mod airtable;

pub use airtable::{AirtableFields, AirtableStore};

use async_trait::async_trait;
use shared::{Result, StoredRecord, SubmissionFields};

/// Destination for accepted submissions.
///
/// `create_record` is called once per accepted submission. Failures come back as
/// [`shared::ServiceError::Store`] carrying whatever status and message the provider sent.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn create_record(&self, fields: &SubmissionFields) -> Result<StoredRecord>;
}
