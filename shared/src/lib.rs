pub mod config;
pub mod errors;
pub mod submission;
pub mod telemetry;
pub mod types;

pub use config::{ClientConfig, IdentityConfig, ServiceConfig, StoreConfig};
pub use errors::{Result, ServiceError};
pub use submission::{CardSubmission, SubmissionFields};
pub use telemetry::{init_metrics, init_tracing, record_counter, record_timing};
pub use types::{
    AnnoySubType, CardFields, CardType, Identity, PersonalitySubType, StoredRecord,
};
