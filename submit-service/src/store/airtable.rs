use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use shared::{Result, ServiceError, StoreConfig, StoredRecord, SubmissionFields};

use super::RecordStore;

#[derive(Serialize)]
struct CreateRecordsRequest<'a> {
    records: [NewRecord<'a>; 1],
}

#[derive(Serialize)]
struct NewRecord<'a> {
    fields: AirtableFields<'a>,
}

/// Column layout of the submissions table. Same keys as the wire shape, except the
/// card type column which the table names `CardType`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AirtableFields<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farcaster_fid: Option<&'a str>,
    #[serde(rename = "CardType", skip_serializing_if = "Option::is_none")]
    pub card_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_type_annoy: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_type_personality: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flaw_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agreed_to_terms: Option<bool>,
}

impl<'a> From<&'a SubmissionFields> for AirtableFields<'a> {
    fn from(fields: &'a SubmissionFields) -> Self {
        Self {
            email: fields.email.as_deref(),
            farcaster_fid: fields.farcaster_fid.as_deref(),
            card_type: fields.card_type.as_deref(),
            sub_type_annoy: fields.sub_type_annoy.as_deref(),
            sub_type_personality: fields.sub_type_personality.as_deref(),
            flaw_name: fields.flaw_name.as_deref(),
            card_text: fields.card_text.as_deref(),
            agreed_to_terms: fields.agreed_to_terms,
        }
    }
}

#[derive(Deserialize)]
struct CreateRecordsResponse {
    #[serde(default)]
    records: Vec<StoredRecord>,
}

/// Airtable reports errors either as a bare string or as `{type, message}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Detailed { error: ErrorDetail },
    Code { error: String },
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    message: Option<String>,
}

/// [`RecordStore`] backed by the Airtable REST API.
#[derive(Clone)]
pub struct AirtableStore {
    http: reqwest::Client,
    api_key: String,
    table_url: Url,
}

impl AirtableStore {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let mut table_url = Url::parse(&config.endpoint_url).map_err(|e| {
            ServiceError::Config(format!("Invalid store endpoint {}: {}", config.endpoint_url, e))
        })?;

        table_url
            .path_segments_mut()
            .map_err(|_| {
                ServiceError::Config(format!(
                    "Store endpoint cannot be a base URL: {}",
                    config.endpoint_url
                ))
            })?
            .pop_if_empty()
            .extend(["v0", config.base_id.as_str(), config.table_name.as_str()]);

        let http = reqwest::Client::builder()
            .user_agent(concat!("card-submit/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ServiceError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(table_url = %table_url, "Airtable store configured");

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            table_url,
        })
    }

    pub fn table_url(&self) -> &Url {
        &self.table_url
    }
}

fn store_error(status: StatusCode, body: &str) -> ServiceError {
    let (message, explanation) = match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody::Detailed { error }) => {
            let message = error.message.unwrap_or_else(|| error.kind.clone());
            (message, Some(error.kind))
        }
        Ok(ErrorBody::Code { error }) => (error.clone(), Some(error)),
        Err(_) => {
            let reason = status.canonical_reason().unwrap_or("Unknown status");
            (format!("Record store returned HTTP {}: {}", status.as_u16(), reason), None)
        }
    };

    ServiceError::Store {
        status: Some(status.as_u16()),
        message,
        explanation,
    }
}

#[async_trait]
impl RecordStore for AirtableStore {
    async fn create_record(&self, fields: &SubmissionFields) -> Result<StoredRecord> {
        let request = CreateRecordsRequest {
            records: [NewRecord {
                fields: AirtableFields::from(fields),
            }],
        };

        let response = self
            .http
            .post(self.table_url.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ServiceError::store(format!("Record store request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::store(format!("Failed to read record store reply: {}", e)))?;

        if !status.is_success() {
            let error = store_error(status, &body);
            tracing::error!(
                status = status.as_u16(),
                error = %error,
                "Record store rejected create"
            );
            return Err(error);
        }

        let created: CreateRecordsResponse = serde_json::from_str(&body).map_err(|e| {
            ServiceError::store(format!("Invalid record store reply: {}", e))
        })?;

        let record = created
            .records
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::store("No records created"))?;

        tracing::debug!(record_id = %record.id, "Record created");

        Ok(record)
    }
}
