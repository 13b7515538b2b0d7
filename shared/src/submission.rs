//! The card submission contract shared by the form and the submit service.
//!
//! [`SubmissionFields`] is the loose camelCase object that travels over the wire and
//! into the record store. [`CardSubmission`] is the validated form: it can only be
//! built when the identity, card type, sub-type, flaw name and terms agreement are
//! mutually consistent, and it always serializes back to a sparse field set.

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::{Result, ServiceError};
use crate::types::{CardFields, CardType, Identity};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(
        default,
        deserialize_with = "deserialize_fid",
        skip_serializing_if = "Option::is_none"
    )]
    pub farcaster_fid: Option<String>,

    #[serde(default, alias = "CardType", skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type_annoy: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type_personality: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flaw_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agreed_to_terms: Option<bool>,
}

// The sign-in widget reports FIDs as numbers, older clients forwarded them as strings.
fn deserialize_fid<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Fid {
        Text(String),
        Number(u64),
    }

    Ok(Option::<Fid>::deserialize(deserializer)?.map(|fid| match fid {
        Fid::Text(text) => text,
        Fid::Number(number) => number.to_string(),
    }))
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn invalid(reason: impl Into<String>) -> ServiceError {
    ServiceError::Validation(reason.into())
}

/// A submission whose fields have been checked against each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSubmission {
    identity: Identity,
    fields: CardFields,
    card_text: String,
}

impl CardSubmission {
    pub fn new(
        identity: Identity,
        fields: CardFields,
        card_text: impl Into<String>,
        agreed_to_terms: bool,
    ) -> Result<Self> {
        if !agreed_to_terms {
            return Err(invalid("Terms must be agreed to"));
        }

        let card_text = card_text.into().trim().to_string();
        if card_text.is_empty() {
            return Err(invalid("Card text is empty"));
        }

        Ok(Self {
            identity,
            fields,
            card_text,
        })
    }

    /// Validates an inbound payload.
    ///
    /// Checks run in a fixed order and stop at the first failure: identity,
    /// card type, terms agreement, then the card-type specific fields and text.
    pub fn from_fields(raw: &SubmissionFields) -> Result<Self> {
        let identity = match (present(&raw.email), present(&raw.farcaster_fid)) {
            (Some(email), None) => Identity::email(email)?,
            (None, Some(fid)) => Identity::farcaster_fid(fid)?,
            (Some(_), Some(_)) => return Err(invalid("Both email and farcasterFid were sent")),
            (None, None) => return Err(invalid("Neither email nor farcasterFid was sent")),
        };

        let card_type: CardType = present(&raw.card_type)
            .ok_or_else(|| invalid("cardType is missing"))?
            .parse()?;

        if raw.agreed_to_terms != Some(true) {
            return Err(invalid("agreedToTerms must be true"));
        }

        let annoy = present(&raw.sub_type_annoy);
        let personality = present(&raw.sub_type_personality);
        let flaw_name = present(&raw.flaw_name);

        let fields = match card_type {
            CardType::Annoy => {
                if personality.is_some() || flaw_name.is_some() {
                    return Err(invalid("Annoy cards only carry subTypeAnnoy"));
                }
                let sub_type = annoy.ok_or_else(|| invalid("subTypeAnnoy is missing"))?;
                CardFields::build(card_type, sub_type, None)?
            }
            CardType::Blame => {
                if annoy.is_some() || flaw_name.is_some() {
                    return Err(invalid("Blame cards only carry subTypePersonality"));
                }
                let sub_type = personality.ok_or_else(|| invalid("subTypePersonality is missing"))?;
                CardFields::build(card_type, sub_type, None)?
            }
            CardType::Flaw => {
                if annoy.is_some() {
                    return Err(invalid("Flaw cards do not carry subTypeAnnoy"));
                }
                let sub_type = personality.ok_or_else(|| invalid("subTypePersonality is missing"))?;
                let flaw_name = flaw_name.ok_or_else(|| invalid("flawName is missing"))?;
                CardFields::build(card_type, sub_type, Some(flaw_name))?
            }
        };

        let card_text = raw.card_text.clone().unwrap_or_default();

        Self::new(identity, fields, card_text, true)
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn fields(&self) -> &CardFields {
        &self.fields
    }

    pub fn card_type(&self) -> CardType {
        self.fields.card_type()
    }

    pub fn card_text(&self) -> &str {
        &self.card_text
    }

    /// Sparse field set: only the identity and card-type fields that apply are set.
    pub fn to_fields(&self) -> SubmissionFields {
        let mut out = SubmissionFields {
            card_type: Some(self.card_type().as_str().to_string()),
            card_text: Some(self.card_text.clone()),
            agreed_to_terms: Some(true),
            ..Default::default()
        };

        match &self.identity {
            Identity::Email(address) => out.email = Some(address.clone()),
            Identity::FarcasterFid(fid) => out.farcaster_fid = Some(fid.clone()),
        }

        match &self.fields {
            CardFields::Annoy { sub_type } => {
                out.sub_type_annoy = Some(sub_type.as_str().to_string());
            }
            CardFields::Blame { sub_type } => {
                out.sub_type_personality = Some(sub_type.as_str().to_string());
            }
            CardFields::Flaw {
                sub_type,
                flaw_name,
            } => {
                out.sub_type_personality = Some(sub_type.as_str().to_string());
                out.flaw_name = Some(flaw_name.clone());
            }
        }

        out
    }
}
