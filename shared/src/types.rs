use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::{Result, ServiceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Annoy,
    Blame,
    Flaw,
}

impl CardType {
    pub const ALL: [CardType; 3] = [CardType::Annoy, CardType::Blame, CardType::Flaw];

    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Annoy => "Annoy",
            CardType::Blame => "Blame",
            CardType::Flaw => "Flaw",
        }
    }

    /// Label of the sub-type picker shown for this card type.
    pub fn sub_type_label(&self) -> &'static str {
        match self {
            CardType::Annoy => "Annoy Type",
            CardType::Blame => "Blame a Flaw",
            CardType::Flaw => "Flaw Type",
        }
    }

    /// Names of the sub-types that may be chosen for this card type.
    pub fn sub_type_options(&self) -> &'static [&'static str] {
        match self {
            CardType::Annoy => AnnoySubType::NAMES,
            CardType::Blame | CardType::Flaw => PersonalitySubType::NAMES,
        }
    }

    pub fn text_placeholder(&self) -> &'static str {
        match self {
            CardType::Annoy => "e.g., \"I was sitting here first.\"",
            CardType::Blame => "e.g., \"My boss really hated your joke.\"",
            CardType::Flaw => "e.g., \"I'd be pissed if I were you.\"",
        }
    }
}

impl FromStr for CardType {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Annoy" => Ok(CardType::Annoy),
            "Blame" => Ok(CardType::Blame),
            "Flaw" => Ok(CardType::Flaw),
            other => Err(ServiceError::Validation(format!("Unknown card type: {}", other))),
        }
    }
}

impl std::fmt::Display for CardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnoySubType {
    Duck,
    Skip,
    Steal,
    Undo,
}

impl AnnoySubType {
    pub const NAMES: &'static [&'static str] = &["Duck", "Skip", "Steal", "Undo"];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnnoySubType::Duck => "Duck",
            AnnoySubType::Skip => "Skip",
            AnnoySubType::Steal => "Steal",
            AnnoySubType::Undo => "Undo",
        }
    }
}

impl FromStr for AnnoySubType {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Duck" => Ok(AnnoySubType::Duck),
            "Skip" => Ok(AnnoySubType::Skip),
            "Steal" => Ok(AnnoySubType::Steal),
            "Undo" => Ok(AnnoySubType::Undo),
            other => Err(ServiceError::Validation(format!("Unknown annoy sub-type: {}", other))),
        }
    }
}

impl std::fmt::Display for AnnoySubType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonalitySubType {
    Arrogant,
    Condescending,
    Meddling,
    Obnoxious,
    Odd,
    Tactless,
}

impl PersonalitySubType {
    pub const NAMES: &'static [&'static str] = &[
        "Arrogant",
        "Condescending",
        "Meddling",
        "Obnoxious",
        "Odd",
        "Tactless",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PersonalitySubType::Arrogant => "Arrogant",
            PersonalitySubType::Condescending => "Condescending",
            PersonalitySubType::Meddling => "Meddling",
            PersonalitySubType::Obnoxious => "Obnoxious",
            PersonalitySubType::Odd => "Odd",
            PersonalitySubType::Tactless => "Tactless",
        }
    }
}

impl FromStr for PersonalitySubType {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Arrogant" => Ok(PersonalitySubType::Arrogant),
            "Condescending" => Ok(PersonalitySubType::Condescending),
            "Meddling" => Ok(PersonalitySubType::Meddling),
            "Obnoxious" => Ok(PersonalitySubType::Obnoxious),
            "Odd" => Ok(PersonalitySubType::Odd),
            "Tactless" => Ok(PersonalitySubType::Tactless),
            other => Err(ServiceError::Validation(format!(
                "Unknown personality sub-type: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for PersonalitySubType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Proof of who submitted a card. Exactly one method is ever held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Email(String),
    FarcasterFid(String),
}

impl Identity {
    pub fn email(address: impl Into<String>) -> Result<Self> {
        let address = address.into().trim().to_string();
        if address.is_empty() || !address.contains('@') {
            return Err(ServiceError::Validation(format!(
                "Invalid email address: {:?}",
                address
            )));
        }
        Ok(Identity::Email(address))
    }

    pub fn farcaster_fid(fid: impl Into<String>) -> Result<Self> {
        let fid = fid.into().trim().to_string();
        if fid.is_empty() || !fid.chars().all(|c| c.is_ascii_digit()) {
            return Err(ServiceError::Validation(format!(
                "Farcaster FID must be numeric: {:?}",
                fid
            )));
        }
        Ok(Identity::FarcasterFid(fid))
    }

    pub fn method(&self) -> &'static str {
        match self {
            Identity::Email(_) => "email",
            Identity::FarcasterFid(_) => "farcaster",
        }
    }

    pub fn token(&self) -> &str {
        match self {
            Identity::Email(address) => address,
            Identity::FarcasterFid(fid) => fid,
        }
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Identity::Email(address) => write!(f, "{}", address),
            Identity::FarcasterFid(fid) => write!(f, "FID {}", fid),
        }
    }
}

/// Card metadata keyed by card type; each variant carries exactly its applicable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardFields {
    Annoy {
        sub_type: AnnoySubType,
    },
    Blame {
        sub_type: PersonalitySubType,
    },
    Flaw {
        sub_type: PersonalitySubType,
        flaw_name: String,
    },
}

impl CardFields {
    pub fn card_type(&self) -> CardType {
        match self {
            CardFields::Annoy { .. } => CardType::Annoy,
            CardFields::Blame { .. } => CardType::Blame,
            CardFields::Flaw { .. } => CardType::Flaw,
        }
    }

    /// Builds the variant for `card_type` from a free-form sub-type selection.
    pub fn build(card_type: CardType, sub_type: &str, flaw_name: Option<&str>) -> Result<Self> {
        match card_type {
            CardType::Annoy => Ok(CardFields::Annoy {
                sub_type: sub_type.parse()?,
            }),
            CardType::Blame => Ok(CardFields::Blame {
                sub_type: sub_type.parse()?,
            }),
            CardType::Flaw => {
                let flaw_name = flaw_name
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| ServiceError::Validation("Flaw cards need a flaw name".into()))?;
                Ok(CardFields::Flaw {
                    sub_type: sub_type.parse()?,
                    flaw_name: flaw_name.to_string(),
                })
            }
        }
    }

    pub fn sub_type_name(&self) -> &'static str {
        match self {
            CardFields::Annoy { sub_type } => sub_type.as_str(),
            CardFields::Blame { sub_type } | CardFields::Flaw { sub_type, .. } => sub_type.as_str(),
        }
    }
}

/// A record as persisted by the external store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
    #[serde(default)]
    pub fields: serde_json::Value,
}
