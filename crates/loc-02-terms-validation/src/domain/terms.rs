//! # Terms and Conditions
//!
//! License and classification records attached to collection items. Each
//! element references the LOC giving it legal basis.

use super::errors::TermsError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::{LocId, TermsRecord};
use std::fmt;
use std::str::FromStr;

/// Type tag of a logion classification.
pub const TC_LOGION_CLASSIFICATION: &str = "logion_classification";
/// Type tag of a Creative Commons license.
pub const TC_CREATIVE_COMMONS: &str = "creative_commons";
/// Type tag of a specific license.
pub const TC_SPECIFIC_LICENSE: &str = "specific_license";

/// Transferred-right codes of a logion classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransferredRight {
    /// Personal, private use.
    PersonalPrivate,
    /// Personal, public use.
    PersonalPublic,
    /// Commercial use.
    Commercial,
    /// Commercial use without modification.
    CommercialNoModification,
    /// Commercial use with modification.
    CommercialModification,
    /// Exclusive.
    Exclusive,
    /// Non-exclusive.
    NonExclusive,
    /// Worldwide.
    Worldwide,
    /// Limited to listed regions.
    Regional,
    /// No time limit.
    NoTime,
    /// Limited until an expiration date.
    Time,
}

/// Pairs of rights that cannot be transferred together.
pub const EXCLUSIVE_RIGHTS: [(TransferredRight, TransferredRight); 5] = [
    (TransferredRight::PersonalPrivate, TransferredRight::PersonalPublic),
    (
        TransferredRight::CommercialNoModification,
        TransferredRight::CommercialModification,
    ),
    (TransferredRight::Exclusive, TransferredRight::NonExclusive),
    (TransferredRight::Regional, TransferredRight::Worldwide),
    (TransferredRight::Time, TransferredRight::NoTime),
];

impl TransferredRight {
    /// Wire code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::PersonalPrivate => "PER-PRIV",
            Self::PersonalPublic => "PER-PUB",
            Self::Commercial => "COM",
            Self::CommercialNoModification => "COM-NOMOD",
            Self::CommercialModification => "COM-MOD",
            Self::Exclusive => "EX",
            Self::NonExclusive => "NOEX",
            Self::Worldwide => "WW",
            Self::Regional => "REG",
            Self::NoTime => "NOTIME",
            Self::Time => "TIME",
        }
    }
}

impl FromStr for TransferredRight {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "PER-PRIV" => Self::PersonalPrivate,
            "PER-PUB" => Self::PersonalPublic,
            "COM" => Self::Commercial,
            "COM-NOMOD" => Self::CommercialNoModification,
            "COM-MOD" => Self::CommercialModification,
            "EX" => Self::Exclusive,
            "NOEX" => Self::NonExclusive,
            "WW" => Self::Worldwide,
            "REG" => Self::Regional,
            "NOTIME" => Self::NoTime,
            "TIME" => Self::Time,
            other => return Err(other.to_string()),
        })
    }
}

impl fmt::Display for TransferredRight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Parameters of a logion classification, as carried in the details payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogionClassificationParams {
    /// Transferred-right codes.
    pub transferred_rights: Vec<String>,
    /// ISO-3166 alpha-2 country codes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regional_limit: Option<Vec<String>>,
    /// ISO-8601 expiration date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<String>,
}

impl LogionClassificationParams {
    /// JSON details payload. Absent limits are omitted.
    pub fn to_details(&self) -> String {
        let mut details = serde_json::Map::new();
        details.insert(
            "transferredRights".to_string(),
            Value::from(self.transferred_rights.clone()),
        );
        if let Some(regions) = &self.regional_limit {
            details.insert("regionalLimit".to_string(), Value::from(regions.clone()));
        }
        if let Some(expiration) = &self.expiration {
            details.insert("expiration".to_string(), Value::from(expiration.clone()));
        }
        Value::Object(details).to_string()
    }

    /// Params with the given rights only.
    pub fn with_rights(rights: &[TransferredRight]) -> Self {
        Self {
            transferred_rights: rights.iter().map(|r| r.code().to_string()).collect(),
            ..Self::default()
        }
    }
}

/// Creative Commons 4.0 license variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CreativeCommonsCode {
    /// Attribution.
    By,
    /// Attribution, share-alike.
    BySa,
    /// Attribution, non-commercial.
    ByNc,
    /// Attribution, non-commercial, share-alike.
    ByNcSa,
    /// Attribution, no derivatives.
    ByNd,
    /// Attribution, non-commercial, no derivatives.
    ByNcNd,
}

impl CreativeCommonsCode {
    /// Wire code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::By => "BY",
            Self::BySa => "BY-SA",
            Self::ByNc => "BY-NC",
            Self::ByNcSa => "BY-NC-SA",
            Self::ByNd => "BY-ND",
            Self::ByNcNd => "BY-NC-ND",
        }
    }
}

impl FromStr for CreativeCommonsCode {
    type Err = TermsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "BY" => Self::By,
            "BY-SA" => Self::BySa,
            "BY-NC" => Self::ByNc,
            "BY-NC-SA" => Self::ByNcSa,
            "BY-ND" => Self::ByNd,
            "BY-NC-ND" => Self::ByNcNd,
            other => {
                return Err(TermsError::InvalidDetails {
                    tc_type: TC_CREATIVE_COMMONS.to_string(),
                    reason: format!("unknown code {}", other),
                })
            }
        })
    }
}

impl fmt::Display for CreativeCommonsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A typed terms-and-conditions element. Travels in its wire form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TermsRecord", into = "TermsRecord")]
pub enum TermsAndConditionsElement {
    /// Logion classification.
    LogionClassification {
        /// Legal basis.
        tc_loc: LocId,
        /// Classification parameters.
        parameters: LogionClassificationParams,
    },
    /// Creative Commons license.
    CreativeCommons {
        /// Legal basis.
        tc_loc: LocId,
        /// License variant.
        code: CreativeCommonsCode,
    },
    /// License described in the referenced LOC.
    SpecificLicense {
        /// Legal basis.
        tc_loc: LocId,
        /// Free-text details.
        details: String,
    },
    /// Unknown type tag, kept as is.
    Unrecognized {
        /// Type tag.
        tc_type: String,
        /// Legal basis.
        tc_loc: LocId,
        /// Raw details.
        details: String,
    },
}

impl TermsAndConditionsElement {
    /// Decode the details payload according to the type tag.
    pub fn from_record(record: &TermsRecord) -> Result<Self, TermsError> {
        let tc_loc = record.tc_loc;
        match record.tc_type.as_str() {
            TC_LOGION_CLASSIFICATION => {
                let parameters = serde_json::from_str(&record.details).map_err(|e| {
                    TermsError::InvalidDetails {
                        tc_type: record.tc_type.clone(),
                        reason: e.to_string(),
                    }
                })?;
                Ok(Self::LogionClassification { tc_loc, parameters })
            }
            TC_CREATIVE_COMMONS => Ok(Self::CreativeCommons {
                tc_loc,
                code: record.details.parse()?,
            }),
            TC_SPECIFIC_LICENSE => Ok(Self::SpecificLicense {
                tc_loc,
                details: record.details.clone(),
            }),
            other => Ok(Self::Unrecognized {
                tc_type: other.to_string(),
                tc_loc,
                details: record.details.clone(),
            }),
        }
    }

    /// Decode a stored record. Details that do not decode for their type
    /// are kept raw as `Unrecognized`.
    pub fn from_stored(record: &TermsRecord) -> Self {
        Self::from_record(record).unwrap_or_else(|e| {
            tracing::warn!("[loc-02] Keeping undecodable terms raw: {}", e);
            Self::Unrecognized {
                tc_type: record.tc_type.clone(),
                tc_loc: record.tc_loc,
                details: record.details.clone(),
            }
        })
    }

    /// Wire form.
    pub fn to_record(&self) -> TermsRecord {
        let (tc_type, tc_loc, details) = match self {
            Self::LogionClassification { tc_loc, parameters } => (
                TC_LOGION_CLASSIFICATION.to_string(),
                *tc_loc,
                parameters.to_details(),
            ),
            Self::CreativeCommons { tc_loc, code } => (
                TC_CREATIVE_COMMONS.to_string(),
                *tc_loc,
                code.code().to_string(),
            ),
            Self::SpecificLicense { tc_loc, details } => {
                (TC_SPECIFIC_LICENSE.to_string(), *tc_loc, details.clone())
            }
            Self::Unrecognized {
                tc_type,
                tc_loc,
                details,
            } => (tc_type.clone(), *tc_loc, details.clone()),
        };
        TermsRecord {
            tc_type,
            tc_loc,
            details,
        }
    }

    /// Type tag.
    pub fn tc_type(&self) -> &str {
        match self {
            Self::LogionClassification { .. } => TC_LOGION_CLASSIFICATION,
            Self::CreativeCommons { .. } => TC_CREATIVE_COMMONS,
            Self::SpecificLicense { .. } => TC_SPECIFIC_LICENSE,
            Self::Unrecognized { tc_type, .. } => tc_type,
        }
    }

    /// LOC giving legal basis.
    pub fn tc_loc(&self) -> LocId {
        match self {
            Self::LogionClassification { tc_loc, .. }
            | Self::CreativeCommons { tc_loc, .. }
            | Self::SpecificLicense { tc_loc, .. }
            | Self::Unrecognized { tc_loc, .. } => *tc_loc,
        }
    }
}

impl From<TermsRecord> for TermsAndConditionsElement {
    fn from(record: TermsRecord) -> Self {
        Self::from_stored(&record)
    }
}

impl From<TermsAndConditionsElement> for TermsRecord {
    fn from(element: TermsAndConditionsElement) -> Self {
        element.to_record()
    }
}
