use std::collections::HashMap;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mapper::Mapper;
use crate::transform::utc_timestamp;

/// Vendor fields carried through on each event, verbatim where scalar and
/// comma-joined where the source holds string arrays.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventExtensions {
    #[serde(rename = "@odata.type")]
    pub odata_type: String,
    pub created_date_time: String,
    pub verdict: String,
    pub remediation_status: String,
    pub remediation_status_details: String,
    pub roles: String,
    pub detailed_roles: String,
    pub tags: String,
}

/// One evidentiary item of a normalized alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityEvent {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub enisa_category: String,
    pub product: String,
    pub tags: HashMap<String, String>,
    pub extensions: EventExtensions,
}

impl SecurityEvent {
    /// Builds one event from an entry of the raw alert's `evidence` array.
    /// The event id always repeats the owning alert's id.
    pub fn from_evidence(evidence: &Mapper<'_>, alert_id: &str) -> Result<Self> {
        Ok(SecurityEvent {
            event_id: alert_id.to_string(),
            timestamp: evidence.transform("createdDateTime", utc_timestamp)?,
            enisa_category: "Other".to_string(),
            product: "Microsoft".to_string(),
            tags: HashMap::from([("technology".to_string(), "Microsoft".to_string())]),
            extensions: EventExtensions {
                // the key itself contains a dot, so path splitting is disabled
                odata_type: evidence.get_str_at("@odata.type", '*')?,
                created_date_time: evidence.get_str("createdDateTime")?,
                verdict: evidence.get_str("verdict")?,
                remediation_status: evidence.get_str("remediationStatus")?,
                remediation_status_details: evidence.get_str("remediationStatusDetails")?,
                roles: evidence.get_str_list("roles")?.join(", "),
                detailed_roles: evidence.get_str_list("detailedRoles")?.join(", "),
                tags: evidence.get_str_list("tags")?.join(", "),
            },
        })
    }
}
