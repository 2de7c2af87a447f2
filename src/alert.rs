use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::RoutingConfig;
use crate::event::SecurityEvent;
use crate::mapper::Mapper;
use crate::severity::Severity;
use crate::transform::utc_timestamp;

/// Vendor metadata carried on the alert. Every field has a fixed default,
/// so the keys are always present in the output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertExtensions {
    pub tenant_id: String,
    pub alert_web_url: String,
    pub incident_web_url: String,
    pub category: String,
    pub description: String,
}

/// One normalized alert as the downstream ticketing system expects it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityAlert {
    pub client_id: u64,
    pub soc_id: String,
    pub tenant_id: String,
    pub source_id: String,
    pub severity: Severity,
    pub alert_id: String,
    pub source_alert_id: String,
    pub source_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorized_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<SecurityEvent>,
    pub name: String,
    pub extensions: AlertExtensions,
}

impl SecurityAlert {
    /// Builds the normalized alert from the raw Graph payload. Evidence
    /// entries become events in source order. Severity has no default:
    /// an absent or unrecognized label aborts the build.
    pub fn from_graph_alert(routing: &RoutingConfig, raw: &Mapper<'_>) -> Result<Self> {
        let alert_id = raw.get_str("id")?;
        let events = raw
            .entries("evidence")?
            .iter()
            .map(|evidence| SecurityEvent::from_evidence(evidence, &alert_id))
            .collect::<Result<Vec<_>>>()?;

        Ok(SecurityAlert {
            client_id: routing.client_id,
            soc_id: routing.soc_id.clone(),
            tenant_id: routing.tenant_id.clone(),
            source_id: raw.get_str("detectorId")?,
            severity: raw.transform("severity", Severity::from_label)?,
            alert_id: alert_id.clone(),
            source_alert_id: alert_id,
            source_type: "M365_PRUEBAS".to_string(),
            categorized_at: raw.transform_opt("createdDateTime", utc_timestamp)?,
            detected_at: raw.transform_opt("createdDateTime", utc_timestamp)?,
            updated_at: raw.transform_opt("lastUpdateDateTime", utc_timestamp)?,
            events,
            name: raw.get_str("title")?,
            extensions: AlertExtensions {
                tenant_id: raw.get_str_or("tenantId", "N/P")?,
                alert_web_url: raw.get_str_or("alertWebUrl", "N/P")?,
                incident_web_url: raw.get_str_or("incidentWebUrl", "")?,
                category: raw.get_str_or("category", "N/P")?,
                description: raw.get_str_or("description", "")?,
            },
        })
    }

    pub fn is_critical(&self) -> bool {
        self.severity >= Severity::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn build(raw: &str) -> Result<SecurityAlert> {
        let value: Value = serde_json::from_str(raw)?;
        SecurityAlert::from_graph_alert(&RoutingConfig::default(), &Mapper::new(&value))
    }

    #[test]
    fn test_informational_maps_to_lowest_tier() -> Result<()> {
        let alert = build(
            r#"{
                "id": "alert-7",
                "detectorId": "ab3f2e11-6c44-4543-92b5-7e1f9acbb8ff",
                "severity": "informational",
                "title": "Anonymous IP address sign-in",
                "createdDateTime": "2024-03-05T11:42:16.531244Z"
            }"#,
        )?;

        assert_eq!(alert.severity, Severity::Low);
        assert!(!alert.is_critical());
        Ok(())
    }

    #[test]
    fn test_events_repeat_alert_id_in_source_order() -> Result<()> {
        let alert = build(
            r##"{
                "id": "alert-7",
                "detectorId": "ab3f2e11-6c44-4543-92b5-7e1f9acbb8ff",
                "severity": "high",
                "title": "Anonymous IP address sign-in",
                "createdDateTime": "2024-03-05T11:42:16.531244Z",
                "evidence": [
                    {
                        "@odata.type": "#microsoft.graph.security.userEvidence",
                        "createdDateTime": "2024-03-05T11:42:16.531244Z",
                        "verdict": "suspicious",
                        "remediationStatus": "none",
                        "remediationStatusDetails": ""
                    },
                    {
                        "@odata.type": "#microsoft.graph.security.ipEvidence",
                        "createdDateTime": "2024-03-05T11:42:17.104501Z",
                        "verdict": "malicious",
                        "remediationStatus": "running",
                        "remediationStatusDetails": "isolation requested"
                    }
                ]
            }"##,
        )?;

        assert_eq!(alert.events.len(), 2);
        assert!(alert.events.iter().all(|event| event.event_id == "alert-7"));
        assert_eq!(
            alert.events[0].extensions.odata_type,
            "#microsoft.graph.security.userEvidence"
        );
        assert_eq!(
            alert.events[1].extensions.odata_type,
            "#microsoft.graph.security.ipEvidence"
        );
        assert!(alert.is_critical());
        Ok(())
    }

    #[test]
    fn test_missing_update_time_leaves_updated_at_none() -> Result<()> {
        let alert = build(
            r#"{
                "id": "alert-7",
                "detectorId": "ab3f2e11-6c44-4543-92b5-7e1f9acbb8ff",
                "severity": "medium",
                "title": "Anonymous IP address sign-in",
                "createdDateTime": "2024-03-05T11:42:16.531244Z"
            }"#,
        )?;

        let created: DateTime<Utc> = "2024-03-05T11:42:16.531244Z".parse()?;
        assert_eq!(alert.categorized_at, Some(created));
        assert_eq!(alert.detected_at, Some(created));
        assert_eq!(alert.updated_at, None);
        Ok(())
    }

    #[test]
    fn test_extension_defaults_apply() -> Result<()> {
        let alert = build(
            r#"{
                "id": "alert-7",
                "detectorId": "ab3f2e11-6c44-4543-92b5-7e1f9acbb8ff",
                "severity": "low",
                "title": "Anonymous IP address sign-in",
                "createdDateTime": "2024-03-05T11:42:16.531244Z"
            }"#,
        )?;

        assert_eq!(alert.extensions.tenant_id, "N/P");
        assert_eq!(alert.extensions.alert_web_url, "N/P");
        assert_eq!(alert.extensions.incident_web_url, "");
        assert_eq!(alert.extensions.category, "N/P");
        assert_eq!(alert.extensions.description, "");
        Ok(())
    }

    #[test]
    fn test_vendor_metadata_carried_when_present() -> Result<()> {
        let alert = build(
            r#"{
                "id": "alert-7",
                "detectorId": "ab3f2e11-6c44-4543-92b5-7e1f9acbb8ff",
                "severity": "low",
                "title": "Anonymous IP address sign-in",
                "createdDateTime": "2024-03-05T11:42:16.531244Z",
                "tenantId": "contoso-tenant",
                "alertWebUrl": "https://security.microsoft.com/alerts/alert-7",
                "incidentWebUrl": "https://security.microsoft.com/incidents/12",
                "category": "InitialAccess",
                "description": "Sign-in from a Tor exit node"
            }"#,
        )?;

        assert_eq!(alert.extensions.tenant_id, "contoso-tenant");
        assert_eq!(alert.extensions.category, "InitialAccess");
        assert_eq!(alert.extensions.description, "Sign-in from a Tor exit node");
        assert_eq!(alert.source_id, "ab3f2e11-6c44-4543-92b5-7e1f9acbb8ff");
        assert_eq!(alert.source_alert_id, "alert-7");
        assert_eq!(alert.source_type, "M365_PRUEBAS");
        Ok(())
    }

    #[test]
    fn test_missing_severity_aborts() {
        let err = build(
            r#"{
                "id": "alert-7",
                "detectorId": "ab3f2e11-6c44-4543-92b5-7e1f9acbb8ff",
                "title": "Anonymous IP address sign-in",
                "createdDateTime": "2024-03-05T11:42:16.531244Z"
            }"#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("missing required field 'severity'"));
    }

    #[test]
    fn test_malformed_update_time_is_an_error_not_none() {
        let err = build(
            r#"{
                "id": "alert-7",
                "detectorId": "ab3f2e11-6c44-4543-92b5-7e1f9acbb8ff",
                "severity": "high",
                "title": "Anonymous IP address sign-in",
                "createdDateTime": "2024-03-05T11:42:16.531244Z",
                "lastUpdateDateTime": "last tuesday"
            }"#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("invalid timestamp 'last tuesday'"));
    }

    #[test]
    fn test_serialization_omits_absent_fields() -> Result<()> {
        let alert = build(
            r#"{
                "id": "alert-7",
                "detectorId": "ab3f2e11-6c44-4543-92b5-7e1f9acbb8ff",
                "severity": "medium",
                "title": "Anonymous IP address sign-in",
                "createdDateTime": "2024-03-05T11:42:16.531244Z"
            }"#,
        )?;
        let json = serde_json::to_value(&alert)?;

        assert!(json.get("updatedAt").is_none());
        assert!(json.get("events").is_none());
        assert_eq!(json["categorizedAt"], "2024-03-05T11:42:16.531244Z");
        assert_eq!(json["severity"], "Medium");
        assert_eq!(json["sourceAlertId"], "alert-7");
        // defaulted extension keys stay present
        assert_eq!(json["extensions"]["description"], "");
        assert_eq!(json["extensions"]["tenantId"], "N/P");
        Ok(())
    }
}
