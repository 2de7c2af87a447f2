use serde::{Deserialize, Serialize};

use crate::alert::SecurityAlert;
use crate::config::RoutingConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Service {
    Security,
}

/// Ticket lifecycle verbs understood by the action queue. This flow only
/// ever emits `Create`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Create,
    Update,
    Close,
}

/// One queued operation against the ticketing system. Field names follow
/// the queue's wire contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketAction {
    #[serde(rename = "sistemaorigen")]
    pub origin_system: String,
    #[serde(rename = "operacion")]
    pub operation: Action,
    #[serde(rename = "securityalerts")]
    pub security_alert: SecurityAlert,
}

impl TicketAction {
    pub fn create(alert: SecurityAlert) -> Self {
        TicketAction {
            origin_system: "Microsoft Graph Security".to_string(),
            operation: Action::Create,
            security_alert: alert,
        }
    }
}

/// The output envelope consumed downstream: routing identifiers plus the
/// nested alert and queued action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomFields {
    #[serde(rename = "clientid")]
    pub client_id: u64,
    #[serde(rename = "ticketsource")]
    pub ticket_source: String,
    #[serde(rename = "socid")]
    pub soc_id: String,
    #[serde(rename = "tenantid")]
    pub tenant_id: String,
    pub service: Service,
    pub operation: Action,
    #[serde(rename = "ticketactionqueue")]
    pub ticket_action_queue: TicketAction,
    #[serde(rename = "securityalerts")]
    pub security_alerts: SecurityAlert,
}

impl CustomFields {
    pub fn new(routing: &RoutingConfig, action: TicketAction, alert: SecurityAlert) -> Self {
        CustomFields {
            client_id: routing.client_id,
            ticket_source: "M365_Alert".to_string(),
            soc_id: routing.soc_id.clone(),
            tenant_id: routing.tenant_id.clone(),
            service: Service::Security,
            operation: Action::Create,
            ticket_action_queue: action,
            security_alerts: alert,
        }
    }
}
