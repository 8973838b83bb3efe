use serde::Serialize;
use serde_json::{Value, json};

use super::{EmulatorState, describe_set, lifecycle, set_response};
use crate::core::{ApiError, ParamMap, Resource, Result, Tag};
use crate::filter::UnknownFilter;
use crate::page::DEFAULT_BOUNDS;
use crate::tags;

/// Private 16-bit ASN range accepted for the Amazon side.
const MIN_ASN: i64 = 64512;
const MAX_ASN: i64 = 65534;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteServer {
    pub route_server_id: String,
    pub amazon_side_asn: i64,
    pub state: String,
    pub persist_routes_state: String,
    pub sns_notifications_enabled: bool,
    pub tag_set: Vec<Tag>,
}

impl Resource for RouteServer {
    fn id(&self) -> &str {
        &self.route_server_id
    }

    fn resource_type(&self) -> &'static str {
        "route-server"
    }

    fn tags(&self) -> &[Tag] {
        &self.tag_set
    }

    fn tags_mut(&mut self) -> &mut Vec<Tag> {
        &mut self.tag_set
    }

    fn filter_attr(&self, name: &str) -> Option<Vec<String>> {
        match name {
            "route-server-id" => Some(vec![self.route_server_id.clone()]),
            "amazon-side-asn" => Some(vec![self.amazon_side_asn.to_string()]),
            "state" => Some(vec![self.state.clone()]),
            "persist-routes-state" => Some(vec![self.persist_routes_state.clone()]),
            _ => None,
        }
    }
}

fn not_found(id: &str) -> ApiError {
    ApiError::not_found(
        "InvalidRouteServerId.NotFound",
        format!("The route server ID '{id}' does not exist"),
    )
}

pub fn create_route_server(state: &mut EmulatorState, params: &ParamMap) -> Result<Value> {
    let amazon_side_asn = params.require_i64("AmazonSideAsn")?;
    if !(MIN_ASN..=MAX_ASN).contains(&amazon_side_asn) {
        return Err(ApiError::InvalidParameterValue(format!(
            "Value ({amazon_side_asn}) for parameter amazonSideAsn is invalid. \
             It must be between {MIN_ASN} and {MAX_ASN}."
        )));
    }
    let persist_routes = params.get("PersistRoutes").unwrap_or("disable").to_string();
    if !["enable", "disable"].contains(&persist_routes.as_str()) {
        return Err(ApiError::InvalidParameterValue(format!(
            "Value ({persist_routes}) for parameter persistRoutes is invalid."
        )));
    }
    let sns_notifications_enabled = params.get_bool("SnsNotificationsEnabled")?.unwrap_or(false);
    let tag_set = tags::from_tag_specifications(params, "route-server")?;
    params.dry_run()?;

    let route_server_id = state.route_servers.allocate_id("rs");
    let server = RouteServer {
        route_server_id: route_server_id.clone(),
        amazon_side_asn,
        state: lifecycle::ROUTE_SERVER.settled().to_string(),
        persist_routes_state: match persist_routes.as_str() {
            "enable" => "enabled".to_string(),
            _ => "disabled".to_string(),
        },
        sns_notifications_enabled,
        tag_set,
    };
    state.route_servers.put(route_server_id, server.clone());

    let mut doc = serde_json::to_value(&server)?;
    doc["state"] = json!(lifecycle::ROUTE_SERVER.reported());
    Ok(json!({ "routeServer": doc }))
}

pub fn delete_route_server(state: &mut EmulatorState, params: &ParamMap) -> Result<Value> {
    let route_server_id = params.require("RouteServerId")?.to_string();
    let server = state
        .route_servers
        .get(&route_server_id)
        .ok_or_else(|| not_found(&route_server_id))?;
    if server.state != "available" {
        return Err(ApiError::IncorrectState(format!(
            "Route server '{route_server_id}' is in state '{}' and cannot be deleted.",
            server.state
        )));
    }
    params.dry_run()?;
    let mut server = state
        .route_servers
        .delete(&route_server_id)
        .ok_or_else(|| not_found(&route_server_id))?;
    server.state = "deleting".to_string();
    Ok(json!({ "routeServer": serde_json::to_value(&server)? }))
}

pub fn describe_route_servers(state: &EmulatorState, params: &ParamMap) -> Result<Value> {
    params.dry_run()?;
    let (docs, token) = describe_set(
        &state.route_servers,
        params,
        "RouteServerId",
        not_found,
        UnknownFilter::Reject,
        DEFAULT_BOUNDS,
    )?;
    Ok(set_response("routeServerSet", docs, token))
}
