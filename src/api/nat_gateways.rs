use serde::Serialize;
use serde_json::{Value, json};

use super::{EmulatorState, describe_set, lifecycle, set_response};
use crate::core::{ApiError, ParamMap, Resource, Result, Tag};
use crate::filter::UnknownFilter;
use crate::ident;
use crate::page::DEFAULT_BOUNDS;
use crate::tags;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NatGatewayAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocation_id: Option<String>,
    pub private_ip: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NatGateway {
    pub nat_gateway_id: String,
    pub subnet_id: String,
    pub vpc_id: String,
    pub state: String,
    pub connectivity_type: String,
    pub create_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_time: Option<String>,
    pub nat_gateway_address_set: Vec<NatGatewayAddress>,
    pub tag_set: Vec<Tag>,
}

impl Resource for NatGateway {
    fn id(&self) -> &str {
        &self.nat_gateway_id
    }

    fn resource_type(&self) -> &'static str {
        "natgateway"
    }

    fn tags(&self) -> &[Tag] {
        &self.tag_set
    }

    fn tags_mut(&mut self) -> &mut Vec<Tag> {
        &mut self.tag_set
    }

    fn filter_attr(&self, name: &str) -> Option<Vec<String>> {
        match name {
            "nat-gateway-id" => Some(vec![self.nat_gateway_id.clone()]),
            "subnet-id" => Some(vec![self.subnet_id.clone()]),
            "vpc-id" => Some(vec![self.vpc_id.clone()]),
            "state" => Some(vec![self.state.clone()]),
            "connectivity-type" => Some(vec![self.connectivity_type.clone()]),
            _ => None,
        }
    }
}

fn not_found(id: &str) -> ApiError {
    ApiError::not_found(
        "NatGatewayNotFound",
        format!("NatGatewayId {id} does not exist"),
    )
}

pub fn create_nat_gateway(state: &mut EmulatorState, params: &ParamMap) -> Result<Value> {
    let subnet_id = params.require("SubnetId")?.to_string();
    let subnet = state.subnets.get(&subnet_id).ok_or_else(|| {
        ApiError::not_found(
            "InvalidSubnetID.NotFound",
            format!("The subnet ID '{subnet_id}' does not exist"),
        )
    })?;
    let vpc_id = subnet.vpc_id.clone();

    let connectivity_type = params.get("ConnectivityType").unwrap_or("public").to_string();
    if !["public", "private"].contains(&connectivity_type.as_str()) {
        return Err(ApiError::InvalidParameterValue(format!(
            "Value ({connectivity_type}) for parameter connectivityType is invalid."
        )));
    }
    let allocation_id = params.get("AllocationId").map(str::to_string);
    match (connectivity_type.as_str(), &allocation_id) {
        ("public", None) => {
            return Err(ApiError::MissingParameter("AllocationId".to_string()));
        }
        ("private", Some(_)) => {
            return Err(ApiError::InvalidParameterCombination(
                "AllocationId cannot be specified for a private NAT gateway.".to_string(),
            ));
        }
        _ => {}
    }
    let tag_set = tags::from_tag_specifications(params, "natgateway")?;
    params.dry_run()?;

    let nat_gateway_id = state.nat_gateways.allocate_id("nat");
    // One private address per gateway; the host part is derived from the
    // table size so addresses stay distinct within a run.
    let private_ip = format!("10.0.{}.{}", state.nat_gateways.len() / 250, state.nat_gateways.len() % 250 + 4);
    let nat = NatGateway {
        nat_gateway_id: nat_gateway_id.clone(),
        subnet_id,
        vpc_id,
        state: lifecycle::NAT_GATEWAY.settled().to_string(),
        connectivity_type,
        create_time: ident::timestamp(),
        delete_time: None,
        nat_gateway_address_set: vec![NatGatewayAddress {
            allocation_id,
            private_ip,
        }],
        tag_set,
    };
    state.nat_gateways.put(nat_gateway_id, nat.clone());

    let mut doc = serde_json::to_value(&nat)?;
    doc["state"] = json!(lifecycle::NAT_GATEWAY.reported());
    Ok(json!({ "natGateway": doc }))
}

/// The record is retained in state `deleted`, like the real API keeps
/// deleted gateways visible for a while.
pub fn delete_nat_gateway(state: &mut EmulatorState, params: &ParamMap) -> Result<Value> {
    let nat_gateway_id = params.require("NatGatewayId")?.to_string();
    if !state.nat_gateways.contains(&nat_gateway_id) {
        return Err(not_found(&nat_gateway_id));
    }
    params.dry_run()?;
    let nat = state
        .nat_gateways
        .get_mut(&nat_gateway_id)
        .ok_or_else(|| not_found(&nat_gateway_id))?;
    nat.state = "deleted".to_string();
    nat.delete_time = Some(ident::timestamp());
    Ok(json!({ "natGatewayId": nat_gateway_id }))
}

pub fn describe_nat_gateways(state: &EmulatorState, params: &ParamMap) -> Result<Value> {
    params.dry_run()?;
    let (docs, token) = describe_set(
        &state.nat_gateways,
        params,
        "NatGatewayId",
        not_found,
        UnknownFilter::Reject,
        DEFAULT_BOUNDS,
    )?;
    Ok(set_response("natGatewaySet", docs, token))
}
