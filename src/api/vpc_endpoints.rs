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
pub struct VpcEndpoint {
    pub vpc_endpoint_id: String,
    pub vpc_id: String,
    pub service_name: String,
    pub vpc_endpoint_type: String,
    pub state: String,
    pub creation_timestamp: String,
    pub route_table_id_set: Vec<String>,
    pub subnet_id_set: Vec<String>,
    pub tag_set: Vec<Tag>,
}

impl Resource for VpcEndpoint {
    fn id(&self) -> &str {
        &self.vpc_endpoint_id
    }

    fn resource_type(&self) -> &'static str {
        "vpc-endpoint"
    }

    fn tags(&self) -> &[Tag] {
        &self.tag_set
    }

    fn tags_mut(&mut self) -> &mut Vec<Tag> {
        &mut self.tag_set
    }

    fn filter_attr(&self, name: &str) -> Option<Vec<String>> {
        match name {
            "vpc-endpoint-id" => Some(vec![self.vpc_endpoint_id.clone()]),
            "vpc-id" => Some(vec![self.vpc_id.clone()]),
            "service-name" => Some(vec![self.service_name.clone()]),
            "vpc-endpoint-type" => Some(vec![self.vpc_endpoint_type.clone()]),
            "vpc-endpoint-state" => Some(vec![self.state.clone()]),
            _ => None,
        }
    }
}

fn not_found(id: &str) -> ApiError {
    ApiError::not_found(
        "InvalidVpcEndpointId.NotFound",
        format!("The VpcEndpoint Id '{id}' does not exist"),
    )
}

pub fn create_vpc_endpoint(state: &mut EmulatorState, params: &ParamMap) -> Result<Value> {
    let vpc_id = params.require("VpcId")?.to_string();
    if !state.vpcs.contains(&vpc_id) {
        return Err(ApiError::not_found(
            "InvalidVpcID.NotFound",
            format!("The vpc ID '{vpc_id}' does not exist"),
        ));
    }
    let service_name = params.require("ServiceName")?.to_string();
    if !service_name.starts_with("com.amazonaws.") {
        return Err(ApiError::InvalidParameterValue(format!(
            "Value ({service_name}) for parameter serviceName is invalid."
        )));
    }
    let vpc_endpoint_type = params.get("VpcEndpointType").unwrap_or("Gateway").to_string();
    if !["Gateway", "Interface", "GatewayLoadBalancer"].contains(&vpc_endpoint_type.as_str()) {
        return Err(ApiError::InvalidParameterValue(format!(
            "Value ({vpc_endpoint_type}) for parameter vpcEndpointType is invalid."
        )));
    }
    let subnet_ids = params.indexed_values("SubnetId");
    for subnet_id in &subnet_ids {
        if !state.subnets.contains(subnet_id) {
            return Err(ApiError::not_found(
                "InvalidSubnetID.NotFound",
                format!("The subnet ID '{subnet_id}' does not exist"),
            ));
        }
    }
    if vpc_endpoint_type == "Gateway" && !subnet_ids.is_empty() {
        return Err(ApiError::InvalidParameterCombination(
            "SubnetIds cannot be specified for a Gateway endpoint.".to_string(),
        ));
    }
    let route_table_ids = params.indexed_values("RouteTableId");
    let tag_set = tags::from_tag_specifications(params, "vpc-endpoint")?;
    params.dry_run()?;

    let vpc_endpoint_id = state.vpc_endpoints.allocate_id("vpce");
    let endpoint = VpcEndpoint {
        vpc_endpoint_id: vpc_endpoint_id.clone(),
        vpc_id,
        service_name,
        vpc_endpoint_type,
        state: lifecycle::VPC_ENDPOINT.settled().to_string(),
        creation_timestamp: ident::timestamp(),
        route_table_id_set: route_table_ids,
        subnet_id_set: subnet_ids,
        tag_set,
    };
    state.vpc_endpoints.put(vpc_endpoint_id, endpoint.clone());

    let mut doc = serde_json::to_value(&endpoint)?;
    doc["state"] = json!(lifecycle::VPC_ENDPOINT.reported());
    Ok(json!({ "vpcEndpoint": doc }))
}

/// Batch delete; absent IDs succeed silently. The response's `unsuccessful`
/// list is therefore always empty, but the shape is kept.
pub fn delete_vpc_endpoints(state: &mut EmulatorState, params: &ParamMap) -> Result<Value> {
    let endpoint_ids = params.indexed_values("VpcEndpointId");
    if endpoint_ids.is_empty() {
        return Err(ApiError::MissingParameter("VpcEndpointId".to_string()));
    }
    params.dry_run()?;
    for id in &endpoint_ids {
        state.vpc_endpoints.delete(id);
    }
    Ok(json!({ "unsuccessful": [] }))
}

pub fn describe_vpc_endpoints(state: &EmulatorState, params: &ParamMap) -> Result<Value> {
    params.dry_run()?;
    let (docs, token) = describe_set(
        &state.vpc_endpoints,
        params,
        "VpcEndpointId",
        not_found,
        UnknownFilter::Reject,
        DEFAULT_BOUNDS,
    )?;
    Ok(set_response("vpcEndpointSet", docs, token))
}
