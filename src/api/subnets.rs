use serde::Serialize;
use serde_json::{Value, json};

use super::{EmulatorState, describe_set, lifecycle, set_response, validate_cidr};
use crate::config::EmulatorConfig;
use crate::core::{ApiError, ParamMap, Resource, Result, Tag};
use crate::filter::UnknownFilter;
use crate::page::DEFAULT_BOUNDS;
use crate::tags;

/// Addresses AWS reserves in every subnet (network, router, DNS, future
/// use, broadcast).
const RESERVED_ADDRESSES: i64 = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subnet {
    pub subnet_id: String,
    pub vpc_id: String,
    pub state: String,
    pub cidr_block: String,
    pub availability_zone: String,
    pub available_ip_address_count: i64,
    pub default_for_az: bool,
    pub map_public_ip_on_launch: bool,
    pub owner_id: String,
    pub tag_set: Vec<Tag>,
}

impl Resource for Subnet {
    fn id(&self) -> &str {
        &self.subnet_id
    }

    fn resource_type(&self) -> &'static str {
        "subnet"
    }

    fn tags(&self) -> &[Tag] {
        &self.tag_set
    }

    fn tags_mut(&mut self) -> &mut Vec<Tag> {
        &mut self.tag_set
    }

    fn filter_attr(&self, name: &str) -> Option<Vec<String>> {
        match name {
            "subnet-id" => Some(vec![self.subnet_id.clone()]),
            "vpc-id" => Some(vec![self.vpc_id.clone()]),
            "state" => Some(vec![self.state.clone()]),
            "cidr" | "cidr-block" => Some(vec![self.cidr_block.clone()]),
            "availability-zone" => Some(vec![self.availability_zone.clone()]),
            "default-for-az" => Some(vec![self.default_for_az.to_string()]),
            "owner-id" => Some(vec![self.owner_id.clone()]),
            _ => None,
        }
    }
}

fn not_found(id: &str) -> ApiError {
    ApiError::not_found(
        "InvalidSubnetID.NotFound",
        format!("The subnet ID '{id}' does not exist"),
    )
}

pub fn create_subnet(
    state: &mut EmulatorState,
    config: &EmulatorConfig,
    params: &ParamMap,
) -> Result<Value> {
    let vpc_id = params.require("VpcId")?.to_string();
    if !state.vpcs.contains(&vpc_id) {
        return Err(ApiError::not_found(
            "InvalidVpcID.NotFound",
            format!("The vpc ID '{vpc_id}' does not exist"),
        ));
    }
    let cidr_block = params.require("CidrBlock")?.to_string();
    let mask = validate_cidr(&cidr_block)?;
    let availability_zone = params
        .get("AvailabilityZone")
        .map(str::to_string)
        .unwrap_or_else(|| config.default_availability_zone());
    let tag_set = tags::from_tag_specifications(params, "subnet")?;
    params.dry_run()?;

    let host_bits = 32 - i64::from(mask);
    let available = i64::max((1i64 << host_bits) - RESERVED_ADDRESSES, 0);

    let subnet_id = state.subnets.allocate_id("subnet");
    let subnet = Subnet {
        subnet_id: subnet_id.clone(),
        vpc_id,
        state: lifecycle::SUBNET.settled().to_string(),
        cidr_block,
        availability_zone,
        available_ip_address_count: available,
        default_for_az: false,
        map_public_ip_on_launch: false,
        owner_id: config.account_id.clone(),
        tag_set,
    };
    state.subnets.put(subnet_id, subnet.clone());

    let mut doc = serde_json::to_value(&subnet)?;
    doc["state"] = json!(lifecycle::SUBNET.reported());
    Ok(json!({ "subnet": doc }))
}

pub fn delete_subnet(state: &mut EmulatorState, params: &ParamMap) -> Result<Value> {
    let subnet_id = params.require("SubnetId")?.to_string();
    if !state.subnets.contains(&subnet_id) {
        return Err(not_found(&subnet_id));
    }
    let in_use = state
        .network_interfaces
        .iter()
        .any(|eni| eni.subnet_id == subnet_id)
        || state
            .nat_gateways
            .iter()
            .any(|nat| nat.subnet_id == subnet_id && nat.state != "deleted");
    if in_use {
        return Err(ApiError::DependencyViolation(format!(
            "The subnet '{subnet_id}' has dependencies and cannot be deleted."
        )));
    }
    params.dry_run()?;
    state.subnets.delete(&subnet_id);
    Ok(json!({ "return": true }))
}

pub fn describe_subnets(state: &EmulatorState, params: &ParamMap) -> Result<Value> {
    params.dry_run()?;
    let (docs, token) = describe_set(
        &state.subnets,
        params,
        "SubnetId",
        not_found,
        UnknownFilter::Ignore,
        DEFAULT_BOUNDS,
    )?;
    Ok(set_response("subnetSet", docs, token))
}
