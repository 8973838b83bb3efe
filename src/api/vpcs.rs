use serde::Serialize;
use serde_json::{Value, json};

use super::{EmulatorState, describe_set, lifecycle, set_response, validate_cidr};
use crate::config::EmulatorConfig;
use crate::core::{ApiError, ParamMap, Resource, Result, Tag};
use crate::filter::UnknownFilter;
use crate::page::DEFAULT_BOUNDS;
use crate::tags;

const TENANCIES: [&str; 3] = ["default", "dedicated", "host"];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vpc {
    pub vpc_id: String,
    pub state: String,
    pub cidr_block: String,
    pub instance_tenancy: String,
    pub is_default: bool,
    pub owner_id: String,
    pub tag_set: Vec<Tag>,
}

impl Resource for Vpc {
    fn id(&self) -> &str {
        &self.vpc_id
    }

    fn resource_type(&self) -> &'static str {
        "vpc"
    }

    fn tags(&self) -> &[Tag] {
        &self.tag_set
    }

    fn tags_mut(&mut self) -> &mut Vec<Tag> {
        &mut self.tag_set
    }

    fn filter_attr(&self, name: &str) -> Option<Vec<String>> {
        match name {
            "vpc-id" => Some(vec![self.vpc_id.clone()]),
            "state" => Some(vec![self.state.clone()]),
            "cidr" | "cidr-block" => Some(vec![self.cidr_block.clone()]),
            "is-default" => Some(vec![self.is_default.to_string()]),
            "owner-id" => Some(vec![self.owner_id.clone()]),
            _ => None,
        }
    }
}

fn not_found(id: &str) -> ApiError {
    ApiError::not_found(
        "InvalidVpcID.NotFound",
        format!("The vpc ID '{id}' does not exist"),
    )
}

pub fn create_vpc(
    state: &mut EmulatorState,
    config: &EmulatorConfig,
    params: &ParamMap,
) -> Result<Value> {
    let cidr_block = params.require("CidrBlock")?.to_string();
    validate_cidr(&cidr_block)?;
    let instance_tenancy = params.get("InstanceTenancy").unwrap_or("default").to_string();
    if !TENANCIES.contains(&instance_tenancy.as_str()) {
        return Err(ApiError::InvalidParameterValue(format!(
            "Value ({instance_tenancy}) for parameter instanceTenancy is invalid."
        )));
    }
    let tag_set = tags::from_tag_specifications(params, "vpc")?;
    params.dry_run()?;

    let vpc_id = state.vpcs.allocate_id("vpc");
    let vpc = Vpc {
        vpc_id: vpc_id.clone(),
        state: lifecycle::VPC.settled().to_string(),
        cidr_block,
        instance_tenancy,
        is_default: false,
        owner_id: config.account_id.clone(),
        tag_set,
    };
    state.vpcs.put(vpc_id, vpc.clone());

    let mut doc = serde_json::to_value(&vpc)?;
    doc["state"] = json!(lifecycle::VPC.reported());
    Ok(json!({ "vpc": doc }))
}

pub fn delete_vpc(state: &mut EmulatorState, params: &ParamMap) -> Result<Value> {
    let vpc_id = params.require("VpcId")?.to_string();
    if !state.vpcs.contains(&vpc_id) {
        return Err(not_found(&vpc_id));
    }
    let in_use = state.subnets.iter().any(|s| s.vpc_id == vpc_id)
        || state
            .security_groups
            .iter()
            .any(|g| g.vpc_id.as_deref() == Some(vpc_id.as_str()))
        || state.vpc_endpoints.iter().any(|e| e.vpc_id == vpc_id)
        || state
            .nat_gateways
            .iter()
            .any(|n| n.vpc_id == vpc_id && n.state != "deleted");
    if in_use {
        return Err(ApiError::DependencyViolation(format!(
            "The vpc '{vpc_id}' has dependencies and cannot be deleted."
        )));
    }
    params.dry_run()?;
    state.vpcs.delete(&vpc_id);
    Ok(json!({ "return": true }))
}

pub fn describe_vpcs(state: &EmulatorState, params: &ParamMap) -> Result<Value> {
    params.dry_run()?;
    let (docs, token) = describe_set(
        &state.vpcs,
        params,
        "VpcId",
        not_found,
        UnknownFilter::Ignore,
        DEFAULT_BOUNDS,
    )?;
    Ok(set_response("vpcSet", docs, token))
}
