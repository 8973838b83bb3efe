use serde::Serialize;
use serde_json::{Value, json};

use super::{EmulatorState, validate_cidr};
use crate::config::EmulatorConfig;
use crate::core::{ApiError, ParamMap, Resource, Result, Tag};
use crate::filter::{self, UnknownFilter};
use crate::page::{self, DEFAULT_BOUNDS};
use crate::tags;

const PROTOCOLS: [&str; 4] = ["tcp", "udp", "icmp", "-1"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IpRange {
    pub cidr_ip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IpPermission {
    pub ip_protocol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_port: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_port: Option<i64>,
    pub ip_ranges: Vec<IpRange>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityGroup {
    pub group_id: String,
    pub group_name: String,
    pub group_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<String>,
    pub owner_id: String,
    pub ip_permissions: Vec<IpPermission>,
    pub ip_permissions_egress: Vec<IpPermission>,
    pub tag_set: Vec<Tag>,
}

impl Resource for SecurityGroup {
    fn id(&self) -> &str {
        &self.group_id
    }

    fn resource_type(&self) -> &'static str {
        "security-group"
    }

    fn tags(&self) -> &[Tag] {
        &self.tag_set
    }

    fn tags_mut(&mut self) -> &mut Vec<Tag> {
        &mut self.tag_set
    }

    fn filter_attr(&self, name: &str) -> Option<Vec<String>> {
        match name {
            "group-id" => Some(vec![self.group_id.clone()]),
            "group-name" => Some(vec![self.group_name.clone()]),
            "description" => Some(vec![self.group_description.clone()]),
            "vpc-id" => Some(self.vpc_id.iter().cloned().collect()),
            "owner-id" => Some(vec![self.owner_id.clone()]),
            "ip-permission.protocol" => Some(
                self.ip_permissions
                    .iter()
                    .map(|p| p.ip_protocol.clone())
                    .collect(),
            ),
            "ip-permission.cidr" => Some(
                self.ip_permissions
                    .iter()
                    .flat_map(|p| p.ip_ranges.iter().map(|r| r.cidr_ip.clone()))
                    .collect(),
            ),
            _ => None,
        }
    }
}

fn not_found(id: &str) -> ApiError {
    ApiError::not_found(
        "InvalidGroup.NotFound",
        format!("The security group '{id}' does not exist"),
    )
}

/// The default egress rule every new group carries: allow everything.
fn allow_all_egress() -> IpPermission {
    IpPermission {
        ip_protocol: "-1".to_string(),
        from_port: None,
        to_port: None,
        ip_ranges: vec![IpRange {
            cidr_ip: "0.0.0.0/0".to_string(),
        }],
    }
}

pub fn create_security_group(
    state: &mut EmulatorState,
    config: &EmulatorConfig,
    params: &ParamMap,
) -> Result<Value> {
    let group_name = params.require("GroupName")?.to_string();
    let group_description = params.require("GroupDescription")?.to_string();
    let vpc_id = params.get("VpcId").map(str::to_string);
    if let Some(ref vpc_id) = vpc_id {
        if !state.vpcs.contains(vpc_id) {
            return Err(ApiError::not_found(
                "InvalidVpcID.NotFound",
                format!("The vpc ID '{vpc_id}' does not exist"),
            ));
        }
    }
    let duplicate = state
        .security_groups
        .iter()
        .any(|g| g.group_name == group_name && g.vpc_id == vpc_id);
    if duplicate {
        return Err(ApiError::duplicate(
            "InvalidGroup.Duplicate",
            format!("The security group '{group_name}' already exists"),
        ));
    }
    let tag_set = tags::from_tag_specifications(params, "security-group")?;
    params.dry_run()?;

    let group_id = state.security_groups.allocate_id("sg");
    let group = SecurityGroup {
        group_id: group_id.clone(),
        group_name,
        group_description,
        vpc_id,
        owner_id: config.account_id.clone(),
        ip_permissions: Vec::new(),
        ip_permissions_egress: vec![allow_all_egress()],
        tag_set,
    };
    state.security_groups.put(group_id.clone(), group);

    Ok(json!({ "groupId": group_id, "return": true }))
}

pub fn delete_security_group(state: &mut EmulatorState, params: &ParamMap) -> Result<Value> {
    let group_id = match params.get("GroupId") {
        Some(id) => id.to_string(),
        None => {
            let group_name = params.get("GroupName").ok_or_else(|| {
                ApiError::MissingParameter("GroupId or GroupName".to_string())
            })?;
            state
                .security_groups
                .iter()
                .find(|g| g.group_name == group_name)
                .map(|g| g.group_id.clone())
                .ok_or_else(|| not_found(group_name))?
        }
    };
    if !state.security_groups.contains(&group_id) {
        return Err(not_found(&group_id));
    }
    let in_use = state
        .network_interfaces
        .iter()
        .any(|eni| eni.group_set.contains(&group_id));
    if in_use {
        return Err(ApiError::DependencyViolation(format!(
            "resource {group_id} has a dependent object"
        )));
    }
    params.dry_run()?;
    state.security_groups.delete(&group_id);
    Ok(json!({ "return": true }))
}

pub fn authorize_security_group_ingress(
    state: &mut EmulatorState,
    params: &ParamMap,
) -> Result<Value> {
    let group_id = params.require("GroupId")?.to_string();
    if !state.security_groups.contains(&group_id) {
        return Err(not_found(&group_id));
    }
    let permissions = parse_ip_permissions(params)?;
    if permissions.is_empty() {
        return Err(ApiError::MissingParameter("IpPermissions".to_string()));
    }
    let group = state
        .security_groups
        .get(&group_id)
        .ok_or_else(|| not_found(&group_id))?;
    for permission in &permissions {
        if group.ip_permissions.contains(permission) {
            return Err(ApiError::duplicate(
                "InvalidPermission.Duplicate",
                "the specified rule already exists".to_string(),
            ));
        }
    }
    params.dry_run()?;

    let group = state
        .security_groups
        .get_mut(&group_id)
        .ok_or_else(|| not_found(&group_id))?;
    group.ip_permissions.extend(permissions);
    Ok(json!({ "return": true }))
}

/// `IpPermissions.N` groups, or the legacy flat
/// `IpProtocol`/`FromPort`/`ToPort`/`CidrIp` form when no group is present.
fn parse_ip_permissions(params: &ParamMap) -> Result<Vec<IpPermission>> {
    let groups = params.indexed_groups("IpPermissions");
    if groups.is_empty() {
        return match params.get("IpProtocol") {
            None => Ok(Vec::new()),
            Some(_) => Ok(vec![build_permission(params)?]),
        };
    }
    groups.iter().map(build_permission).collect()
}

fn build_permission(group: &ParamMap) -> Result<IpPermission> {
    let ip_protocol = group.require("IpProtocol")?.to_string();
    if !PROTOCOLS.contains(&ip_protocol.as_str()) {
        return Err(ApiError::InvalidParameterValue(format!(
            "Value ({ip_protocol}) for parameter ipProtocol is invalid."
        )));
    }
    let from_port = group.get_i64("FromPort")?;
    let to_port = group.get_i64("ToPort")?;
    for port in [from_port, to_port].into_iter().flatten() {
        if !(0..=65535).contains(&port) {
            return Err(ApiError::InvalidParameterValue(format!(
                "Value ({port}) for parameter port is invalid. It must be between 0 and 65535."
            )));
        }
    }
    if let (Some(from), Some(to)) = (from_port, to_port) {
        if from > to {
            return Err(ApiError::InvalidParameterValue(format!(
                "Invalid port range: {from}-{to}."
            )));
        }
    }

    let mut cidrs: Vec<String> = group
        .indexed_groups("IpRanges")
        .iter()
        .filter_map(|r| r.get("CidrIp").map(str::to_string))
        .collect();
    if let Some(cidr) = group.get("CidrIp") {
        cidrs.push(cidr.to_string());
    }
    for cidr in &cidrs {
        validate_cidr(cidr)?;
    }
    Ok(IpPermission {
        ip_protocol,
        from_port,
        to_port,
        ip_ranges: cidrs.into_iter().map(|cidr_ip| IpRange { cidr_ip }).collect(),
    })
}

pub fn describe_security_groups(state: &EmulatorState, params: &ParamMap) -> Result<Value> {
    params.dry_run()?;
    let group_ids = params.indexed_values("GroupId");
    for id in &group_ids {
        if !state.security_groups.contains(id) {
            return Err(not_found(id));
        }
    }
    let group_names = params.indexed_values("GroupName");
    for name in &group_names {
        if !state.security_groups.iter().any(|g| &g.group_name == name) {
            return Err(not_found(name));
        }
    }

    let filters = filter::parse_filters(params)?;
    let mut docs = Vec::new();
    for group in state.security_groups.iter() {
        if !group_ids.is_empty() && !group_ids.contains(&group.group_id) {
            continue;
        }
        if !group_names.is_empty() && !group_names.contains(&group.group_name) {
            continue;
        }
        if !filter::matches(group, &filters, UnknownFilter::Ignore)? {
            continue;
        }
        docs.push(serde_json::to_value(group)?);
    }

    let (docs, token) = page::paginate(
        &docs,
        params.get_i64("MaxResults")?,
        params.get("NextToken"),
        DEFAULT_BOUNDS,
    )?;
    Ok(super::set_response("securityGroupInfo", docs, token))
}
