use serde::Serialize;
use serde_json::{Value, json};

use super::{EmulatorState, describe_set, lifecycle, set_response};
use crate::core::{ApiError, ParamMap, Resource, Result, Tag};
use crate::filter::UnknownFilter;
use crate::page::DEFAULT_BOUNDS;
use crate::tags;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterface {
    pub network_interface_id: String,
    pub subnet_id: String,
    pub vpc_id: String,
    pub availability_zone: String,
    pub description: String,
    pub status: String,
    pub mac_address: String,
    pub private_ip_address: String,
    pub source_dest_check: bool,
    /// IDs of the attached security groups.
    pub group_set: Vec<String>,
    pub tag_set: Vec<Tag>,
}

impl Resource for NetworkInterface {
    fn id(&self) -> &str {
        &self.network_interface_id
    }

    fn resource_type(&self) -> &'static str {
        "network-interface"
    }

    fn tags(&self) -> &[Tag] {
        &self.tag_set
    }

    fn tags_mut(&mut self) -> &mut Vec<Tag> {
        &mut self.tag_set
    }

    fn filter_attr(&self, name: &str) -> Option<Vec<String>> {
        match name {
            "network-interface-id" => Some(vec![self.network_interface_id.clone()]),
            "subnet-id" => Some(vec![self.subnet_id.clone()]),
            "vpc-id" => Some(vec![self.vpc_id.clone()]),
            "availability-zone" => Some(vec![self.availability_zone.clone()]),
            "description" => Some(vec![self.description.clone()]),
            "status" => Some(vec![self.status.clone()]),
            "mac-address" => Some(vec![self.mac_address.clone()]),
            "private-ip-address" | "addresses.private-ip-address" => {
                Some(vec![self.private_ip_address.clone()])
            }
            "source-dest-check" => Some(vec![self.source_dest_check.to_string()]),
            "group-id" => Some(self.group_set.clone()),
            _ => None,
        }
    }
}

fn not_found(id: &str) -> ApiError {
    ApiError::not_found(
        "InvalidNetworkInterfaceID.NotFound",
        format!("The networkInterface ID '{id}' does not exist"),
    )
}

pub fn create_network_interface(state: &mut EmulatorState, params: &ParamMap) -> Result<Value> {
    let subnet_id = params.require("SubnetId")?.to_string();
    let subnet = state.subnets.get(&subnet_id).ok_or_else(|| {
        ApiError::not_found(
            "InvalidSubnetID.NotFound",
            format!("The subnet ID '{subnet_id}' does not exist"),
        )
    })?;
    let vpc_id = subnet.vpc_id.clone();
    let availability_zone = subnet.availability_zone.clone();

    let group_set = params.indexed_values("SecurityGroupId");
    for group_id in &group_set {
        if !state.security_groups.contains(group_id) {
            return Err(ApiError::not_found(
                "InvalidGroup.NotFound",
                format!("The security group '{group_id}' does not exist"),
            ));
        }
    }
    let description = params.get("Description").unwrap_or("").to_string();
    let private_ip_address = match params.get("PrivateIpAddress") {
        Some(ip) => {
            ip.parse::<std::net::Ipv4Addr>().map_err(|_| {
                ApiError::InvalidParameterValue(format!(
                    "Value ({ip}) for parameter privateIpAddress is invalid."
                ))
            })?;
            ip.to_string()
        }
        // Derived from the table size so addresses stay distinct within a run.
        None => format!(
            "10.0.{}.{}",
            state.network_interfaces.len() / 250,
            state.network_interfaces.len() % 250 + 4
        ),
    };
    let tag_set = tags::from_tag_specifications(params, "network-interface")?;
    params.dry_run()?;

    let network_interface_id = state.network_interfaces.allocate_id("eni");
    let mac_address = derive_mac(&network_interface_id);
    let eni = NetworkInterface {
        network_interface_id: network_interface_id.clone(),
        subnet_id,
        vpc_id,
        availability_zone,
        description,
        status: lifecycle::NETWORK_INTERFACE.settled().to_string(),
        mac_address,
        private_ip_address,
        source_dest_check: true,
        group_set,
        tag_set,
    };
    state.network_interfaces.put(network_interface_id, eni.clone());

    let mut doc = serde_json::to_value(&eni)?;
    doc["status"] = json!(lifecycle::NETWORK_INTERFACE.reported());
    Ok(json!({ "networkInterface": doc }))
}

/// A locally-administered MAC address derived from the interface ID's hex
/// suffix, stable for the record's lifetime.
fn derive_mac(network_interface_id: &str) -> String {
    let hex: String = network_interface_id
        .chars()
        .filter(char::is_ascii_hexdigit)
        .take(10)
        .collect();
    let padded = format!("{hex:0<10}");
    format!(
        "02:{}:{}:{}:{}:{}",
        &padded[0..2],
        &padded[2..4],
        &padded[4..6],
        &padded[6..8],
        &padded[8..10]
    )
}

pub fn delete_network_interface(state: &mut EmulatorState, params: &ParamMap) -> Result<Value> {
    let network_interface_id = params.require("NetworkInterfaceId")?.to_string();
    if !state.network_interfaces.contains(&network_interface_id) {
        return Err(not_found(&network_interface_id));
    }
    params.dry_run()?;
    state.network_interfaces.delete(&network_interface_id);
    Ok(json!({ "return": true }))
}

pub fn describe_network_interfaces(state: &EmulatorState, params: &ParamMap) -> Result<Value> {
    params.dry_run()?;
    let (docs, token) = describe_set(
        &state.network_interfaces,
        params,
        "NetworkInterfaceId",
        not_found,
        UnknownFilter::Ignore,
        DEFAULT_BOUNDS,
    )?;
    Ok(set_response("networkInterfaceSet", docs, token))
}
