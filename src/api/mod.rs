//! AWS-action handlers, one module per resource family, plus the dispatch
//! table and the filter/paginate/serialize plumbing every `Describe*`
//! handler shares.

pub mod customer_gateways;
pub mod lifecycle;
pub mod nat_gateways;
pub mod network_interfaces;
pub mod placement_groups;
pub mod route_servers;
pub mod security_groups;
pub mod subnets;
pub mod tags_api;
pub mod volumes;
pub mod vpc_endpoints;
pub mod vpcs;

use serde::Serialize;
use serde_json::{Value, json};

use crate::config::EmulatorConfig;
use crate::core::{ApiError, ParamMap, Resource, Result};
use crate::filter::{self, UnknownFilter};
use crate::page::{self, PageBounds};
use crate::store::FamilyTable;

/// All emulated resources, one insertion-ordered table per family.
#[derive(Debug, Default)]
pub struct EmulatorState {
    pub vpcs: FamilyTable<vpcs::Vpc>,
    pub subnets: FamilyTable<subnets::Subnet>,
    pub volumes: FamilyTable<volumes::Volume>,
    pub nat_gateways: FamilyTable<nat_gateways::NatGateway>,
    pub vpc_endpoints: FamilyTable<vpc_endpoints::VpcEndpoint>,
    pub security_groups: FamilyTable<security_groups::SecurityGroup>,
    pub network_interfaces: FamilyTable<network_interfaces::NetworkInterface>,
    pub placement_groups: FamilyTable<placement_groups::PlacementGroup>,
    pub customer_gateways: FamilyTable<customer_gateways::CustomerGateway>,
    pub route_servers: FamilyTable<route_servers::RouteServer>,
}

impl EmulatorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cross-family lookup by opaque ID, used to validate foreign-key
    /// parameters and by the tagging API.
    pub fn find_global(&self, id: &str) -> Option<&dyn Resource> {
        self.vpcs
            .as_resource(id)
            .or_else(|| self.subnets.as_resource(id))
            .or_else(|| self.volumes.as_resource(id))
            .or_else(|| self.nat_gateways.as_resource(id))
            .or_else(|| self.vpc_endpoints.as_resource(id))
            .or_else(|| self.security_groups.as_resource(id))
            .or_else(|| self.network_interfaces.as_resource(id))
            .or_else(|| self.placement_groups.as_resource(id))
            .or_else(|| self.customer_gateways.as_resource(id))
            .or_else(|| self.route_servers.as_resource(id))
    }

    pub fn find_global_mut(&mut self, id: &str) -> Option<&mut dyn Resource> {
        if self.vpcs.contains(id) {
            return self.vpcs.as_resource_mut(id);
        }
        if self.subnets.contains(id) {
            return self.subnets.as_resource_mut(id);
        }
        if self.volumes.contains(id) {
            return self.volumes.as_resource_mut(id);
        }
        if self.nat_gateways.contains(id) {
            return self.nat_gateways.as_resource_mut(id);
        }
        if self.vpc_endpoints.contains(id) {
            return self.vpc_endpoints.as_resource_mut(id);
        }
        if self.security_groups.contains(id) {
            return self.security_groups.as_resource_mut(id);
        }
        if self.network_interfaces.contains(id) {
            return self.network_interfaces.as_resource_mut(id);
        }
        if self.placement_groups.contains(id) {
            return self.placement_groups.as_resource_mut(id);
        }
        if self.customer_gateways.contains(id) {
            return self.customer_gateways.as_resource_mut(id);
        }
        if self.route_servers.contains(id) {
            return self.route_servers.as_resource_mut(id);
        }
        None
    }
}

/// Describe actions run under a read lock, everything else under a write
/// lock; the facade uses this split.
pub fn is_describe(action: &str) -> bool {
    action.starts_with("Describe")
}

pub fn dispatch_describe(
    state: &EmulatorState,
    action: &str,
    params: &ParamMap,
) -> Result<Value> {
    match action {
        "DescribeVpcs" => vpcs::describe_vpcs(state, params),
        "DescribeSubnets" => subnets::describe_subnets(state, params),
        "DescribeVolumes" => volumes::describe_volumes(state, params),
        "DescribeNatGateways" => nat_gateways::describe_nat_gateways(state, params),
        "DescribeVpcEndpoints" => vpc_endpoints::describe_vpc_endpoints(state, params),
        "DescribeSecurityGroups" => security_groups::describe_security_groups(state, params),
        "DescribeNetworkInterfaces" => {
            network_interfaces::describe_network_interfaces(state, params)
        }
        "DescribePlacementGroups" => placement_groups::describe_placement_groups(state, params),
        "DescribeCustomerGateways" => customer_gateways::describe_customer_gateways(state, params),
        "DescribeRouteServers" => route_servers::describe_route_servers(state, params),
        "DescribeTags" => tags_api::describe_tags(state, params),
        _ => Err(ApiError::InvalidAction(action.to_string())),
    }
}

pub fn dispatch_mutate(
    state: &mut EmulatorState,
    config: &EmulatorConfig,
    action: &str,
    params: &ParamMap,
) -> Result<Value> {
    match action {
        "CreateVpc" => vpcs::create_vpc(state, config, params),
        "DeleteVpc" => vpcs::delete_vpc(state, params),
        "CreateSubnet" => subnets::create_subnet(state, config, params),
        "DeleteSubnet" => subnets::delete_subnet(state, params),
        "CreateVolume" => volumes::create_volume(state, params),
        "DeleteVolume" => volumes::delete_volume(state, params),
        "ModifyVolume" => volumes::modify_volume(state, params),
        "CreateNatGateway" => nat_gateways::create_nat_gateway(state, params),
        "DeleteNatGateway" => nat_gateways::delete_nat_gateway(state, params),
        "CreateVpcEndpoint" => vpc_endpoints::create_vpc_endpoint(state, params),
        "DeleteVpcEndpoints" => vpc_endpoints::delete_vpc_endpoints(state, params),
        "CreateSecurityGroup" => security_groups::create_security_group(state, config, params),
        "DeleteSecurityGroup" => security_groups::delete_security_group(state, params),
        "AuthorizeSecurityGroupIngress" => {
            security_groups::authorize_security_group_ingress(state, params)
        }
        "CreateNetworkInterface" => network_interfaces::create_network_interface(state, params),
        "DeleteNetworkInterface" => network_interfaces::delete_network_interface(state, params),
        "CreatePlacementGroup" => placement_groups::create_placement_group(state, params),
        "DeletePlacementGroup" => placement_groups::delete_placement_group(state, params),
        "CreateCustomerGateway" => customer_gateways::create_customer_gateway(state, params),
        "DeleteCustomerGateway" => customer_gateways::delete_customer_gateway(state, params),
        "CreateRouteServer" => route_servers::create_route_server(state, params),
        "DeleteRouteServer" => route_servers::delete_route_server(state, params),
        "CreateTags" => tags_api::create_tags(state, params),
        "DeleteTags" => tags_api::delete_tags(state, params),
        _ => Err(ApiError::InvalidAction(action.to_string())),
    }
}

/// The shared `Describe*` pipeline: explicit-ID restriction, filter
/// evaluation, pagination, serialization.
///
/// `id_param` names the `Thing.N` parameter carrying explicit IDs; every
/// explicit ID must exist or the request fails with `not_found(id)`.
pub fn describe_set<T, F>(
    table: &FamilyTable<T>,
    params: &ParamMap,
    id_param: &str,
    not_found: F,
    policy: UnknownFilter,
    bounds: PageBounds,
) -> Result<(Vec<Value>, Option<String>)>
where
    T: Resource + Serialize,
    F: Fn(&str) -> ApiError,
{
    let ids = params.indexed_values(id_param);
    for id in &ids {
        if !table.contains(id) {
            return Err(not_found(id));
        }
    }

    let filters = filter::parse_filters(params)?;
    let mut docs = Vec::new();
    for record in table.iter() {
        if !ids.is_empty() && !ids.iter().any(|id| id == record.id()) {
            continue;
        }
        if !filter::matches(record, &filters, policy)? {
            continue;
        }
        docs.push(serde_json::to_value(record)?);
    }

    page::paginate(
        &docs,
        params.get_i64("MaxResults")?,
        params.get("NextToken"),
        bounds,
    )
}

/// Wrap a Describe result set under its response key, attaching the token
/// only when another page exists.
pub fn set_response(key: &str, docs: Vec<Value>, token: Option<String>) -> Value {
    let mut doc = json!({ key: docs });
    if let Some(token) = token {
        doc["nextToken"] = json!(token);
    }
    doc
}

/// Validate an `a.b.c.d/m` CIDR block parameter; returns the mask length.
pub(crate) fn validate_cidr(cidr: &str) -> Result<u8> {
    let invalid = || {
        ApiError::InvalidParameterValue(format!(
            "Value ({cidr}) for parameter cidrBlock is invalid. This is not a valid CIDR block."
        ))
    };
    let (addr, mask) = cidr.split_once('/').ok_or_else(invalid)?;
    addr.parse::<std::net::Ipv4Addr>().map_err(|_| invalid())?;
    let mask = mask.parse::<u8>().map_err(|_| invalid())?;
    if mask > 32 {
        return Err(invalid());
    }
    Ok(mask)
}
