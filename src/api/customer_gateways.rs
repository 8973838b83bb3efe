use serde::Serialize;
use serde_json::{Value, json};

use super::{EmulatorState, describe_set, set_response};
use crate::core::{ApiError, ParamMap, Resource, Result, Tag};
use crate::filter::UnknownFilter;
use crate::page::DEFAULT_BOUNDS;
use crate::tags;

const DEFAULT_BGP_ASN: i64 = 65000;
const MAX_BGP_ASN: i64 = 4_294_967_294;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerGateway {
    pub customer_gateway_id: String,
    pub state: String,
    #[serde(rename = "type")]
    pub gateway_type: String,
    pub ip_address: String,
    pub bgp_asn: String,
    pub tag_set: Vec<Tag>,
}

impl Resource for CustomerGateway {
    fn id(&self) -> &str {
        &self.customer_gateway_id
    }

    fn resource_type(&self) -> &'static str {
        "customer-gateway"
    }

    fn tags(&self) -> &[Tag] {
        &self.tag_set
    }

    fn tags_mut(&mut self) -> &mut Vec<Tag> {
        &mut self.tag_set
    }

    fn filter_attr(&self, name: &str) -> Option<Vec<String>> {
        match name {
            "customer-gateway-id" => Some(vec![self.customer_gateway_id.clone()]),
            "state" => Some(vec![self.state.clone()]),
            "type" => Some(vec![self.gateway_type.clone()]),
            "ip-address" => Some(vec![self.ip_address.clone()]),
            "bgp-asn" => Some(vec![self.bgp_asn.clone()]),
            _ => None,
        }
    }
}

fn not_found(id: &str) -> ApiError {
    ApiError::not_found(
        "InvalidCustomerGatewayID.NotFound",
        format!("The customerGateway ID '{id}' does not exist"),
    )
}

pub fn create_customer_gateway(state: &mut EmulatorState, params: &ParamMap) -> Result<Value> {
    let gateway_type = params.require("Type")?.to_string();
    if gateway_type != "ipsec.1" {
        return Err(ApiError::InvalidParameterValue(format!(
            "Value ({gateway_type}) for parameter type is invalid."
        )));
    }
    let ip_address = params.require("IpAddress")?.to_string();
    ip_address.parse::<std::net::Ipv4Addr>().map_err(|_| {
        ApiError::InvalidParameterValue(format!(
            "Value ({ip_address}) for parameter ipAddress is invalid."
        ))
    })?;
    let bgp_asn = params.get_i64("BgpAsn")?.unwrap_or(DEFAULT_BGP_ASN);
    if !(1..=MAX_BGP_ASN).contains(&bgp_asn) {
        return Err(ApiError::InvalidParameterValue(format!(
            "Value ({bgp_asn}) for parameter bgpAsn is invalid. \
             It must be between 1 and {MAX_BGP_ASN}."
        )));
    }
    let tag_set = tags::from_tag_specifications(params, "customer-gateway")?;
    params.dry_run()?;

    let customer_gateway_id = state.customer_gateways.allocate_id("cgw");
    let gateway = CustomerGateway {
        customer_gateway_id: customer_gateway_id.clone(),
        state: "available".to_string(),
        gateway_type,
        ip_address,
        bgp_asn: bgp_asn.to_string(),
        tag_set,
    };
    state.customer_gateways.put(customer_gateway_id, gateway.clone());

    Ok(json!({ "customerGateway": serde_json::to_value(&gateway)? }))
}

/// Strict delete: a second delete of the same ID fails again with NotFound.
pub fn delete_customer_gateway(state: &mut EmulatorState, params: &ParamMap) -> Result<Value> {
    let customer_gateway_id = params.require("CustomerGatewayId")?.to_string();
    if !state.customer_gateways.contains(&customer_gateway_id) {
        return Err(not_found(&customer_gateway_id));
    }
    params.dry_run()?;
    state.customer_gateways.delete(&customer_gateway_id);
    Ok(json!({ "return": true }))
}

pub fn describe_customer_gateways(state: &EmulatorState, params: &ParamMap) -> Result<Value> {
    params.dry_run()?;
    let (docs, token) = describe_set(
        &state.customer_gateways,
        params,
        "CustomerGatewayId",
        not_found,
        UnknownFilter::Ignore,
        DEFAULT_BOUNDS,
    )?;
    Ok(set_response("customerGatewaySet", docs, token))
}
