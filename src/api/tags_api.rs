//! The cross-family tagging actions. These are the only handlers that reach
//! resources through the store's global ID lookup instead of one family
//! table.

use serde_json::{Value, json};

use crate::core::{ApiError, ParamMap, Result, Tag, upsert_tag};
use crate::filter::{self, Filter};
use crate::page::{self, DEFAULT_BOUNDS};
use crate::tags;

use super::EmulatorState;

fn not_found(id: &str) -> ApiError {
    ApiError::not_found("InvalidID", format!("The ID '{id}' is not valid"))
}

pub fn create_tags(state: &mut EmulatorState, params: &ParamMap) -> Result<Value> {
    let resource_ids = params.indexed_values("ResourceId");
    if resource_ids.is_empty() {
        return Err(ApiError::MissingParameter("ResourceId".to_string()));
    }
    let new_tags = tags::parse_tag_list(params, "Tag")?;
    if new_tags.is_empty() {
        return Err(ApiError::MissingParameter("Tag".to_string()));
    }
    for id in &resource_ids {
        if state.find_global(id).is_none() {
            return Err(not_found(id));
        }
    }
    params.dry_run()?;

    for id in &resource_ids {
        // validated above; skip quietly if a concurrent delete raced us
        let Some(record) = state.find_global_mut(id) else {
            continue;
        };
        for tag in &new_tags {
            upsert_tag(record.tags_mut(), tag.clone());
        }
    }
    Ok(json!({ "return": true }))
}

/// With no `Tag.N` entries every tag on the resource is removed. A `Tag.N`
/// entry with a key only removes that key whatever its value; with a value
/// it removes the tag only on an exact match.
pub fn delete_tags(state: &mut EmulatorState, params: &ParamMap) -> Result<Value> {
    let resource_ids = params.indexed_values("ResourceId");
    if resource_ids.is_empty() {
        return Err(ApiError::MissingParameter("ResourceId".to_string()));
    }
    for id in &resource_ids {
        if state.find_global(id).is_none() {
            return Err(not_found(id));
        }
    }
    let groups = params.indexed_groups("Tag");
    let mut removals: Vec<(String, Option<String>)> = Vec::new();
    for group in &groups {
        let key = group.require("Key")?.to_string();
        removals.push((key, group.get("Value").map(str::to_string)));
    }
    params.dry_run()?;

    for id in &resource_ids {
        let Some(record) = state.find_global_mut(id) else {
            continue;
        };
        let tag_set = record.tags_mut();
        if removals.is_empty() {
            tag_set.clear();
            continue;
        }
        tag_set.retain(|tag| {
            !removals.iter().any(|(key, value)| {
                tag.key == *key && value.as_ref().is_none_or(|v| tag.value == *v)
            })
        });
    }
    Ok(json!({ "return": true }))
}

pub fn describe_tags(state: &EmulatorState, params: &ParamMap) -> Result<Value> {
    params.dry_run()?;
    let filters = filter::parse_filters(params)?;

    let mut docs = Vec::new();
    for (resource_id, resource_type, tag) in all_tags(state) {
        if !tag_matches(&filters, resource_id, resource_type, tag) {
            continue;
        }
        docs.push(json!({
            "resourceId": resource_id,
            "resourceType": resource_type,
            "key": tag.key,
            "value": tag.value,
        }));
    }

    let (docs, token) = page::paginate(
        &docs,
        params.get_i64("MaxResults")?,
        params.get("NextToken"),
        DEFAULT_BOUNDS,
    )?;
    Ok(super::set_response("tagSet", docs, token))
}

/// Flatten every record's tag set, family by family, in insertion order.
fn all_tags(state: &EmulatorState) -> Vec<(&str, &'static str, &Tag)> {
    let mut flattened: Vec<(&str, &'static str, &Tag)> = Vec::new();
    collect_tags(&state.vpcs, &mut flattened);
    collect_tags(&state.subnets, &mut flattened);
    collect_tags(&state.volumes, &mut flattened);
    collect_tags(&state.nat_gateways, &mut flattened);
    collect_tags(&state.vpc_endpoints, &mut flattened);
    collect_tags(&state.security_groups, &mut flattened);
    collect_tags(&state.network_interfaces, &mut flattened);
    collect_tags(&state.placement_groups, &mut flattened);
    collect_tags(&state.customer_gateways, &mut flattened);
    collect_tags(&state.route_servers, &mut flattened);
    flattened
}

fn collect_tags<'a, T: crate::core::Resource>(
    table: &'a crate::store::FamilyTable<T>,
    out: &mut Vec<(&'a str, &'static str, &'a Tag)>,
) {
    for record in table.iter() {
        for tag in record.tags() {
            out.push((record.id(), record.resource_type(), tag));
        }
    }
}

/// DescribeTags filters address the flattened rows, not the records, so the
/// generic engine does not apply here.
fn tag_matches(filters: &[Filter], resource_id: &str, resource_type: &str, tag: &Tag) -> bool {
    filters.iter().all(|f| {
        if f.values.is_empty() {
            return true;
        }
        match f.name.as_str() {
            "key" => f.values.contains(&tag.key),
            "value" => f.values.contains(&tag.value),
            "resource-id" => f.values.iter().any(|v| v == resource_id),
            "resource-type" => f.values.iter().any(|v| v == resource_type),
            _ => true,
        }
    })
}
