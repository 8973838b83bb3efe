use serde::Serialize;
use serde_json::{Value, json};

use super::{EmulatorState, set_response};
use crate::core::{ApiError, ParamMap, Resource, Result, Tag};
use crate::filter::{self, UnknownFilter};
use crate::page::{self, DEFAULT_BOUNDS};
use crate::tags;

const STRATEGIES: [&str; 3] = ["cluster", "spread", "partition"];
const MAX_PARTITIONS: i64 = 7;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementGroup {
    pub group_id: String,
    pub group_name: String,
    pub strategy: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition_count: Option<i64>,
    pub tag_set: Vec<Tag>,
}

impl Resource for PlacementGroup {
    fn id(&self) -> &str {
        &self.group_id
    }

    fn resource_type(&self) -> &'static str {
        "placement-group"
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
            "strategy" => Some(vec![self.strategy.clone()]),
            "state" => Some(vec![self.state.clone()]),
            _ => None,
        }
    }
}

fn not_found(name: &str) -> ApiError {
    ApiError::not_found(
        "InvalidPlacementGroup.Unknown",
        format!("The Placement Group '{name}' is unknown."),
    )
}

pub fn create_placement_group(state: &mut EmulatorState, params: &ParamMap) -> Result<Value> {
    let group_name = params.require("GroupName")?.to_string();
    if state
        .placement_groups
        .iter()
        .any(|g| g.group_name == group_name)
    {
        return Err(ApiError::InvalidParameterValue(format!(
            "Placement group '{group_name}' already exists."
        )));
    }
    let strategy = params.get("Strategy").unwrap_or("cluster").to_string();
    if !STRATEGIES.contains(&strategy.as_str()) {
        return Err(ApiError::InvalidParameterValue(format!(
            "Value ({strategy}) for parameter strategy is invalid."
        )));
    }
    let partition_count = params.get_i64("PartitionCount")?;
    if let Some(count) = partition_count {
        if strategy != "partition" {
            return Err(ApiError::InvalidParameterCombination(
                "PartitionCount is only valid with the partition strategy.".to_string(),
            ));
        }
        if !(1..=MAX_PARTITIONS).contains(&count) {
            return Err(ApiError::InvalidParameterValue(format!(
                "Value ({count}) for parameter partitionCount is invalid. \
                 It must be between 1 and {MAX_PARTITIONS}."
            )));
        }
    }
    let tag_set = tags::from_tag_specifications(params, "placement-group")?;
    params.dry_run()?;

    let group_id = state.placement_groups.allocate_id("pg");
    let group = PlacementGroup {
        group_id: group_id.clone(),
        group_name,
        strategy,
        state: "available".to_string(),
        partition_count,
        tag_set,
    };
    state.placement_groups.put(group_id, group.clone());

    Ok(json!({ "placementGroup": serde_json::to_value(&group)? }))
}

/// Placement groups are addressed by name, not by generated ID.
pub fn delete_placement_group(state: &mut EmulatorState, params: &ParamMap) -> Result<Value> {
    let group_name = params.require("GroupName")?.to_string();
    let group_id = state
        .placement_groups
        .iter()
        .find(|g| g.group_name == group_name)
        .map(|g| g.group_id.clone())
        .ok_or_else(|| not_found(&group_name))?;
    params.dry_run()?;
    state.placement_groups.delete(&group_id);
    Ok(json!({ "return": true }))
}

pub fn describe_placement_groups(state: &EmulatorState, params: &ParamMap) -> Result<Value> {
    params.dry_run()?;
    let group_names = params.indexed_values("GroupName");
    for name in &group_names {
        if !state
            .placement_groups
            .iter()
            .any(|g| &g.group_name == name)
        {
            return Err(not_found(name));
        }
    }

    let filters = filter::parse_filters(params)?;
    let mut docs = Vec::new();
    for group in state.placement_groups.iter() {
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
    Ok(set_response("placementGroupSet", docs, token))
}
