use serde::Serialize;
use serde_json::{Value, json};

use super::{EmulatorState, describe_set, lifecycle, set_response};
use crate::core::{ApiError, ParamMap, Resource, Result, Tag};
use crate::filter::UnknownFilter;
use crate::ident;
use crate::page::DEFAULT_BOUNDS;
use crate::tags;

const VOLUME_TYPES: [&str; 7] = ["gp2", "gp3", "io1", "io2", "st1", "sc1", "standard"];
const MIN_SIZE_GIB: i64 = 1;
const MAX_SIZE_GIB: i64 = 16384;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub volume_id: String,
    pub size: i64,
    pub availability_zone: String,
    pub volume_type: String,
    #[serde(rename = "status")]
    pub state: String,
    pub create_time: String,
    pub encrypted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iops: Option<i64>,
    pub tag_set: Vec<Tag>,
}

impl Resource for Volume {
    fn id(&self) -> &str {
        &self.volume_id
    }

    fn resource_type(&self) -> &'static str {
        "volume"
    }

    fn tags(&self) -> &[Tag] {
        &self.tag_set
    }

    fn tags_mut(&mut self) -> &mut Vec<Tag> {
        &mut self.tag_set
    }

    fn filter_attr(&self, name: &str) -> Option<Vec<String>> {
        match name {
            "volume-id" => Some(vec![self.volume_id.clone()]),
            "size" => Some(vec![self.size.to_string()]),
            "availability-zone" => Some(vec![self.availability_zone.clone()]),
            "volume-type" => Some(vec![self.volume_type.clone()]),
            "status" => Some(vec![self.state.clone()]),
            "create-time" => Some(vec![self.create_time.clone()]),
            "encrypted" => Some(vec![self.encrypted.to_string()]),
            _ => None,
        }
    }
}

fn not_found(id: &str) -> ApiError {
    ApiError::not_found(
        "InvalidVolume.NotFound",
        format!("The volume '{id}' does not exist."),
    )
}

pub fn create_volume(state: &mut EmulatorState, params: &ParamMap) -> Result<Value> {
    let availability_zone = params.require("AvailabilityZone")?.to_string();
    let size = params
        .get_i64("Size")?
        .ok_or_else(|| ApiError::MissingParameter("Size".to_string()))?;
    if !(MIN_SIZE_GIB..=MAX_SIZE_GIB).contains(&size) {
        return Err(ApiError::InvalidParameterValue(format!(
            "Value ({size}) for parameter size is invalid. It must be between \
             {MIN_SIZE_GIB} and {MAX_SIZE_GIB} GiB."
        )));
    }
    let volume_type = params.get("VolumeType").unwrap_or("gp2").to_string();
    if !VOLUME_TYPES.contains(&volume_type.as_str()) {
        return Err(ApiError::InvalidParameterValue(format!(
            "Value ({volume_type}) for parameter volumeType is invalid."
        )));
    }
    let iops = params.get_i64("Iops")?;
    if iops.is_none() && matches!(volume_type.as_str(), "io1" | "io2") {
        return Err(ApiError::InvalidParameterCombination(format!(
            "The parameter iops must be specified for {volume_type} volumes."
        )));
    }
    if iops.is_some() && matches!(volume_type.as_str(), "gp2" | "st1" | "sc1" | "standard") {
        return Err(ApiError::InvalidParameterCombination(format!(
            "The parameter iops is not supported for {volume_type} volumes."
        )));
    }
    let encrypted = params.get_bool("Encrypted")?.unwrap_or(false);
    let tag_set = tags::from_tag_specifications(params, "volume")?;
    params.dry_run()?;

    let volume_id = state.volumes.allocate_id("vol");
    let volume = Volume {
        volume_id: volume_id.clone(),
        size,
        availability_zone,
        volume_type,
        state: lifecycle::VOLUME.settled().to_string(),
        create_time: ident::timestamp(),
        encrypted,
        iops,
        tag_set,
    };
    state.volumes.put(volume_id, volume.clone());

    let mut doc = serde_json::to_value(&volume)?;
    doc["status"] = json!(lifecycle::VOLUME.reported());
    Ok(doc)
}

pub fn delete_volume(state: &mut EmulatorState, params: &ParamMap) -> Result<Value> {
    let volume_id = params.require("VolumeId")?.to_string();
    let volume = state.volumes.get(&volume_id).ok_or_else(|| not_found(&volume_id))?;
    if volume.state == "in-use" {
        return Err(ApiError::IncorrectState(format!(
            "Volume '{volume_id}' is currently attached and cannot be deleted."
        )));
    }
    params.dry_run()?;
    state.volumes.delete(&volume_id);
    Ok(json!({ "return": true }))
}

pub fn modify_volume(state: &mut EmulatorState, params: &ParamMap) -> Result<Value> {
    let volume_id = params.require("VolumeId")?.to_string();
    if !state.volumes.contains(&volume_id) {
        return Err(not_found(&volume_id));
    }
    let new_size = params.get_i64("Size")?;
    let new_type = params.get("VolumeType").map(str::to_string);
    let new_iops = params.get_i64("Iops")?;

    if let Some(size) = new_size {
        let current = state.volumes.get(&volume_id).map(|v| v.size).unwrap_or(0);
        if size < current {
            return Err(ApiError::InvalidParameterValue(format!(
                "New size ({size} GiB) must not be smaller than the current size ({current} GiB)."
            )));
        }
        if size > MAX_SIZE_GIB {
            return Err(ApiError::InvalidParameterValue(format!(
                "Value ({size}) for parameter size is invalid. It must be at most {MAX_SIZE_GIB} GiB."
            )));
        }
    }
    if let Some(ref volume_type) = new_type {
        if !VOLUME_TYPES.contains(&volume_type.as_str()) {
            return Err(ApiError::InvalidParameterValue(format!(
                "Value ({volume_type}) for parameter volumeType is invalid."
            )));
        }
    }
    params.dry_run()?;

    let volume = state
        .volumes
        .get_mut(&volume_id)
        .ok_or_else(|| not_found(&volume_id))?;
    let original_size = volume.size;
    let original_type = volume.volume_type.clone();
    if let Some(size) = new_size {
        volume.size = size;
    }
    if let Some(volume_type) = new_type {
        volume.volume_type = volume_type;
    }
    if let Some(iops) = new_iops {
        volume.iops = Some(iops);
    }

    Ok(json!({
        "volumeModification": {
            "volumeId": volume_id,
            "modificationState": "completed",
            "targetSize": volume.size,
            "targetVolumeType": volume.volume_type,
            "originalSize": original_size,
            "originalVolumeType": original_type,
            "startTime": ident::timestamp(),
        }
    }))
}

pub fn describe_volumes(state: &EmulatorState, params: &ParamMap) -> Result<Value> {
    params.dry_run()?;
    let (docs, token) = describe_set(
        &state.volumes,
        params,
        "VolumeId",
        not_found,
        UnknownFilter::Ignore,
        DEFAULT_BOUNDS,
    )?;
    Ok(set_response("volumeSet", docs, token))
}
