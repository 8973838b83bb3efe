//! Shared tag constraints, applied wherever a `TagSpecification` or a raw
//! `Tag.N` list is accepted.

use crate::core::{ApiError, ParamMap, Result, Tag, upsert_tag};

pub const MAX_KEY_LEN: usize = 127;
pub const MAX_VALUE_LEN: usize = 256;

/// Validate a single tag key/value pair. An omitted value is accepted as
/// the empty string.
pub fn validate_tag(key: &str, value: &str) -> Result<()> {
    if key.is_empty() {
        return Err(ApiError::InvalidParameterValue(
            "Tag keys must not be empty".to_string(),
        ));
    }
    if key.len() > MAX_KEY_LEN {
        return Err(ApiError::InvalidParameterValue(format!(
            "Tag key exceeds the maximum length of {MAX_KEY_LEN} characters"
        )));
    }
    if key.to_ascii_lowercase().starts_with("aws:") {
        return Err(ApiError::InvalidParameterValue(
            "Tag keys starting with 'aws:' are reserved".to_string(),
        ));
    }
    if value.len() > MAX_VALUE_LEN {
        return Err(ApiError::InvalidParameterValue(format!(
            "Tag value exceeds the maximum length of {MAX_VALUE_LEN} characters"
        )));
    }
    Ok(())
}

/// Parse a raw `Tag.N.{Key,Value}` list (as used by `CreateTags`).
pub fn parse_tag_list(params: &ParamMap, prefix: &str) -> Result<Vec<Tag>> {
    let mut tags = Vec::new();
    for group in params.indexed_groups(prefix) {
        let key = group.require("Key")?;
        let value = group.get("Value").unwrap_or("");
        validate_tag(key, value)?;
        upsert_tag(&mut tags, Tag::new(key, value));
    }
    Ok(tags)
}

/// Collect the tags from `TagSpecification.N` groups that target
/// `accepted_resource_type`. Specifications for other resource types are
/// silently ignored; every tag that does apply is validated.
pub fn from_tag_specifications(params: &ParamMap, accepted_resource_type: &str) -> Result<Vec<Tag>> {
    let mut tags = Vec::new();
    for spec in params.indexed_groups("TagSpecification") {
        if spec.get("ResourceType") != Some(accepted_resource_type) {
            continue;
        }
        for group in spec.indexed_groups("Tag") {
            let key = group.require("Key")?;
            let value = group.get("Value").unwrap_or("");
            validate_tag(key, value)?;
            upsert_tag(&mut tags, Tag::new(key, value));
        }
    }
    Ok(tags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_lengths() {
        assert!(validate_tag(&"k".repeat(127), "v").is_ok());
        assert!(validate_tag(&"k".repeat(128), "v").is_err());
        assert!(validate_tag("k", &"v".repeat(256)).is_ok());
        assert!(validate_tag("k", &"v".repeat(257)).is_err());
    }

    #[test]
    fn reserved_prefix_is_case_insensitive() {
        assert!(validate_tag("aws:name", "v").is_err());
        assert!(validate_tag("AWS:name", "v").is_err());
        assert!(validate_tag("Aws:name", "v").is_err());
        assert!(validate_tag("awsome", "v").is_ok());
    }

    #[test]
    fn other_resource_types_are_ignored() {
        let params = ParamMap::from_pairs([
            ("TagSpecification.1.ResourceType".to_string(), "volume".to_string()),
            ("TagSpecification.1.Tag.1.Key".to_string(), "Name".to_string()),
            ("TagSpecification.1.Tag.1.Value".to_string(), "data".to_string()),
            ("TagSpecification.2.ResourceType".to_string(), "instance".to_string()),
            ("TagSpecification.2.Tag.1.Key".to_string(), "aws:oops".to_string()),
        ]);
        let tags = from_tag_specifications(&params, "volume").unwrap();
        assert_eq!(tags, vec![Tag::new("Name", "data")]);
    }
}
