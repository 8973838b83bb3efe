//! AWS-style `Name`/`Values` filter evaluation shared by every `Describe*`
//! handler. Filters AND across the list; a filter's values OR.

use crate::core::{ApiError, ParamMap, Resource, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub name: String,
    pub values: Vec<String>,
}

/// What to do with a filter name the record type does not know. The policy
/// is declared per Describe handler, not globally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownFilter {
    /// The filter matches everything.
    Ignore,
    /// The request fails with `InvalidParameterValue`.
    Reject,
}

/// Parse `Filter.N.Name` / `Filter.N.Value.M` parameters.
pub fn parse_filters(params: &ParamMap) -> Result<Vec<Filter>> {
    let mut filters = Vec::new();
    for group in params.indexed_groups("Filter") {
        let name = group.require("Name")?.to_string();
        let values = group.indexed_values("Value");
        filters.push(Filter { name, values });
    }
    Ok(filters)
}

/// Does `record` satisfy every filter?
///
/// A filter with no values matches everything. This mirrors the behavior the
/// emulator has always had and is covered by tests; real EC2 rejects empty
/// value lists.
pub fn matches(record: &dyn Resource, filters: &[Filter], policy: UnknownFilter) -> Result<bool> {
    for filter in filters {
        if filter.values.is_empty() {
            continue;
        }
        if !matches_one(record, filter, policy)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn matches_one(record: &dyn Resource, filter: &Filter, policy: UnknownFilter) -> Result<bool> {
    if let Some(tag_key) = filter.name.strip_prefix("tag:") {
        return Ok(record
            .tags()
            .iter()
            .any(|t| t.key == tag_key && filter.values.contains(&t.value)));
    }
    if filter.name == "tag-key" {
        return Ok(record
            .tags()
            .iter()
            .any(|t| filter.values.contains(&t.key)));
    }
    match record.filter_attr(&filter.name) {
        Some(attr_values) => Ok(attr_values.iter().any(|v| filter.values.contains(v))),
        None => match policy {
            UnknownFilter::Ignore => Ok(true),
            UnknownFilter::Reject => Err(ApiError::InvalidParameterValue(format!(
                "The filter '{}' is invalid",
                filter.name
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Tag;

    struct Probe {
        id: String,
        state: String,
        tags: Vec<Tag>,
    }

    impl Resource for Probe {
        fn id(&self) -> &str {
            &self.id
        }

        fn resource_type(&self) -> &'static str {
            "probe"
        }

        fn tags(&self) -> &[Tag] {
            &self.tags
        }

        fn tags_mut(&mut self) -> &mut Vec<Tag> {
            &mut self.tags
        }

        fn filter_attr(&self, name: &str) -> Option<Vec<String>> {
            match name {
                "probe-id" => Some(vec![self.id.clone()]),
                "state" => Some(vec![self.state.clone()]),
                "optional-field" => Some(vec![]),
                _ => None,
            }
        }
    }

    fn probe() -> Probe {
        Probe {
            id: "prb-1".to_string(),
            state: "available".to_string(),
            tags: vec![Tag::new("Name", "alpha")],
        }
    }

    fn filter(name: &str, values: &[&str]) -> Filter {
        Filter {
            name: name.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    #[test]
    fn values_or_within_one_filter() {
        let f = filter("state", &["deleted", "available"]);
        assert!(matches(&probe(), &[f], UnknownFilter::Ignore).unwrap());
    }

    #[test]
    fn filters_and_across_the_list() {
        let fs = [
            filter("state", &["available"]),
            filter("probe-id", &["prb-2"]),
        ];
        assert!(!matches(&probe(), &fs, UnknownFilter::Ignore).unwrap());
    }

    #[test]
    fn empty_values_match_everything() {
        let f = filter("state", &[]);
        assert!(matches(&probe(), &[f], UnknownFilter::Reject).unwrap());
        let f = filter("no-such-name", &[]);
        assert!(matches(&probe(), &[f], UnknownFilter::Reject).unwrap());
    }

    #[test]
    fn tag_filters() {
        assert!(matches(&probe(), &[filter("tag:Name", &["alpha"])], UnknownFilter::Ignore).unwrap());
        assert!(!matches(&probe(), &[filter("tag:Name", &["beta"])], UnknownFilter::Ignore).unwrap());
        assert!(matches(&probe(), &[filter("tag-key", &["Name"])], UnknownFilter::Ignore).unwrap());
        assert!(!matches(&probe(), &[filter("tag-key", &["Env"])], UnknownFilter::Ignore).unwrap());
    }

    #[test]
    fn unknown_name_policy() {
        let f = filter("no-such-name", &["x"]);
        assert!(matches(&probe(), &[f.clone()], UnknownFilter::Ignore).unwrap());
        let err = matches(&probe(), &[f], UnknownFilter::Reject).unwrap_err();
        assert_eq!(err.code(), "InvalidParameterValue");
    }

    #[test]
    fn known_but_unset_attribute_does_not_match() {
        let f = filter("optional-field", &["x"]);
        assert!(!matches(&probe(), &[f], UnknownFilter::Reject).unwrap());
    }
}
