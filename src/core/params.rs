use std::collections::BTreeMap;

use indexmap::IndexMap;

use super::{ApiError, Result};

/// Flat map of AWS Query parameters for one request.
///
/// Indexed parameters (`Filter.1.Name`, `TagSpecification.2.Tag.1.Key`, ...)
/// stay flat here; `indexed_values` and `indexed_groups` regroup them on
/// demand, ordered by their numeric index.
#[derive(Debug, Clone, Default)]
pub struct ParamMap {
    entries: IndexMap<String, String>,
}

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut map = Self::new();
        for (key, value) in pairs {
            map.entries.insert(key, value);
        }
        map
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::MissingParameter(key.to_string()))
    }

    pub fn get_i64(&self, key: &str) -> Result<Option<i64>> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw.parse::<i64>().map(Some).map_err(|_| {
                ApiError::InvalidParameterValue(format!(
                    "Value ({raw}) for parameter {key} is invalid. It must be an integer."
                ))
            }),
        }
    }

    pub fn require_i64(&self, key: &str) -> Result<i64> {
        self.require(key)?;
        Ok(self.get_i64(key)?.unwrap_or_default())
    }

    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some("true") | Some("True") => Ok(Some(true)),
            Some("false") | Some("False") => Ok(Some(false)),
            Some(raw) => Err(ApiError::InvalidParameterValue(format!(
                "Value ({raw}) for parameter {key} is invalid. It must be a boolean."
            ))),
        }
    }

    /// Raises `DryRunOperation` when `DryRun=true`. Handlers call this after
    /// validating parameters and before touching the store, so a dry run
    /// always reports the simulated success AWS documents.
    pub fn dry_run(&self) -> Result<()> {
        if self.get_bool("DryRun")?.unwrap_or(false) {
            return Err(ApiError::DryRunOperation);
        }
        Ok(())
    }

    /// Values of `Prefix.1`, `Prefix.2`, ... in index order.
    pub fn indexed_values(&self, prefix: &str) -> Vec<String> {
        let mut by_index: BTreeMap<usize, String> = BTreeMap::new();
        let lead = format!("{prefix}.");
        for (key, value) in &self.entries {
            if let Some(rest) = key.strip_prefix(&lead) {
                if let Ok(index) = rest.parse::<usize>() {
                    by_index.insert(index, value.clone());
                }
            }
        }
        by_index.into_values().collect()
    }

    /// Sub-maps for `Prefix.1.*`, `Prefix.2.*`, ... in index order. Each
    /// sub-map's keys are the part after `Prefix.N.`.
    pub fn indexed_groups(&self, prefix: &str) -> Vec<ParamMap> {
        let mut by_index: BTreeMap<usize, ParamMap> = BTreeMap::new();
        let lead = format!("{prefix}.");
        for (key, value) in &self.entries {
            if let Some(rest) = key.strip_prefix(&lead) {
                if let Some((index, sub_key)) = rest.split_once('.') {
                    if let Ok(index) = index.parse::<usize>() {
                        by_index
                            .entry(index)
                            .or_default()
                            .insert(sub_key, value.clone());
                    }
                }
            }
        }
        by_index.into_values().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParamMap {
        ParamMap::from_pairs([
            ("Action".to_string(), "DescribeVolumes".to_string()),
            ("VolumeId.2".to_string(), "vol-b".to_string()),
            ("VolumeId.1".to_string(), "vol-a".to_string()),
            ("Filter.1.Name".to_string(), "status".to_string()),
            ("Filter.1.Value.1".to_string(), "available".to_string()),
            ("MaxResults".to_string(), "10".to_string()),
        ])
    }

    #[test]
    fn require_reports_missing_parameter() {
        let params = sample();
        assert_eq!(params.require("Action").unwrap(), "DescribeVolumes");
        let err = params.require("SubnetId").unwrap_err();
        assert_eq!(err.code(), "MissingParameter");
    }

    #[test]
    fn indexed_values_sort_numerically() {
        assert_eq!(sample().indexed_values("VolumeId"), vec!["vol-a", "vol-b"]);
    }

    #[test]
    fn indexed_groups_collect_sub_keys() {
        let groups = sample().indexed_groups("Filter");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].get("Name"), Some("status"));
        assert_eq!(groups[0].indexed_values("Value"), vec!["available"]);
    }

    #[test]
    fn get_i64_rejects_non_integers() {
        let mut params = ParamMap::new();
        params.insert("Size", "eight");
        assert_eq!(
            params.get_i64("Size").unwrap_err().code(),
            "InvalidParameterValue"
        );
    }

    #[test]
    fn dry_run_raises_after_validation() {
        let mut params = ParamMap::new();
        params.insert("DryRun", "true");
        assert_eq!(params.dry_run().unwrap_err().code(), "DryRunOperation");

        let mut params = ParamMap::new();
        params.insert("DryRun", "false");
        assert!(params.dry_run().is_ok());
    }
}
