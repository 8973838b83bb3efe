use serde::{Deserialize, Serialize};

/// A `(Key, Value)` pair on a resource's `tagSet`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(rename = "key")]
    pub key: String,
    #[serde(rename = "value")]
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Insert or overwrite a tag in a record's tag set. Key uniqueness is
/// enforced last-write-wins.
pub fn upsert_tag(tags: &mut Vec<Tag>, tag: Tag) {
    match tags.iter_mut().find(|t| t.key == tag.key) {
        Some(existing) => existing.value = tag.value,
        None => tags.push(tag),
    }
}

/// One emulated AWS object. Implementations map kebab-case filter names to
/// their attributes so `Describe*` filtering stays generic.
pub trait Resource {
    /// Primary identifier, prefix included (`vol-...`, `eni-...`).
    fn id(&self) -> &str;

    /// Resource type string as used by `TagSpecification` and `DescribeTags`
    /// (e.g. `"volume"`, `"natgateway"`).
    fn resource_type(&self) -> &'static str;

    fn tags(&self) -> &[Tag];

    fn tags_mut(&mut self) -> &mut Vec<Tag>;

    /// Values of the attribute named by a kebab-case filter name.
    ///
    /// Returns `None` for an unknown filter name, `Some(vec![])` for a known
    /// attribute that is unset, and one entry per value for multi-valued
    /// attributes (e.g. the `group-id` list on a network interface).
    fn filter_attr(&self, name: &str) -> Option<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_tag_is_last_write_wins() {
        let mut tags = vec![Tag::new("Name", "old")];
        upsert_tag(&mut tags, Tag::new("Name", "new"));
        upsert_tag(&mut tags, Tag::new("env", "dev"));
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].value, "new");
        assert_eq!(tags[1].key, "env");
    }
}
