//! Process-lifetime storage for emulated resources. One `FamilyTable` per
//! resource family, insertion-ordered so Describe pagination stays stable
//! across calls.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::core::Resource;
use crate::ident;

/// Keyed collection for one resource family.
#[derive(Debug)]
pub struct FamilyTable<T> {
    entries: IndexMap<String, T>,
    /// IDs of deleted entries. A retired ID is never handed out again.
    retired: HashSet<String>,
}

impl<T> FamilyTable<T> {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            retired: HashSet::new(),
        }
    }

    /// Draw a fresh ID that collides with neither a live nor a retired entry.
    pub fn allocate_id(&self, prefix: &str) -> String {
        loop {
            let id = ident::resource_id(prefix);
            if !self.entries.contains_key(&id) && !self.retired.contains(&id) {
                return id;
            }
        }
    }

    /// Insert or overwrite; never fails.
    pub fn put(&mut self, id: impl Into<String>, record: T) {
        self.entries.insert(id.into(), record);
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.entries.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.entries.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Remove and retire the ID. Returns the record if it was present;
    /// absent IDs are not an error here, idempotency is decided per handler.
    pub fn delete(&mut self, id: &str) -> Option<T> {
        // shift_remove keeps the insertion order of the survivors
        let removed = self.entries.shift_remove(id);
        if removed.is_some() {
            self.retired.insert(id.to_string());
        }
        removed
    }

    /// Records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.values_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for FamilyTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Resource> FamilyTable<T> {
    pub fn as_resource(&self, id: &str) -> Option<&dyn Resource> {
        self.entries.get(id).map(|r| r as &dyn Resource)
    }

    pub fn as_resource_mut(&mut self, id: &str) -> Option<&mut dyn Resource> {
        match self.entries.get_mut(id) {
            Some(r) => Some(r as &mut dyn Resource),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Tag;

    struct Rec {
        id: String,
    }

    impl Resource for Rec {
        fn id(&self) -> &str {
            &self.id
        }

        fn resource_type(&self) -> &'static str {
            "rec"
        }

        fn tags(&self) -> &[Tag] {
            &[]
        }

        fn tags_mut(&mut self) -> &mut Vec<Tag> {
            unimplemented!("test record has no tags")
        }

        fn filter_attr(&self, _name: &str) -> Option<Vec<String>> {
            None
        }
    }

    #[test]
    fn iteration_order_is_insertion_order() {
        let mut table = FamilyTable::new();
        for n in 0..20 {
            table.put(format!("rec-{n:03}"), Rec { id: format!("rec-{n:03}") });
        }
        table.delete("rec-007");
        let ids: Vec<&str> = table.iter().map(|r| r.id()).collect();
        let mut expected: Vec<String> = (0..20).map(|n| format!("rec-{n:03}")).collect();
        expected.retain(|id| id != "rec-007");
        assert_eq!(ids, expected);
    }

    #[test]
    fn allocated_ids_never_repeat() {
        let mut table: FamilyTable<Rec> = FamilyTable::new();
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let id = table.allocate_id("rec");
            assert!(seen.insert(id.clone()), "duplicate id {id}");
            table.put(id.clone(), Rec { id });
        }
    }

    #[test]
    fn deleted_ids_stay_retired() {
        let mut table = FamilyTable::new();
        table.put("rec-a", Rec { id: "rec-a".to_string() });
        assert!(table.delete("rec-a").is_some());
        assert!(table.delete("rec-a").is_none());
        assert!(table.retired.contains("rec-a"));
    }
}
