//! Resource ID, request ID and timestamp generation.

use chrono::Utc;
use uuid::Uuid;

/// Length of the hex suffix on generated resource IDs, matching the long
/// EC2 ID format (`vol-0123456789abcdef0`).
const ID_SUFFIX_LEN: usize = 17;

/// A fresh `prefix-xxxxxxxxxxxxxxxxx` identifier. Uniqueness against a
/// family's live and retired IDs is the store's job (`FamilyTable::allocate_id`).
pub fn resource_id(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", &hex[..ID_SUFFIX_LEN])
}

/// Request IDs are hyphenated UUIDs, unrelated to resource IDs.
pub fn request_id() -> String {
    Uuid::new_v4().to_string()
}

/// UTC timestamp in the AWS response format: ISO-8601 with millisecond
/// precision and a literal `Z` suffix.
pub fn timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
