//! Database ID type definition.

use uuid::Uuid;

/// Alias for the string type used for mapping to database IDs.
///
/// IDs are random UUIDs generated by the server when a record is created.
pub type DatabaseId = String;

/// Generate a fresh, random ID for a new record.
pub fn new_database_id() -> DatabaseId {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::new_database_id;

    #[test]
    fn generates_distinct_uuids() {
        let first = new_database_id();
        let second = new_database_id();

        assert_ne!(first, second);
        assert!(Uuid::parse_str(&first).is_ok(), "{first} is not a UUID");
    }
}
