//! Store configuration.

/// Engine key the index registry set lives under by default.
pub const DEFAULT_REGISTRY_KEY: &str = "indices";

/// Hash field the properties blob is stored under by default.
pub const DEFAULT_PROPERTIES_FIELD: &str = "properties";

/// Tunables for a [`RecordStore`](super::RecordStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Engine key of the set naming every index ever written.
    pub registry_key: String,
    /// Hash field the serialized properties blob is stored under.
    pub properties_field: String,
    /// Whether writes remove index memberships for fields the new blob no
    /// longer carries. Disabled, an update leaves stale memberships behind.
    pub prune_stale_indexes: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            registry_key: DEFAULT_REGISTRY_KEY.to_string(),
            properties_field: DEFAULT_PROPERTIES_FIELD.to_string(),
            prune_stale_indexes: true,
        }
    }
}

impl StoreOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options reproducing the legacy update behavior: index memberships for
    /// dropped fields survive the write.
    pub fn legacy() -> Self {
        Self {
            prune_stale_indexes: false,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = StoreOptions::default();
        assert_eq!(options.registry_key, "indices");
        assert_eq!(options.properties_field, "properties");
        assert!(options.prune_stale_indexes);
    }

    #[test]
    fn test_legacy_only_disables_pruning() {
        let options = StoreOptions::legacy();
        assert!(!options.prune_stale_indexes);
        assert_eq!(options.registry_key, StoreOptions::default().registry_key);
        assert_eq!(
            options.properties_field,
            StoreOptions::default().properties_field
        );
    }
}
