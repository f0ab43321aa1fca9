//! Resource Registry - Load resource definitions from JSON
//!
//! Every Paystack resource group (customers, transfers, ...) is described in
//! embedded JSON files: a base path plus the operations it supports.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Embedded resource JSON files (compiled into the binary)
const RESOURCE_FILES: &[&str] = &[
    include_str!("../resources/payments.json"),
    include_str!("../resources/customers.json"),
    include_str!("../resources/transfers.json"),
    include_str!("../resources/platform.json"),
];

/// HTTP method of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// Operation definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct OperationDef {
    pub name: String,
    pub method: OperationMethod,
    /// Path below the resource's base path; `{name}` segments are filled
    /// from call arguments
    #[serde(default)]
    pub path: String,
}

impl OperationDef {
    /// Names of the `{placeholders}` in the path, in order
    pub fn placeholders(&self) -> Vec<&str> {
        self.path
            .split('/')
            .filter_map(|segment| segment.strip_prefix('{')?.strip_suffix('}'))
            .collect()
    }
}

/// Resource definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDef {
    pub display_name: String,
    /// Path below the API root, e.g. `/customer`; empty for root-level groups
    #[serde(default)]
    pub base_path: String,
    pub operations: Vec<OperationDef>,
}

impl ResourceDef {
    pub fn operation(&self, name: &str) -> Option<&OperationDef> {
        self.operations.iter().find(|op| op.name == name)
    }
}

/// Root structure of resources/*.json
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceConfig {
    #[serde(default)]
    pub resources: HashMap<String, ResourceDef>,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<ResourceConfig> = OnceLock::new();

/// Get the resource registry (loads from embedded JSON on first access)
pub fn get_registry() -> &'static ResourceConfig {
    REGISTRY.get_or_init(|| {
        let mut final_config = ResourceConfig {
            resources: HashMap::new(),
        };

        for content in RESOURCE_FILES {
            let partial: ResourceConfig = serde_json::from_str(content)
                .unwrap_or_else(|e| panic!("Failed to parse embedded resource JSON: {}", e));
            final_config.resources.extend(partial.resources);
        }

        final_config
    })
}

/// Get a resource definition by key
pub fn get_resource(key: &str) -> Option<&'static ResourceDef> {
    get_registry().resources.get(key)
}

/// Get all resource keys
pub fn get_all_resource_keys() -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = get_registry()
        .resources
        .keys()
        .map(|s| s.as_str())
        .collect();
    keys.sort_unstable();
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_loads_successfully() {
        let registry = get_registry();
        assert_eq!(registry.resources.len(), 23, "Registry should have 23 resource groups");
    }

    #[test]
    fn test_customers_resource_exists() {
        let resource = get_resource("customers").expect("Customers resource should exist");
        assert_eq!(resource.display_name, "Customers");
        assert_eq!(resource.base_path, "/customer");

        let fetch = resource.operation("fetch").unwrap();
        assert_eq!(fetch.method, OperationMethod::Get);
        assert_eq!(fetch.placeholders(), vec!["email_or_code"]);
    }

    #[test]
    fn test_operation_names_are_unique_per_resource() {
        for (key, resource) in &get_registry().resources {
            let mut names: Vec<&str> = resource.operations.iter().map(|o| o.name.as_str()).collect();
            let total = names.len();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), total, "Duplicate operation name in {}", key);
        }
    }

    #[test]
    fn test_paths_are_rooted() {
        for (key, resource) in &get_registry().resources {
            assert!(
                resource.base_path.is_empty() || resource.base_path.starts_with('/'),
                "Base path of {} must start with /",
                key
            );
            for op in &resource.operations {
                assert!(
                    op.path.is_empty() || op.path.starts_with('/'),
                    "Path of {}.{} must start with /",
                    key,
                    op.name
                );
            }
        }
    }

    #[test]
    fn test_empty_path_only_for_get_and_post() {
        for resource in get_registry().resources.values() {
            for op in &resource.operations {
                if op.path.is_empty() {
                    assert!(matches!(op.method, OperationMethod::Get | OperationMethod::Post));
                }
            }
        }
    }

    #[test]
    fn test_multiple_placeholders() {
        let terminal = get_resource("terminal").unwrap();
        let op = terminal.operation("fetch_event_status").unwrap();
        assert_eq!(op.placeholders(), vec!["terminal_id", "event_id"]);
    }

    #[test]
    fn test_get_all_resource_keys_sorted() {
        let keys = get_all_resource_keys();
        assert_eq!(keys.first(), Some(&"apple_pay"));
        assert!(keys.contains(&"verification"));
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }
}
