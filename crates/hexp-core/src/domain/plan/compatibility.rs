//! Capability satisfaction check.
//!
//! Order-independent: a requirement is met if the base or *any other* addon
//! in the selection provides it. Whether the provider runs first is the
//! dependency resolver's concern.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::domain::entities::{AddonTemplate, BaseTemplate, Capability};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityResult {
    pub is_compatible: bool,
    /// Unmet requirements per addon id, listed in declaration order.
    pub missing_capabilities: BTreeMap<String, Vec<Capability>>,
    pub compatibility_matrix: BTreeMap<String, bool>,
    /// Base capabilities plus everything the addons provide.
    pub all_capabilities: BTreeSet<Capability>,
}

pub struct CompatibilityChecker;

impl CompatibilityChecker {
    pub fn check(base: &BaseTemplate, addons: &[AddonTemplate]) -> CompatibilityResult {
        let mut all_capabilities: BTreeSet<Capability> = base.capabilities.iter().cloned().collect();
        for addon in addons {
            all_capabilities.extend(addon.provides.iter().cloned());
        }

        let mut missing_capabilities = BTreeMap::new();
        let mut compatibility_matrix = BTreeMap::new();

        for addon in addons {
            let missing: Vec<Capability> = addon
                .requires
                .iter()
                .filter(|req| !base.provides(req))
                .filter(|req| {
                    !addons
                        .iter()
                        .any(|other| other.id != addon.id && other.provides_capability(req))
                })
                .cloned()
                .collect();

            compatibility_matrix.insert(addon.id.clone(), missing.is_empty());
            if !missing.is_empty() {
                missing_capabilities.insert(addon.id.clone(), missing);
            }
        }

        CompatibilityResult {
            is_compatible: missing_capabilities.is_empty(),
            missing_capabilities,
            compatibility_matrix,
            all_capabilities,
        }
    }

    /// One header line plus one line per incompatible addon; empty when
    /// everything is satisfied.
    pub fn error_message(result: &CompatibilityResult, base: &BaseTemplate) -> String {
        if result.is_compatible {
            return String::new();
        }

        let mut lines = vec!["Compatibility errors found:".to_string()];
        for (addon_id, missing) in &result.missing_capabilities {
            lines.push(format!(
                "  Addon '{}' requires capabilities [{}] but base '{}' does not provide them",
                addon_id,
                missing.join(", "),
                base.id
            ));
        }
        lines.join("\n")
    }
}
