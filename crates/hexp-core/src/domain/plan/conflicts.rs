//! Pairwise addon conflicts and substitute suggestions.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::entities::AddonTemplate;

/// A declared incompatibility between two selected addons.
///
/// `addon1` is the side that declared the conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictInfo {
    pub addon1: String,
    pub addon2: String,
    pub reason: String,
}

impl ConflictInfo {
    fn new(declarer: &str, other: &str) -> Self {
        Self {
            addon1: declarer.to_string(),
            addon2: other.to_string(),
            reason: format!("Addon '{declarer}' conflicts with '{other}'"),
        }
    }

    fn involves_pair(&self, a: &str, b: &str) -> bool {
        (self.addon1 == a && self.addon2 == b) || (self.addon1 == b && self.addon2 == a)
    }

    pub fn involves(&self, addon_id: &str) -> bool {
        self.addon1 == addon_id || self.addon2 == addon_id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictResult {
    pub has_conflicts: bool,
    pub conflicts: Vec<ConflictInfo>,
    /// Substitutes for `addon2` of a conflict, keyed by that addon's id.
    pub suggestions: BTreeMap<String, Vec<String>>,
}

pub struct ConflictDetector;

impl ConflictDetector {
    pub fn check(addons: &[AddonTemplate]) -> ConflictResult {
        let mut conflicts: Vec<ConflictInfo> = Vec::new();

        for (i, first) in addons.iter().enumerate() {
            for second in &addons[i + 1..] {
                if first.conflicts_with(&second.id) {
                    conflicts.push(ConflictInfo::new(&first.id, &second.id));
                }
                if second.conflicts_with(&first.id)
                    && !conflicts.iter().any(|c| c.involves_pair(&first.id, &second.id))
                {
                    conflicts.push(ConflictInfo::new(&second.id, &first.id));
                }
            }
        }

        let mut suggestions = BTreeMap::new();
        for conflict in &conflicts {
            let alternatives = Self::alternatives(addons, &conflict.addon1, &conflict.addon2);
            if !alternatives.is_empty() {
                suggestions.insert(conflict.addon2.clone(), alternatives);
            }
        }

        ConflictResult {
            has_conflicts: !conflicts.is_empty(),
            conflicts,
            suggestions,
        }
    }

    /// Addons that could stand in for `replaced` next to `kept`: they share a
    /// provided capability with `replaced` and no conflict in either
    /// direction with `kept`.
    fn alternatives(addons: &[AddonTemplate], kept: &str, replaced: &str) -> Vec<String> {
        let (Some(kept), Some(replaced)) = (
            addons.iter().find(|a| a.id == kept),
            addons.iter().find(|a| a.id == replaced),
        ) else {
            return Vec::new();
        };

        addons
            .iter()
            .filter(|candidate| candidate.id != kept.id && candidate.id != replaced.id)
            .filter(|candidate| {
                replaced
                    .provides
                    .iter()
                    .any(|cap| candidate.provides_capability(cap))
            })
            .filter(|candidate| !candidate.conflicts_with(&kept.id) && !kept.conflicts_with(&candidate.id))
            .map(|candidate| candidate.id.clone())
            .collect()
    }

    pub fn error_message(result: &ConflictResult) -> String {
        if !result.has_conflicts {
            return String::new();
        }

        let mut lines = vec!["Conflicts detected between addons:".to_string()];
        for conflict in &result.conflicts {
            lines.push(format!("  {}", conflict.reason));
            if let Some(alternatives) = result.suggestions.get(&conflict.addon2) {
                lines.push(format!(
                    "    Suggested alternatives for '{}': {}",
                    conflict.addon2,
                    alternatives.join(", ")
                ));
            }
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addon(id: &str) -> AddonTemplate {
        AddonTemplate::new(id, id, "test addon")
    }

    #[test]
    fn no_conflicts_when_none_declared() {
        let addons = vec![addon("a").providing(["x"]), addon("b").providing(["y"])];
        let result = ConflictDetector::check(&addons);
        assert!(!result.has_conflicts);
        assert!(ConflictDetector::error_message(&result).is_empty());
    }

    #[test]
    fn forward_declaration_detected() {
        let addons = vec![addon("addon-1").conflicting_with(["addon-2"]), addon("addon-2").providing(["x"])];
        let result = ConflictDetector::check(&addons);
        assert_eq!(result.conflicts, vec![ConflictInfo::new("addon-1", "addon-2")]);
    }

    #[test]
    fn reverse_declaration_detected_with_declarer_first() {
        let addons = vec![addon("a").providing(["x"]), addon("b").conflicting_with(["a"])];
        let result = ConflictDetector::check(&addons);
        assert!(result.has_conflicts);
        assert_eq!(result.conflicts.len(), 1);
        assert_eq!(result.conflicts[0].addon1, "b");
        assert_eq!(result.conflicts[0].addon2, "a");
    }

    #[test]
    fn mutual_declaration_reported_once() {
        let addons = vec![
            addon("a").conflicting_with(["b"]),
            addon("b").conflicting_with(["a"]),
        ];
        let result = ConflictDetector::check(&addons);
        assert_eq!(result.conflicts.len(), 1);
        assert!(result.conflicts[0].involves("a"));
        assert!(result.conflicts[0].involves("b"));
    }

    #[test]
    fn conflict_with_unselected_addon_is_ignored() {
        let addons = vec![addon("a").conflicting_with(["not-selected"])];
        assert!(!ConflictDetector::check(&addons).has_conflicts);
    }

    #[test]
    fn suggests_alternatives_sharing_a_capability() {
        let addons = vec![
            addon("auth-clerk").conflicting_with(["auth-next"]),
            addon("auth-next").providing(["auth"]),
            addon("auth-lucia").providing(["auth"]),
            addon("auth-bad").providing(["auth"]).conflicting_with(["auth-clerk"]),
            addon("unrelated").providing(["orm"]),
        ];
        let result = ConflictDetector::check(&addons);

        assert_eq!(result.conflicts.len(), 2);
        assert_eq!(
            result.suggestions.get("auth-next"),
            Some(&vec!["auth-lucia".to_string()])
        );

        let message = ConflictDetector::error_message(&result);
        assert!(message.starts_with("Conflicts detected between addons:"));
        assert!(message.contains("  Addon 'auth-clerk' conflicts with 'auth-next'"));
        assert!(message.contains("    Suggested alternatives for 'auth-next': auth-lucia"));
    }
}
