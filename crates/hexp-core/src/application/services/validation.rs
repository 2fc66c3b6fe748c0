//! Validation orchestrator - the "plan" half of plan-then-execute.
//!
//! Runs Compatibility, Conflicts, Dependencies and Collisions in that order.
//! No stage short-circuits: every failing stage contributes exactly one
//! aggregated message to `errors`, so a selection can be reported as both
//! incompatible and cyclic in one pass.

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::domain::{
    AddonTemplate, BaseTemplate, CollisionResult, CompatibilityChecker, CompatibilityResult,
    ConflictDetector, ConflictResult, DependencyResolver, FileCollisionDetector, ResolvedOrder,
    TemplateOps,
};

/// Outcome of every plan check.
///
/// `dependencies.ordered_addons` is filled even when the plan is invalid,
/// but only an `is_valid` result may be executed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    /// Non-blocking observations.
    pub warnings: Vec<String>,
    pub compatibility: CompatibilityResult,
    pub conflicts: ConflictResult,
    pub dependencies: ResolvedOrder,
    pub collisions: CollisionResult,
}

impl ValidationResult {
    /// Addons in the order they must be applied.
    pub fn ordered_addons(&self) -> &[AddonTemplate] {
        &self.dependencies.ordered_addons
    }
}

#[instrument(skip_all, fields(base = %base.id, addons = addons.len()))]
pub fn validate_generation_plan(
    base: &BaseTemplate,
    addons: &[AddonTemplate],
    base_ops: &TemplateOps,
    addon_ops: &[TemplateOps],
) -> ValidationResult {
    let mut errors = Vec::new();

    let compatibility = CompatibilityChecker::check(base, addons);
    if !compatibility.is_compatible {
        errors.push(CompatibilityChecker::error_message(&compatibility, base));
    }

    let conflicts = ConflictDetector::check(addons);
    if conflicts.has_conflicts {
        errors.push(ConflictDetector::error_message(&conflicts));
    }

    let dependencies = DependencyResolver::resolve(addons, &base.capabilities);
    if dependencies.has_cycles {
        errors.push(DependencyResolver::error_message(&dependencies));
    }

    let collisions = FileCollisionDetector::check(base_ops, addon_ops);
    if collisions.has_collisions {
        errors.push(FileCollisionDetector::error_message(&collisions));
    }

    let warnings = conflict_dependent_warnings(base, addons, &conflicts);
    for warning in &warnings {
        warn!("{warning}");
    }

    let is_valid = errors.is_empty();
    info!(is_valid, errors = errors.len(), "plan validated");

    ValidationResult {
        is_valid,
        errors,
        warnings,
        compatibility,
        conflicts,
        dependencies,
        collisions,
    }
}

/// Validate using each template's own operation list. Collision sources are
/// reported by template id.
pub fn validate_templates(base: &BaseTemplate, addons: &[AddonTemplate]) -> ValidationResult {
    let base_ops = TemplateOps::new(base.id.clone(), "", base.ops.clone());
    let addon_ops: Vec<TemplateOps> = addons
        .iter()
        .map(|addon| TemplateOps::new(addon.id.clone(), "", addon.ops.clone()))
        .collect();
    validate_generation_plan(base, addons, &base_ops, &addon_ops)
}

/// Requirements met only by addons that take part in a conflict. Compatibility
/// counts those providers, but resolving the conflict may remove them.
fn conflict_dependent_warnings(
    base: &BaseTemplate,
    addons: &[AddonTemplate],
    conflicts: &ConflictResult,
) -> Vec<String> {
    if !conflicts.has_conflicts {
        return Vec::new();
    }

    let mut warnings = Vec::new();
    for addon in addons {
        for required in &addon.requires {
            if base.provides(required) {
                continue;
            }
            let providers: Vec<&str> = addons
                .iter()
                .filter(|other| other.id != addon.id && other.provides_capability(required))
                .map(|other| other.id.as_str())
                .collect();
            let all_conflicted = !providers.is_empty()
                && providers
                    .iter()
                    .all(|id| conflicts.conflicts.iter().any(|c| c.involves(id)));
            if all_conflicted {
                warnings.push(format!(
                    "Addon '{}' relies on '{}' from addons involved in a conflict: {}",
                    addon.id,
                    required,
                    providers.join(", ")
                ));
            }
        }
    }
    warnings
}
