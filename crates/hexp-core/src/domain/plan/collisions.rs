//! Static file-footprint analysis.
//!
//! Looks only at declared destinations, never at the filesystem. Paths are
//! grouped by their normalized spelling so `./src/a.ts` and `src/a.ts`
//! count as the same file.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::domain::entities::{normalize_destination, Operation, OperationKind, TemplateOps};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollisionInfo {
    pub file: String,
    pub operations: Vec<OperationKind>,
    /// Source label per contributing operation, parallel to `operations`.
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollisionResult {
    pub has_collisions: bool,
    pub collisions: Vec<CollisionInfo>,
    /// Colliding path to the labels of everything that writes it.
    pub collision_map: BTreeMap<String, Vec<String>>,
}

struct Writer<'a> {
    op: &'a Operation,
    source: String,
}

pub struct FileCollisionDetector;

impl FileCollisionDetector {
    pub fn check(base: &TemplateOps, addons: &[TemplateOps]) -> CollisionResult {
        let mut order: Vec<String> = Vec::new();
        let mut writers: HashMap<String, Vec<Writer<'_>>> = HashMap::new();

        for template in std::iter::once(base).chain(addons) {
            let source = template.source_label();
            for op in &template.ops {
                let file = normalize_destination(op.destination());
                let entry = writers.entry(file.clone()).or_insert_with(|| {
                    order.push(file);
                    Vec::new()
                });
                entry.push(Writer {
                    op,
                    source: source.clone(),
                });
            }
        }

        let mut collisions = Vec::new();
        let mut collision_map = BTreeMap::new();

        for file in order {
            let Some(group) = writers.remove(&file) else {
                continue;
            };
            if !Self::is_collision(&group) {
                continue;
            }

            let sources: Vec<String> = group.iter().map(|w| w.source.clone()).collect();
            collision_map.insert(file.clone(), sources.clone());
            collisions.push(CollisionInfo {
                file,
                operations: group.iter().map(|w| w.op.kind()).collect(),
                sources,
            });
        }

        CollisionResult {
            has_collisions: !collisions.is_empty(),
            collisions,
            collision_map,
        }
    }

    fn is_collision(group: &[Writer<'_>]) -> bool {
        if group.len() < 2 {
            return false;
        }
        let all_merges = group
            .iter()
            .all(|w| w.op.kind() == OperationKind::JsonMerge);
        let any_overwrite = group.iter().any(|w| w.op.allows_overwrite());
        !(all_merges || any_overwrite)
    }

    pub fn error_message(result: &CollisionResult) -> String {
        if !result.has_collisions {
            return String::new();
        }

        let mut lines = vec!["File collisions detected:".to_string()];
        for collision in &result.collisions {
            let kinds: Vec<&str> = collision.operations.iter().map(|k| k.as_str()).collect();
            lines.push(format!("  File: {}", collision.file));
            lines.push(format!("    Operations: {}", kinds.join(", ")));
            lines.push(format!("    Sources: {}", collision.sources.join(", ")));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::entities::CopyOperation;

    fn template(id: &str, ops: Vec<Operation>) -> TemplateOps {
        TemplateOps::new(id, format!("/t/{id}"), ops)
    }

    #[test]
    fn distinct_destinations_do_not_collide() {
        let base = template("base", vec![Operation::copy("a", "a.txt")]);
        let addon = template("addon", vec![Operation::copy("b", "b.txt")]);
        let result = FileCollisionDetector::check(&base, &[addon]);
        assert!(!result.has_collisions);
        assert!(FileCollisionDetector::error_message(&result).is_empty());
    }

    #[test]
    fn two_copies_to_same_path_collide() {
        let base = template("base", vec![Operation::copy("x", "README.md")]);
        let addon = template("docs", vec![Operation::template_render("x.hbs", "./README.md")]);
        let result = FileCollisionDetector::check(&base, &[addon]);

        assert!(result.has_collisions);
        assert_eq!(
            result.collisions,
            vec![CollisionInfo {
                file: "README.md".into(),
                operations: vec![OperationKind::Copy, OperationKind::TemplateRender],
                sources: vec!["/t/base".into(), "/t/docs".into()],
            }]
        );
        assert_eq!(result.collision_map["README.md"].len(), 2);

        let message = FileCollisionDetector::error_message(&result);
        assert_eq!(
            message,
            "File collisions detected:\n  File: README.md\n    Operations: copy, templateRender\n    Sources: /t/base, /t/docs"
        );
    }

    #[test]
    fn parent_segments_resolve_to_the_same_file() {
        let base = template("base", vec![Operation::copy("x", "docs/../README.md")]);
        let addon = template("docs", vec![Operation::copy("y", "README.md")]);
        let result = FileCollisionDetector::check(&base, &[addon]);

        assert!(result.has_collisions);
        assert_eq!(result.collisions[0].file, "README.md");
    }

    #[test]
    fn json_merges_never_collide() {
        let base = template("base", vec![Operation::json_merge("package.json", json!({"a": 1}))]);
        let a = template("a", vec![Operation::json_merge("package.json", json!({"b": 2}))]);
        let b = template("b", vec![Operation::json_merge("package.json", json!({"c": 3}))]);
        assert!(!FileCollisionDetector::check(&base, &[a, b]).has_collisions);
    }

    #[test]
    fn json_merge_mixed_with_copy_collides() {
        let base = template("base", vec![Operation::copy("p.json", "package.json")]);
        let addon = template("a", vec![Operation::json_merge("package.json", json!({}))]);
        assert!(FileCollisionDetector::check(&base, &[addon]).has_collisions);
    }

    #[test]
    fn explicit_overwrite_suppresses_collision() {
        let base = template("base", vec![Operation::copy("x", "tsconfig.json")]);
        let addon = template(
            "strict",
            vec![CopyOperation::new("y", "tsconfig.json").overwrite(true).into()],
        );
        assert!(!FileCollisionDetector::check(&base, &[addon]).has_collisions);
    }

    #[test]
    fn same_source_twice_is_reported_twice() {
        let base = template(
            "base",
            vec![
                Operation::copy("x", "a.txt"),
                Operation::text_insert("a.txt", "//", "y"),
            ],
        );
        let result = FileCollisionDetector::check(&base, &[]);
        assert_eq!(result.collisions[0].sources, vec!["/t/base".to_string(), "/t/base".to_string()]);
    }

    #[test]
    fn empty_template_dir_falls_back_to_id() {
        let base = TemplateOps::new("base", "", vec![Operation::copy("x", "a")]);
        let addon = TemplateOps::new("addon", "", vec![Operation::copy("y", "a")]);
        let result = FileCollisionDetector::check(&base, &[addon]);
        assert_eq!(result.collisions[0].sources, vec!["base".to_string(), "addon".to_string()]);
    }
}
