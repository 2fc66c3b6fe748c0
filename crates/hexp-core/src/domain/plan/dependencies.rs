//! Capability-driven addon ordering.
//!
//! An edge `A -> B` means "A depends on B": A requires a capability the base
//! lacks and B provides it. Cycles are reported and leave the input order
//! untouched; otherwise addons are ordered with Kahn's algorithm so every
//! provider precedes its dependents.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use serde::{Serialize, Serializer};

use crate::domain::entities::{AddonTemplate, Capability};

fn serialize_ids<S: Serializer>(addons: &[AddonTemplate], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(addons.iter().map(|addon| addon.id.as_str()))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedOrder {
    /// Application order. Equals the input order when `has_cycles` is set.
    #[serde(serialize_with = "serialize_ids")]
    pub ordered_addons: Vec<AddonTemplate>,
    pub has_cycles: bool,
    /// Each cycle starts and ends with the same id.
    pub cycles: Vec<Vec<String>>,
    pub dependency_graph: BTreeMap<String, Vec<String>>,
}

impl ResolvedOrder {
    pub fn ordered_ids(&self) -> Vec<&str> {
        self.ordered_addons.iter().map(|addon| addon.id.as_str()).collect()
    }
}

pub struct DependencyResolver;

impl DependencyResolver {
    pub fn resolve(addons: &[AddonTemplate], base_capabilities: &[Capability]) -> ResolvedOrder {
        let graph = Self::build_graph(addons, base_capabilities);
        let cycles = Self::find_cycles(addons, &graph);

        let ordered_addons = if cycles.is_empty() {
            Self::topological_order(addons, &graph)
        } else {
            addons.to_vec()
        };

        ResolvedOrder {
            ordered_addons,
            has_cycles: !cycles.is_empty(),
            cycles,
            dependency_graph: graph.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        }
    }

    /// Dependencies per addon id, in provider declaration order.
    fn build_graph<'a>(
        addons: &'a [AddonTemplate],
        base_capabilities: &[Capability],
    ) -> HashMap<&'a str, Vec<String>> {
        let mut graph: HashMap<&str, Vec<String>> = HashMap::with_capacity(addons.len());

        for addon in addons {
            let deps = graph.entry(addon.id.as_str()).or_default();
            for required in &addon.requires {
                if base_capabilities.contains(required) {
                    continue;
                }
                for provider in addons {
                    if provider.id != addon.id
                        && provider.provides_capability(required)
                        && !deps.contains(&provider.id)
                    {
                        deps.push(provider.id.clone());
                    }
                }
            }
        }

        graph
    }

    fn find_cycles(addons: &[AddonTemplate], graph: &HashMap<&str, Vec<String>>) -> Vec<Vec<String>> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut on_stack: HashSet<&str> = HashSet::new();
        let mut path: Vec<&str> = Vec::new();
        let mut cycles = Vec::new();

        for addon in addons {
            if !visited.contains(addon.id.as_str()) {
                Self::visit(
                    &addon.id,
                    graph,
                    &mut visited,
                    &mut on_stack,
                    &mut path,
                    &mut cycles,
                );
            }
        }

        cycles
    }

    fn visit<'a>(
        node: &'a str,
        graph: &'a HashMap<&'a str, Vec<String>>,
        visited: &mut HashSet<&'a str>,
        on_stack: &mut HashSet<&'a str>,
        path: &mut Vec<&'a str>,
        cycles: &mut Vec<Vec<String>>,
    ) {
        visited.insert(node);
        on_stack.insert(node);
        path.push(node);

        for dep in graph.get(node).into_iter().flatten() {
            let dep = dep.as_str();
            if on_stack.contains(dep) {
                if let Some(start) = path.iter().position(|id| *id == dep) {
                    let mut cycle: Vec<String> = path[start..].iter().map(|id| id.to_string()).collect();
                    cycle.push(dep.to_string());
                    cycles.push(cycle);
                }
            } else if !visited.contains(dep) {
                Self::visit(dep, graph, visited, on_stack, path, cycles);
            }
        }

        path.pop();
        on_stack.remove(node);
    }

    fn topological_order(
        addons: &[AddonTemplate],
        graph: &HashMap<&str, Vec<String>>,
    ) -> Vec<AddonTemplate> {
        // Remaining unresolved dependencies per addon.
        let mut pending: HashMap<&str, usize> = addons
            .iter()
            .map(|addon| {
                let count = graph.get(addon.id.as_str()).map_or(0, Vec::len);
                (addon.id.as_str(), count)
            })
            .collect();

        let mut queue: VecDeque<&str> = addons
            .iter()
            .map(|addon| addon.id.as_str())
            .filter(|id| pending.get(id) == Some(&0))
            .collect();

        let mut emitted: Vec<&str> = Vec::with_capacity(addons.len());
        while let Some(current) = queue.pop_front() {
            emitted.push(current);
            for dependent in addons {
                let listed = graph
                    .get(dependent.id.as_str())
                    .is_some_and(|deps| deps.iter().any(|d| d == current));
                if !listed {
                    continue;
                }
                if let Some(count) = pending.get_mut(dependent.id.as_str()) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        queue.push_back(dependent.id.as_str());
                    }
                }
            }
        }

        if emitted.len() < addons.len() {
            for addon in addons {
                if !emitted.contains(&addon.id.as_str()) {
                    emitted.push(addon.id.as_str());
                }
            }
        }

        emitted
            .into_iter()
            .filter_map(|id| addons.iter().find(|addon| addon.id == id))
            .cloned()
            .collect()
    }

    pub fn error_message(result: &ResolvedOrder) -> String {
        if !result.has_cycles {
            return String::new();
        }

        let mut lines = vec!["Dependency cycles detected:".to_string()];
        for cycle in &result.cycles {
            lines.push(format!("  Cycle: {}", cycle.join(" -> ")));
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

    fn caps(values: &[&str]) -> Vec<Capability> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn index_of(order: &ResolvedOrder, id: &str) -> usize {
        order
            .ordered_ids()
            .iter()
            .position(|x| *x == id)
            .unwrap_or_else(|| panic!("{id} missing from order"))
    }

    #[test]
    fn provider_is_moved_before_dependent() {
        let addons = vec![
            addon("addon-b").requiring(["cap-a"]),
            addon("addon-a").requiring(["web-server"]).providing(["cap-a"]),
        ];
        let order = DependencyResolver::resolve(&addons, &caps(&["web-server"]));

        assert!(!order.has_cycles);
        assert_eq!(order.ordered_ids(), vec!["addon-a", "addon-b"]);
        assert_eq!(order.dependency_graph["addon-b"], vec!["addon-a".to_string()]);
        assert!(order.dependency_graph["addon-a"].is_empty());
    }

    #[test]
    fn base_capabilities_add_no_edges() {
        let addons = vec![addon("x").requiring(["web-server"]), addon("y").providing(["web-server"])];
        let order = DependencyResolver::resolve(&addons, &caps(&["web-server"]));
        assert!(order.dependency_graph["x"].is_empty());
        assert_eq!(order.ordered_ids(), vec!["x", "y"]);
    }

    #[test]
    fn unprovided_requirement_adds_no_edge() {
        let addons = vec![addon("x").requiring(["nobody-has-this"])];
        let order = DependencyResolver::resolve(&addons, &[]);
        assert!(!order.has_cycles);
        assert_eq!(order.ordered_ids(), vec!["x"]);
    }

    #[test]
    fn every_provider_becomes_a_dependency_once() {
        let addons = vec![
            addon("consumer").requiring(["db", "cache"]),
            addon("redis").providing(["db", "cache"]),
            addon("postgres").providing(["db"]),
        ];
        let order = DependencyResolver::resolve(&addons, &[]);
        assert_eq!(
            order.dependency_graph["consumer"],
            vec!["redis".to_string(), "postgres".to_string()]
        );
        assert_eq!(index_of(&order, "consumer"), 2);
    }

    #[test]
    fn mutual_dependency_is_a_cycle() {
        let addons = vec![
            addon("a").requiring(["cap-b"]).providing(["cap-a"]),
            addon("b").requiring(["cap-a"]).providing(["cap-b"]),
        ];
        let order = DependencyResolver::resolve(&addons, &[]);

        assert!(order.has_cycles);
        assert_eq!(order.cycles, vec![vec!["a".to_string(), "b".to_string(), "a".to_string()]]);
        assert_eq!(order.ordered_ids(), vec!["a", "b"]);
        assert_eq!(
            DependencyResolver::error_message(&order),
            "Dependency cycles detected:\n  Cycle: a -> b -> a"
        );
    }

    #[test]
    fn cycle_keeps_input_order() {
        let addons = vec![
            addon("c").requiring(["cap-a"]),
            addon("a").requiring(["cap-b"]).providing(["cap-a"]),
            addon("b").requiring(["cap-a"]).providing(["cap-b"]),
        ];
        let order = DependencyResolver::resolve(&addons, &[]);
        assert!(order.has_cycles);
        assert_eq!(order.ordered_ids(), vec!["c", "a", "b"]);
    }

    #[test]
    fn dag_chain_respects_every_edge_across_runs() {
        let addons = vec![
            addon("d").requiring(["c"]),
            addon("b").requiring(["a"]).providing(["b"]),
            addon("c").requiring(["a", "b"]).providing(["c"]),
            addon("a").providing(["a"]),
            addon("lone").providing(["z"]),
        ];

        for _ in 0..2 {
            let order = DependencyResolver::resolve(&addons, &[]);
            assert!(!order.has_cycles);
            assert_eq!(order.ordered_addons.len(), addons.len());
            for (dependent, deps) in &order.dependency_graph {
                for dep in deps {
                    assert!(index_of(&order, dep) < index_of(&order, dependent));
                }
            }
        }
    }

    #[test]
    fn error_message_empty_without_cycles() {
        let order = DependencyResolver::resolve(&[addon("a")], &[]);
        assert!(DependencyResolver::error_message(&order).is_empty());
    }
}
