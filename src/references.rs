//! Step dependency extraction.
//!
//! A step references another step when an `IdentifierExpression` naming it
//! is reachable from the step's value through dependency-carrying nodes
//! (arithmetic, invocation chains, argument wrappers). Identifiers inside
//! function bodies and list literals are not tracked, and names that are
//! not declared steps are dropped.

use std::collections::{BTreeMap, BTreeSet};

use crate::ast::Node;
use crate::document::Document;
use crate::visitor::{AstVisitor, walk_node};

/// Step name -> sorted names of the sibling steps it references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceMap {
    entries: BTreeMap<String, Vec<String>>,
}

impl ReferenceMap {
    /// References of `step`; empty when the step is unknown or references nothing.
    pub fn get(&self, step: &str) -> &[String] {
        self.entries.get(step).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(&self, step: &str) -> bool {
        self.entries.contains_key(step)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(step, refs)| (step.as_str(), refs.as_slice()))
    }
}

/// Names of all declared top-level steps.
pub fn step_universe(document: &Document) -> BTreeSet<String> {
    document
        .named_steps()
        .map(|(key, _)| key.to_string())
        .collect()
}

/// Build the reference map for every top-level step of `document`.
///
/// When a key is declared twice, the later declaration wins.
pub fn extract_references(document: &Document) -> ReferenceMap {
    let mut definitions: BTreeMap<&str, Option<&Node>> = BTreeMap::new();
    for (key, value) in document.named_steps() {
        definitions.insert(key, value);
    }
    let universe = step_universe(document);

    let entries = definitions
        .into_iter()
        .map(|(key, value)| {
            let refs = value
                .map(|v| step_references(v, &universe))
                .unwrap_or_default();
            (key.to_string(), refs)
        })
        .collect();

    #[cfg(feature = "telemetry")]
    tracing::debug!(steps = universe.len(), "extracted step references");

    ReferenceMap { entries }
}

/// Sorted step names from `universe` referenced by `value`.
pub fn step_references(value: &Node, universe: &BTreeSet<String>) -> Vec<String> {
    let found: BTreeSet<String> = collect_identifiers(value)
        .into_iter()
        .filter(|name| universe.contains(name))
        .collect();
    found.into_iter().collect()
}

/// Every identifier reachable through dependency-carrying nodes, in walk order.
pub fn collect_identifiers(value: &Node) -> Vec<String> {
    struct Identifiers(Vec<String>);

    impl AstVisitor for Identifiers {
        fn visit_identifier(&mut self, name: &str) {
            self.0.push(name.to_string());
        }

        fn descend(&mut self, node: &Node) -> bool {
            node.carries_references()
        }
    }

    let mut visitor = Identifiers(Vec::new());
    walk_node(value, &mut visitor);
    visitor.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn ident(name: &str) -> Value {
        json!({ "kind": "IdentifierExpression", "identifier": { "literal": name } })
    }

    fn step(name: &str, value: Value) -> Value {
        json!({ "kind": "IdentifierPairedExpression", "key": { "literal": name }, "value": value })
    }

    fn doc(steps: Vec<Value>) -> Document {
        Document::from_value(&json!({ "variableList": { "elements": steps } })).unwrap()
    }

    fn universe(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn descends_through_invocation_chains() {
        let value = Node::from_value(&json!({
            "kind": "RecursivePrimaryExpression",
            "head": ident("Table.SelectRows"),
            "recursiveExpressions": { "elements": [
                { "kind": "InvokeExpression", "content": {
                    "kind": "ArrayWrapper",
                    "elements": [
                        { "kind": "Csv", "node": ident("Source") },
                        { "kind": "Csv", "node": ident("Other") },
                    ],
                } },
            ] },
        }));

        assert_eq!(
            collect_identifiers(&value),
            vec!["Table.SelectRows", "Source", "Other"]
        );
        assert_eq!(
            step_references(&value, &universe(&["Source", "Other", "Unused"])),
            vec!["Other", "Source"]
        );
    }

    #[test]
    fn ignores_functions_and_lists() {
        let value = Node::from_value(&json!({
            "kind": "ArithmeticExpression",
            "left": {
                "kind": "FunctionExpression",
                "parameters": [],
                "body": ident("a"),
            },
            "operatorConstant": "&",
            "right": { "kind": "ListExpression", "elements": [ident("b")] },
        }));

        assert!(collect_identifiers(&value).is_empty());
    }

    #[test]
    fn bare_identifier_value_is_a_reference() {
        let value = Node::from_value(&ident("a"));
        assert_eq!(step_references(&value, &universe(&["a"])), vec!["a"]);
    }

    #[test]
    fn one_entry_per_step() {
        let map = extract_references(&doc(vec![
            step("a", json!({ "kind": "LiteralExpression", "literal": 1 })),
            step("b", json!({
                "kind": "ArithmeticExpression",
                "left": ident("a"),
                "operatorConstant": "+",
                "right": ident("Global"),
            })),
            step("c", ident("c")),
        ]));

        assert_eq!(map.len(), 3);
        assert!(map.get("a").is_empty());
        assert_eq!(map.get("b"), ["a".to_string()]);
        assert_eq!(map.get("c"), ["c".to_string()]);
        assert!(map.get("missing").is_empty());
        assert!(!map.contains("missing"));
    }

    #[test]
    fn later_duplicate_wins() {
        let map = extract_references(&doc(vec![
            step("x", json!({ "kind": "LiteralExpression", "literal": 1 })),
            step("y", ident("x")),
            step("y", json!({ "kind": "LiteralExpression", "literal": 2 })),
        ]));

        assert_eq!(map.len(), 2);
        assert!(map.get("y").is_empty());
    }

    #[test]
    fn step_without_value_has_empty_entry() {
        let map = extract_references(&doc(vec![json!({
            "kind": "IdentifierPairedExpression",
            "key": { "literal": "lonely" },
        })]));

        assert!(map.contains("lonely"));
        assert!(map.get("lonely").is_empty());
    }

    #[test]
    fn no_variable_list_means_empty_map() {
        let document = Document::from_value(&json!({ "kind": "LiteralExpression" })).unwrap();
        assert!(extract_references(&document).is_empty());
    }
}
