use std::collections::VecDeque;

use serde_json::Value;

use crate::ast::{Node, elements_of};
use crate::error::OutlineResult;
use crate::outline_ensure;

/// A loaded query document: the top-level steps of its outermost `let`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// `None` when the input carries no `variableList` at all.
    steps: Option<Vec<Node>>,
}

impl Document {
    /// Build a document from an already-parsed JSON value.
    ///
    /// The `variableList` may sit on the root itself or be nested inside an
    /// envelope such as the parser service's `{ "parseResult": { "root": .. } }`.
    pub fn from_value(root: &Value) -> OutlineResult<Self> {
        outline_ensure!(
            root.is_object() || root.is_array(),
            not_a_tree: "expected a JSON object or array at the top level, found {}",
            json_type(root)
        );

        let steps = find_variable_list(root).map(|list| {
            elements_of(list)
                .map(|items| items.iter().map(Node::from_value).collect())
                .unwrap_or_default()
        });
        Ok(Self { steps })
    }

    /// Construct directly from step nodes.
    pub fn from_steps(steps: Vec<Node>) -> Self {
        Self { steps: Some(steps) }
    }

    pub fn has_variable_list(&self) -> bool {
        self.steps.is_some()
    }

    /// Every element of the `variableList`, in declaration order.
    pub fn steps(&self) -> &[Node] {
        self.steps.as_deref().unwrap_or_default()
    }

    /// Named steps, `Csv` wrappers stripped, in declaration order.
    pub fn named_steps(&self) -> impl Iterator<Item = (&str, Option<&Node>)> {
        self.steps().iter().filter_map(Node::as_step)
    }
}

/// Parse AST JSON text into a [`Document`].
pub fn parse_document(source: &str) -> OutlineResult<Document> {
    let value: Value = serde_json::from_str(source)?;
    Document::from_value(&value)
}

/// Breadth-first search for the shallowest object carrying `variableList`.
fn find_variable_list(root: &Value) -> Option<&Value> {
    let mut queue = VecDeque::from([root]);
    while let Some(value) = queue.pop_front() {
        match value {
            Value::Object(obj) => {
                if let Some(list) = obj.get("variableList") {
                    return Some(list);
                }
                queue.extend(obj.values());
            }
            Value::Array(items) => queue.extend(items),
            _ => {}
        }
    }
    None
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
