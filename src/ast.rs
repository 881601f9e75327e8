//! Typed view of the Power Query parser's JSON AST.
//!
//! The parser hands us loosely-typed JSON objects dispatched on a `kind`
//! string. [`Node::from_value`] converts them once into a closed enum so the
//! rest of the crate can match exhaustively. Conversion never fails: absent
//! or malformed fields become `None`/empty, and kinds outside the recognized
//! set become [`Node::Unhandled`].

use serde_json::{Map, Value};

/// Node kinds with a dedicated rendering, in the order `kinds` lists them.
pub const RECOGNIZED_KINDS: &[(&str, &str)] = &[
    (
        "IdentifierPairedExpression",
        "<key> = <value>, followed by the step's reference list",
    ),
    ("LetExpression", "Let, the nested steps, then In"),
    ("ListExpression", "List(<element>, ...)"),
    ("FunctionExpression", "Function(<parameter>, ...) => <body>"),
    ("ArithmeticExpression", "(<left> <operator> <right>)"),
    ("RecursivePrimaryExpression", "<head>(<tail>, ...)"),
    ("InvokeExpression", "Invoke(<content>)"),
    ("ArrayWrapper", "<element>, <element>, ..."),
    ("IdentifierExpression", "the identifier literal"),
    ("LiteralExpression", "the literal's textual form"),
    ("Csv", "the wrapped node, unchanged"),
];

/// One AST node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// `name = expression`, one step of a `let`.
    IdentifierPaired {
        key: Option<String>,
        value: Option<Box<Node>>,
    },
    Let {
        expressions: Vec<Node>,
    },
    List {
        elements: Vec<Node>,
    },
    Function {
        parameters: Vec<Node>,
        body: Option<Box<Node>>,
    },
    Arithmetic {
        left: Option<Box<Node>>,
        operator: Option<String>,
        right: Option<Box<Node>>,
    },
    /// A head followed by chained invocation / member-access tails.
    RecursivePrimary {
        head: Option<Box<Node>>,
        recursive_expressions: Vec<Node>,
    },
    Invoke {
        content: Option<Box<Node>>,
    },
    ArrayWrapper {
        elements: Vec<Node>,
    },
    Identifier {
        literal: Option<String>,
    },
    Literal {
        value: Value,
    },
    /// Comma-separated element wrapper emitted by the parser.
    Csv {
        node: Option<Box<Node>>,
    },
    /// Any kind without a dedicated rendering.
    Unhandled {
        kind: String,
    },
    /// A non-node value that already is text.
    Text(String),
}

impl Node {
    /// Convert a raw JSON value into a node.
    pub fn from_value(value: &Value) -> Node {
        let obj = match value {
            Value::Object(obj) => obj,
            Value::String(s) => return Node::Text(s.clone()),
            other => return Node::Text(literal_text(other)),
        };

        let kind = obj.get("kind").and_then(Value::as_str).unwrap_or("Unknown");
        match kind {
            "IdentifierPairedExpression" => Node::IdentifierPaired {
                key: obj.get("key").and_then(literal_of),
                value: child(obj, "value"),
            },
            "LetExpression" => Node::Let {
                expressions: sequence(obj, "expressions")
                    .or_else(|| sequence(obj, "variableList"))
                    .unwrap_or_default(),
            },
            "ListExpression" => Node::List {
                elements: sequence(obj, "elements").unwrap_or_default(),
            },
            "FunctionExpression" => Node::Function {
                parameters: sequence(obj, "parameters").unwrap_or_default(),
                body: child(obj, "body"),
            },
            "ArithmeticExpression" => Node::Arithmetic {
                left: child(obj, "left"),
                operator: obj.get("operatorConstant").and_then(operator_of),
                right: child(obj, "right"),
            },
            "RecursivePrimaryExpression" => Node::RecursivePrimary {
                head: child(obj, "head"),
                recursive_expressions: sequence(obj, "recursiveExpressions").unwrap_or_default(),
            },
            "InvokeExpression" => Node::Invoke {
                content: child(obj, "content"),
            },
            "ArrayWrapper" => Node::ArrayWrapper {
                elements: sequence(obj, "elements").unwrap_or_default(),
            },
            "IdentifierExpression" => Node::Identifier {
                literal: obj.get("identifier").and_then(literal_of),
            },
            "LiteralExpression" => Node::Literal {
                value: obj.get("literal").cloned().unwrap_or(Value::Null),
            },
            "Csv" => Node::Csv {
                node: child(obj, "node"),
            },
            other => Node::Unhandled {
                kind: other.to_string(),
            },
        }
    }

    /// The parser's kind name for this node.
    pub fn kind(&self) -> &str {
        match self {
            Node::IdentifierPaired { .. } => "IdentifierPairedExpression",
            Node::Let { .. } => "LetExpression",
            Node::List { .. } => "ListExpression",
            Node::Function { .. } => "FunctionExpression",
            Node::Arithmetic { .. } => "ArithmeticExpression",
            Node::RecursivePrimary { .. } => "RecursivePrimaryExpression",
            Node::Invoke { .. } => "InvokeExpression",
            Node::ArrayWrapper { .. } => "ArrayWrapper",
            Node::Identifier { .. } => "IdentifierExpression",
            Node::Literal { .. } => "LiteralExpression",
            Node::Csv { .. } => "Csv",
            Node::Unhandled { kind } => kind,
            Node::Text(_) => "Text",
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::IdentifierPaired { value, .. } => value.as_deref().into_iter().collect(),
            Node::Let { expressions } => expressions.iter().collect(),
            Node::List { elements } | Node::ArrayWrapper { elements } => elements.iter().collect(),
            Node::Function { parameters, body } => {
                parameters.iter().chain(body.as_deref()).collect()
            }
            Node::Arithmetic { left, right, .. } => {
                left.as_deref().into_iter().chain(right.as_deref()).collect()
            }
            Node::RecursivePrimary {
                head,
                recursive_expressions,
            } => head
                .as_deref()
                .into_iter()
                .chain(recursive_expressions.iter())
                .collect(),
            Node::Invoke { content } => content.as_deref().into_iter().collect(),
            Node::Csv { node } => node.as_deref().into_iter().collect(),
            Node::Identifier { .. }
            | Node::Literal { .. }
            | Node::Unhandled { .. }
            | Node::Text(_) => Vec::new(),
        }
    }

    /// Whether identifiers below this node count as step dependencies.
    ///
    /// Function bodies and list literals are deliberately excluded.
    pub fn carries_references(&self) -> bool {
        matches!(
            self,
            Node::Arithmetic { .. }
                | Node::RecursivePrimary { .. }
                | Node::Invoke { .. }
                | Node::ArrayWrapper { .. }
                | Node::Csv { .. }
        )
    }

    /// Strip any `Csv` wrappers.
    pub fn unwrap_csv(&self) -> &Node {
        let mut cur = self;
        while let Node::Csv { node: Some(inner) } = cur {
            cur = inner.as_ref();
        }
        cur
    }

    /// `(key, value)` when this node (behind any `Csv`) defines a step.
    pub fn as_step(&self) -> Option<(&str, Option<&Node>)> {
        match self.unwrap_csv() {
            Node::IdentifierPaired {
                key: Some(key),
                value,
            } => Some((key.as_str(), value.as_deref())),
            _ => None,
        }
    }
}

/// Textual form of a scalar, spelled the way the parser's Python tooling
/// prints it: strings verbatim, `True`/`False`, `None` for null.
///
/// Numbers, arrays and objects use their JSON text.
pub fn literal_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Null => "None".to_string(),
        other => other.to_string(),
    }
}

/// An explicit `null` is kept as a `None` text node; only an absent field
/// falls back to a placeholder.
fn child(obj: &Map<String, Value>, field: &str) -> Option<Box<Node>> {
    obj.get(field).map(|v| Box::new(Node::from_value(v)))
}

/// A sequence field may be a bare array or an `ArrayWrapper`-shaped object.
fn sequence(obj: &Map<String, Value>, field: &str) -> Option<Vec<Node>> {
    elements_of(obj.get(field)?).map(|items| items.iter().map(Node::from_value).collect())
}

pub(crate) fn elements_of(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(obj) => obj.get("elements").and_then(Value::as_array),
        _ => None,
    }
}

fn literal_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj.get("literal").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

fn operator_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj
            .get("constantKind")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_recognized_kinds() {
        let node = Node::from_value(&json!({
            "kind": "ArithmeticExpression",
            "left": { "kind": "IdentifierExpression", "identifier": { "literal": "x" } },
            "operatorConstant": { "kind": "Constant", "constantKind": "+" },
            "right": { "kind": "LiteralExpression", "literal": 1 },
        }));

        assert_eq!(
            node,
            Node::Arithmetic {
                left: Some(Box::new(Node::Identifier {
                    literal: Some("x".into())
                })),
                operator: Some("+".into()),
                right: Some(Box::new(Node::Literal { value: json!(1) })),
            }
        );
        assert_eq!(node.kind(), "ArithmeticExpression");
        assert_eq!(node.children().len(), 2);
    }

    #[test]
    fn unknown_kind_keeps_its_name() {
        let node = Node::from_value(&json!({ "kind": "MysteryExpression", "foo": 1 }));
        assert_eq!(
            node,
            Node::Unhandled {
                kind: "MysteryExpression".into()
            }
        );

        let kindless = Node::from_value(&json!({ "literal": 3 }));
        assert_eq!(kindless.kind(), "Unknown");
    }

    #[test]
    fn non_objects_become_text() {
        assert_eq!(Node::from_value(&json!("raw")), Node::Text("raw".into()));
        assert_eq!(Node::from_value(&json!(7)), Node::Text("7".into()));
    }

    #[test]
    fn sequences_accept_wrapper_or_array() {
        let wrapped = Node::from_value(&json!({
            "kind": "FunctionExpression",
            "parameters": { "kind": "ArrayWrapper", "elements": ["a", "b"] },
        }));
        let bare = Node::from_value(&json!({
            "kind": "FunctionExpression",
            "parameters": ["a", "b"],
        }));
        assert_eq!(wrapped, bare);
        match wrapped {
            Node::Function { parameters, body } => {
                assert_eq!(parameters.len(), 2);
                assert!(body.is_none());
            }
            other => panic!("unexpected node: {other:?}"),
        }
    }

    #[test]
    fn let_falls_back_to_variable_list() {
        let node = Node::from_value(&json!({
            "kind": "LetExpression",
            "variableList": { "elements": [
                { "kind": "IdentifierPairedExpression", "key": { "literal": "a" } }
            ] },
        }));
        match node {
            Node::Let { expressions } => assert_eq!(expressions.len(), 1),
            other => panic!("unexpected node: {other:?}"),
        }
    }

    #[test]
    fn csv_wrappers_are_seen_through() {
        let node = Node::from_value(&json!({
            "kind": "Csv",
            "node": {
                "kind": "IdentifierPairedExpression",
                "key": "Source",
                "value": { "kind": "LiteralExpression", "literal": "1" },
            },
        }));
        let (key, value) = node.as_step().expect("csv-wrapped step");
        assert_eq!(key, "Source");
        assert_eq!(value.map(Node::kind), Some("LiteralExpression"));
    }

    #[test]
    fn literal_text_uses_python_spelling() {
        assert_eq!(literal_text(&json!("\"Alice\"")), "\"Alice\"");
        assert_eq!(literal_text(&json!(2.5)), "2.5");
        assert_eq!(literal_text(&json!(true)), "True");
        assert_eq!(literal_text(&json!(false)), "False");
        assert_eq!(literal_text(&Value::Null), "None");
    }

    #[test]
    fn explicit_null_child_is_none_text() {
        let node = Node::from_value(&json!({
            "kind": "ArithmeticExpression",
            "left": null,
            "operatorConstant": "+",
        }));
        match node {
            Node::Arithmetic { left, right, .. } => {
                assert_eq!(left.as_deref(), Some(&Node::Text("None".into())));
                assert!(right.is_none());
            }
            other => panic!("unexpected node: {other:?}"),
        }
        assert_eq!(Node::from_value(&json!(false)), Node::Text("False".into()));
    }
}
