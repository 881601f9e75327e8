use itertools::Itertools;

use crate::ast::{Node, literal_text};
use crate::error::OutlineResult;
use crate::outline_ensure;
use crate::references::ReferenceMap;

pub const DEFAULT_INDENT_WIDTH: usize = 2;

pub const MAX_INDENT_WIDTH: usize = 8;

/// Reject indent widths that would flatten or explode the outline.
pub fn validate_indent_width(width: usize) -> OutlineResult<usize> {
    outline_ensure!(
        (1..=MAX_INDENT_WIDTH).contains(&width),
        config: "indent_width must be between 1 and {MAX_INDENT_WIDTH}, got {width}"
    );
    Ok(width)
}

/// Renders nodes as nested text, annotating steps with their references.
#[derive(Debug, Clone, Copy)]
pub struct NodeFormatter<'a> {
    references: &'a ReferenceMap,
    indent_width: usize,
}

impl<'a> NodeFormatter<'a> {
    pub fn new(references: &'a ReferenceMap) -> Self {
        Self {
            references,
            indent_width: DEFAULT_INDENT_WIDTH,
        }
    }

    pub fn with_indent_width(mut self, indent_width: usize) -> OutlineResult<Self> {
        self.indent_width = validate_indent_width(indent_width)?;
        Ok(self)
    }

    /// For widths that already went through [`validate_indent_width`].
    pub(crate) fn with_checked_indent_width(mut self, indent_width: usize) -> Self {
        self.indent_width = indent_width;
        self
    }

    fn indent(&self, depth: usize) -> String {
        " ".repeat(self.indent_width * depth)
    }

    /// Render `node` at the given nesting depth.
    pub fn format_node(&self, node: &Node, depth: usize) -> String {
        match node {
            Node::IdentifierPaired { key, value } => {
                let key = key.as_deref().unwrap_or("Unknown Key");
                let value = self.format_child(value.as_deref(), "Unknown Value", depth + 1);
                format!(
                    "{}{key} = {value}\n  - References: {}\n",
                    self.indent(depth),
                    format_reference_list(self.references.get(key))
                )
            }
            Node::Let { expressions } => {
                let steps: String = expressions
                    .iter()
                    .map(|step| self.format_node(step, depth + 1))
                    .collect();
                let indent = self.indent(depth);
                format!("{indent}Let\n{steps}\n{indent}In")
            }
            Node::List { elements } => format!("List({})", self.format_all(elements, depth + 1)),
            Node::Function { parameters, body } => format!(
                "Function({}) => {}",
                self.format_all(parameters, depth + 1),
                self.format_child(body.as_deref(), "Unknown Body", depth + 1)
            ),
            Node::Arithmetic {
                left,
                operator,
                right,
            } => format!(
                "({} {} {})",
                self.format_child(left.as_deref(), "Unknown Left", depth + 1),
                operator.as_deref().unwrap_or("?"),
                self.format_child(right.as_deref(), "Unknown Right", depth + 1)
            ),
            // The head is a prefix, not a nested block.
            Node::RecursivePrimary {
                head,
                recursive_expressions,
            } => format!(
                "{}({})",
                self.format_child(head.as_deref(), "Unknown Head", depth),
                self.format_all(recursive_expressions, depth + 1)
            ),
            Node::Invoke { content } => format!(
                "Invoke({})",
                self.format_child(content.as_deref(), "Unknown Content", depth + 1)
            ),
            Node::ArrayWrapper { elements } => self.format_all(elements, depth + 1),
            Node::Identifier { literal } => literal
                .clone()
                .unwrap_or_else(|| "Unknown Identifier".to_string()),
            Node::Literal { value } => literal_text(value),
            Node::Csv { node } => self.format_child(node.as_deref(), "Unknown Node", depth),
            Node::Unhandled { kind } => format!("{}{kind} (Unhandled Node)", self.indent(depth)),
            Node::Text(text) => text.clone(),
        }
    }

    fn format_child(&self, node: Option<&Node>, placeholder: &str, depth: usize) -> String {
        match node {
            Some(node) => self.format_node(node, depth),
            None => placeholder.to_string(),
        }
    }

    fn format_all(&self, nodes: &[Node], depth: usize) -> String {
        nodes
            .iter()
            .map(|node| self.format_node(node, depth))
            .join(", ")
    }
}

/// `['a', 'b']`, or `None` for an empty list.
pub fn format_reference_list(references: &[String]) -> String {
    if references.is_empty() {
        return "None".to_string();
    }
    format!(
        "[{}]",
        references.iter().map(|name| quote_name(name)).join(", ")
    )
}

/// Quote a name the way Python's `repr` quotes a string: single quotes,
/// switching to double quotes when the name holds an apostrophe and no `"`.
pub fn quote_name(name: &str) -> String {
    let quote = if name.contains('\'') && !name.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(name.len() + 2);
    out.push(quote);
    for c in name.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_ascii_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
