//! Power Query AST outliner.
//!
//! Takes the JSON AST produced by the Power Query parser, computes which
//! sibling steps each `let` step references, and renders every step as an
//! indented text block annotated with those references.

pub mod ast;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod format;
pub mod references;
pub mod report;
pub mod telemetry;
pub mod visitor;

use crate::ast::Node;
use crate::document::{Document, parse_document};
use crate::error::OutlineResult;
use crate::format::{DEFAULT_INDENT_WIDTH, NodeFormatter, validate_indent_width};
use crate::references::{ReferenceMap, extract_references};
use crate::report::StepReport;

/// Holds a document and its reference map, computed once at construction.
#[derive(Debug, Clone)]
pub struct Outliner {
    document: Document,
    references: ReferenceMap,
    indent_width: usize,
}

impl Outliner {
    pub fn new(document: Document) -> Self {
        let references = crate::instrument_block!("references", { extract_references(&document) });
        Self {
            document,
            references,
            indent_width: DEFAULT_INDENT_WIDTH,
        }
    }

    /// Parse AST JSON text and build an outliner over it.
    pub fn from_source(source: &str) -> OutlineResult<Self> {
        Ok(Self::new(parse_document(source)?))
    }

    /// Fails for widths outside `1..=MAX_INDENT_WIDTH`.
    pub fn with_indent_width(mut self, indent_width: usize) -> OutlineResult<Self> {
        self.indent_width = validate_indent_width(indent_width)?;
        Ok(self)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn references(&self) -> &ReferenceMap {
        &self.references
    }

    pub fn formatter(&self) -> NodeFormatter<'_> {
        NodeFormatter::new(&self.references).with_checked_indent_width(self.indent_width)
    }

    pub fn format_node(&self, node: &Node, depth: usize) -> String {
        self.formatter().format_node(node, depth)
    }

    /// Every top-level step at depth 0, joined with newlines.
    pub fn format_query_steps(&self) -> String {
        crate::instrument_block!("render", {
            let formatter = self.formatter();
            self.document
                .steps()
                .iter()
                .map(|step| formatter.format_node(step, 0))
                .collect::<Vec<_>>()
                .join("\n")
        })
    }

    /// Structured per-step output.
    pub fn step_reports(&self) -> Vec<StepReport> {
        let formatter = self.formatter();
        self.document
            .steps()
            .iter()
            .map(|step| {
                let name = step.as_step().map(|(key, _)| key.to_string());
                let references = name
                    .as_deref()
                    .map(|key| self.references.get(key).to_vec())
                    .unwrap_or_default();
                StepReport {
                    name,
                    references,
                    rendered: formatter.format_node(step, 0),
                }
            })
            .collect()
    }

    /// Unhandled node kinds anywhere in the document, first-seen order.
    pub fn unhandled_kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = Vec::new();
        for step in self.document.steps() {
            for kind in visitor::unhandled_kinds(step) {
                if !kinds.contains(&kind) {
                    kinds.push(kind);
                }
            }
        }

        #[cfg(feature = "telemetry")]
        for kind in &kinds {
            tracing::warn!(kind = kind.as_str(), "rendered unhandled node kind");
        }

        kinds
    }
}

/// Convenience: outline AST JSON text with default settings.
pub fn outline_source(source: &str) -> OutlineResult<String> {
    Ok(Outliner::from_source(source)?.format_query_steps())
}
