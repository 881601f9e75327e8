//! AST dumping tool for debugging the shape of parser output

use pq_outline::ast::{Node, literal_text};
use pq_outline::document::parse_document;
use std::env;
use std::fs;

fn summary(node: &Node) -> String {
    let text = match node {
        Node::IdentifierPaired { key, .. } => key.clone().unwrap_or_default(),
        Node::Identifier { literal } => literal.clone().unwrap_or_default(),
        Node::Literal { value } => literal_text(value),
        Node::Arithmetic { operator, .. } => operator.clone().unwrap_or_default(),
        Node::Text(text) => text.clone(),
        _ => String::new(),
    };

    // Truncate long literals
    let text = if text.chars().count() > 50 {
        format!("{}...", text.chars().take(50).collect::<String>())
    } else {
        text
    };
    text.replace('\n', "\\n")
}

fn print_tree(node: &Node, indent: usize) {
    let indent_str = "  ".repeat(indent);
    println!("{}{}  \"{}\"", indent_str, node.kind(), summary(node));

    for child in node.children() {
        print_tree(child, indent + 1);
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: dump_ast <ast.json>");
        std::process::exit(1);
    }

    let file_path = &args[1];
    let source = fs::read_to_string(file_path).unwrap_or_else(|e| {
        eprintln!("Failed to read {}: {}", file_path, e);
        std::process::exit(1);
    });

    let document = parse_document(&source).unwrap_or_else(|e| {
        eprintln!("Failed to load {}: {}", file_path, e);
        std::process::exit(1);
    });

    println!("AST for {}:", file_path);
    println!("================");
    if !document.has_variable_list() {
        println!("(no variableList)");
    }
    for step in document.steps() {
        print_tree(step, 0);
    }
}
