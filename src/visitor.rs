use crate::ast::Node;

/// Callbacks for a depth-first walk over a [`Node`] tree.
pub trait AstVisitor {
    fn visit_identifier(&mut self, _name: &str) {}
    fn visit_unhandled(&mut self, _kind: &str) {}

    /// Return false to skip `node`'s children. The node itself has already
    /// been visited.
    fn descend(&mut self, _node: &Node) -> bool {
        true
    }
}

pub fn walk_node(node: &Node, visitor: &mut impl AstVisitor) {
    match node {
        Node::Identifier {
            literal: Some(name),
        } => visitor.visit_identifier(name),
        Node::Unhandled { kind } => visitor.visit_unhandled(kind),
        _ => {}
    }

    if !visitor.descend(node) {
        return;
    }

    for child in node.children() {
        walk_node(child, visitor);
    }
}

/// Collects every unhandled kind below `root`, deduplicated, in first-seen order.
pub fn unhandled_kinds(root: &Node) -> Vec<String> {
    #[derive(Default)]
    struct Unhandled(Vec<String>);

    impl AstVisitor for Unhandled {
        fn visit_unhandled(&mut self, kind: &str) {
            if !self.0.iter().any(|k| k == kind) {
                self.0.push(kind.to_string());
            }
        }
    }

    let mut visitor = Unhandled::default();
    walk_node(root, &mut visitor);
    visitor.0
}
