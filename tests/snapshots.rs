//! Full-document rendering snapshots.

use insta::assert_snapshot;
use pq_outline::Outliner;

fn outline_fixture(source: &str) -> String {
    match Outliner::from_source(source) {
        Ok(outliner) => outliner.format_query_steps(),
        Err(e) => format!("ERROR: {}", e),
    }
}

#[test]
fn nested_let_outline() {
    let output = outline_fixture(include_str!("fixtures/nested_let.json"));
    assert_snapshot!(output, @r"
a = 1
  - References: None

helper =   Let
    x = a
  - References: None
    y = (x * 2)
  - References: None

  In
  - References: None

total = (helper + a)
  - References: ['a', 'helper']

fn = Function(n) => (n + a)
  - References: None

items = List(a, helper)
  - References: None
");
}

#[test]
fn malformed_json_reports_error() {
    let output = outline_fixture("{ \"variableList\": ");
    assert!(output.starts_with("ERROR: invalid AST JSON"), "{output}");
}
