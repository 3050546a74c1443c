//! End-to-end checks: Python source in, display graph out.

use astview::domain::builder::GraphBuilder;
use astview::domain::graph::{DisplayGraph, NodeKey};
use astview::infrastructure::PythonAstParser;
use astview::ports::AstParser;
use std::collections::VecDeque;

fn build(source: &str) -> DisplayGraph {
    let ast = PythonAstParser.parse(source).expect("source should parse");
    GraphBuilder::build(Some(&ast)).expect("graph should build")
}

fn find_by_label<'a>(graph: &'a DisplayGraph, pred: impl Fn(&str) -> bool) -> Option<&'a NodeKey> {
    graph
        .nodes
        .iter()
        .find(|k| graph.label(k).is_some_and(&pred))
}

/// True when `to` is reachable from `from` along graph edges.
fn reachable(graph: &DisplayGraph, from: &NodeKey, to: &NodeKey) -> bool {
    let mut queue: VecDeque<&NodeKey> = VecDeque::from([from]);
    while let Some(key) = queue.pop_front() {
        if key == to {
            return true;
        }
        queue.extend(graph.outgoing(key));
    }
    false
}

#[test]
fn hello_world_scenario() {
    let source = ["def main():", "    print('hi')"].join("\n");
    let graph = build(&source);

    // Root is the module node and has no incoming edges.
    let root = graph.root.clone().expect("graph has a root");
    assert_eq!(graph.label(&root), Some("Module"));
    assert_eq!(graph.incoming_count(&root), 0);

    // Exactly one function definition, labelled with its name.
    let defs: Vec<&NodeKey> = graph
        .nodes
        .iter()
        .filter(|k| graph.label(k).is_some_and(|l| l.starts_with("FunctionDef")))
        .collect();
    assert_eq!(defs.len(), 1);
    assert_eq!(graph.label(defs[0]), Some("FunctionDef main"));

    // The string constant sits under a call node.
    let call = find_by_label(&graph, |l| l == "Call").expect("call node");
    let constant = find_by_label(&graph, |l| l == "Constant hi").expect("constant node");
    assert!(reachable(&graph, call, constant));

    // Usage-context markers never surface as nodes.
    for key in &graph.nodes {
        let label = graph.label(key).unwrap();
        assert!(label != "Load" && label != "Store" && label != "Del");
    }

    // The called name folded to its identifier.
    assert!(find_by_label(&graph, |l| l == "print").is_some());
}

#[test]
fn assignment_folds_store_context() {
    let graph = build("x = 1\n");
    assert!(find_by_label(&graph, |l| l == "x").is_some());
    assert!(find_by_label(&graph, |l| l == "Store").is_none());
    assert!(find_by_label(&graph, |l| l == "Name").is_none());
    assert!(find_by_label(&graph, |l| l == "Constant 1").is_some());
}

#[test]
fn constant_label_ends_with_value() {
    let graph = build("y = 42\n");
    let constant = find_by_label(&graph, |l| l.starts_with("Constant")).expect("constant");
    assert!(graph.label(constant).unwrap().ends_with("42"));
}

#[test]
fn graph_is_acyclic_and_edges_are_closed() {
    let source = [
        "class Greeter:",
        "    def greet(self, name):",
        "        if name:",
        "            return 'hello ' + name",
        "        return 'hello'",
        "",
        "g = Greeter()",
        "print(g.greet('world'))",
    ]
    .join("\n");
    let graph = build(&source);

    assert!(graph.is_acyclic());
    for edge in &graph.edges {
        assert!(graph.nodes.contains(&edge.from));
        assert!(graph.nodes.contains(&edge.to));
    }
    // One label per node.
    assert_eq!(graph.labels.len(), graph.nodes.len());
}

#[test]
fn rebuilds_are_isomorphic() {
    let source = ["def fib(n):", "    if n < 2:", "        return n", "    return fib(n - 1) + fib(n - 2)"]
        .join("\n");
    let a = build(&source);
    let b = build(&source);

    let mut labels_a: Vec<&String> = a.labels.values().collect();
    let mut labels_b: Vec<&String> = b.labels.values().collect();
    labels_a.sort();
    labels_b.sort();
    assert_eq!(labels_a, labels_b);

    let edge_pairs = |g: &DisplayGraph| {
        let mut pairs: Vec<(String, String)> = g
            .edges
            .iter()
            .map(|e| {
                (
                    g.label(&e.from).unwrap().to_string(),
                    g.label(&e.to).unwrap().to_string(),
                )
            })
            .collect();
        pairs.sort();
        pairs
    };
    assert_eq!(edge_pairs(&a), edge_pairs(&b));
}

#[test]
fn leaf_nodes_stay_in_the_graph() {
    let graph = build("pass\n");
    let pass = find_by_label(&graph, |l| l == "Pass").expect("pass node");
    assert_eq!(graph.outgoing(pass).count(), 0);
    assert_eq!(graph.incoming_count(pass), 1);
}

#[test]
fn empty_source_and_missing_root_are_rejected() {
    use astview::error::VizError;
    assert!(matches!(
        PythonAstParser.parse(""),
        Err(VizError::EmptyInput)
    ));
    assert!(matches!(
        GraphBuilder::build(None),
        Err(VizError::MalformedTree)
    ));
}

#[test]
fn syntax_errors_propagate_unmodified() {
    use astview::error::VizError;
    let err = PythonAstParser.parse("def broken(:\n").unwrap_err();
    assert!(matches!(err, VizError::Syntax(_)));
}
