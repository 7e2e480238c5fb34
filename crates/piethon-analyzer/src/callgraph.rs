use std::borrow::Borrow;
use std::fmt;

use log::{debug, warn};

use crate::ast::*;
use crate::graph::Digraph;
use crate::semantic::CheckedScript;

/// A call-graph vertex: a procedure, identified purely by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcNode(String);

impl ProcNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ProcNode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProcNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which procedure calls which.
pub type CallGraph = Digraph<ProcNode>;

/// Build the call graph of a script that passed checking.
pub fn build_graph(checked: &CheckedScript) -> CallGraph {
    build_unchecked(checked.script())
}

/// Build a call graph straight from the syntax tree, without checking first.
///
/// Every procedure gets a vertex, and so does every name that is called,
/// declared or not. A call to an undeclared name becomes an edge to a vertex
/// with no outgoing edges.
pub fn build_unchecked(script: &Script) -> CallGraph {
    let mut builder = GraphBuilder::default();
    for proc_def in &script.procedures {
        builder.enter_procedure(proc_def);
        builder.visit_block(&proc_def.body);
        builder.exit_procedure();
    }
    debug!(
        "call graph for {}: {} vertices, {} edges",
        script.source_name,
        builder.graph.vertex_count(),
        builder.graph.edge_count()
    );
    builder.graph
}

#[derive(Default)]
struct GraphBuilder {
    graph: CallGraph,
    current: Option<ProcNode>,
}

impl GraphBuilder {
    fn enter_procedure(&mut self, proc_def: &ProcDef) {
        let node = ProcNode::new(proc_def.name.as_str());
        self.graph.add_vertex(node.clone());
        self.current = Some(node);
    }

    fn exit_procedure(&mut self) {
        self.current = None;
    }

    fn visit_block(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            match stmt {
                Stmt::Call(call) => self.visit_call(call),
                Stmt::If(if_stmt) => {
                    self.visit_block(&if_stmt.then_body);
                    if let Some(else_body) = &if_stmt.else_body {
                        self.visit_block(else_body);
                    }
                }
                Stmt::While(while_stmt) => self.visit_block(&while_stmt.body),
                Stmt::VarDef(_) | Stmt::Return(_) | Stmt::Assign(_) => {}
            }
        }
    }

    fn visit_call(&mut self, call: &CallStmt) {
        let callee = ProcNode::new(call.callee.as_str());
        match &self.current {
            Some(caller) => self.graph.add_edge(caller.clone(), callee),
            None => {
                warn!(
                    "call to '{}' at {} is outside any procedure; no edge added",
                    call.callee, call.span
                );
                self.graph.add_vertex(callee);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use piethon_common::Span;

    use super::*;
    use crate::parser::parse;
    use crate::semantic::check;

    fn checked(source: &str) -> CheckedScript {
        let (script, diags) = parse(source, "<test>");
        assert!(!diags.has_errors(), "{:?}", diags.diagnostics());
        check(script)
            .expect("annotations should be valid")
            .expect("script should check cleanly")
    }

    fn unchecked(source: &str) -> Script {
        let (script, diags) = parse(source, "<test>");
        assert!(!diags.has_errors(), "{:?}", diags.diagnostics());
        script
    }

    fn names(graph: &CallGraph) -> Vec<&str> {
        graph.vertices().map(ProcNode::name).collect()
    }

    #[test]
    fn single_edge() {
        let graph = build_graph(&checked(
            "def g() : Void is end\n\
             def f() : Void is g(); end",
        ));
        assert_eq!(names(&graph), vec!["g", "f"]);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.neighbors("f"), &[ProcNode::new("g")]);
        assert!(graph.neighbors("g").is_empty());
    }

    #[test]
    fn repeated_calls_make_parallel_edges() {
        let graph = build_graph(&checked(
            "def g() : Void is end\n\
             def f() : Void is g(); g(); end",
        ));
        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.neighbors("f").len(), 2);
    }

    #[test]
    fn calls_in_nested_blocks_are_edges() {
        let graph = build_graph(&checked(
            "def a() : Void is end\n\
             def b() : Void is end\n\
             def main() : Void is\n\
                 if true then a(); else b(); end\n\
                 while false do a(); end\n\
             end",
        ));
        let targets: Vec<_> = graph.neighbors("main").iter().map(ProcNode::name).collect();
        assert_eq!(targets, vec!["a", "b", "a"]);
    }

    #[test]
    fn dangling_call_adds_isolated_vertex() {
        let graph = build_unchecked(&unchecked(
            "def f() : Void is g(); h(); end\n\
             def g() : Void is end",
        ));
        assert_eq!(names(&graph), vec!["f", "g", "h"]);
        assert!(graph.contains_vertex("h"));
        assert!(graph.neighbors("h").is_empty());
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn every_procedure_is_a_vertex() {
        let graph = build_graph(&checked(
            "def lonely() : Void is end\n\
             def other() : Void is end",
        ));
        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn call_outside_procedure_only_adds_vertex() {
        let mut builder = GraphBuilder::default();
        builder.visit_call(&CallStmt {
            callee: "stray".to_string(),
            args: Vec::new(),
            span: Span::dummy(),
        });
        assert!(builder.graph.contains_vertex("stray"));
        assert_eq!(builder.graph.edge_count(), 0);
    }

    #[test]
    fn proc_node_identity_is_the_name() {
        assert_eq!(ProcNode::new("f"), ProcNode::new(String::from("f")));
        assert_eq!(ProcNode::new("f").to_string(), "f");
    }
}
