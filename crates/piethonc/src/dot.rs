use std::fmt::{self, Write};

use piethon_analyzer::CallGraph;
use piethon_common::config::GraphSection;

/// Write a call graph as Graphviz DOT.
///
/// Procedures become filled triangle nodes in insertion order; each call is an
/// edge labelled with `settings.edge_label`.
pub fn write_dot(
    out: &mut impl Write,
    graph: &CallGraph,
    title: &str,
    settings: &GraphSection,
) -> fmt::Result {
    writeln!(out, "digraph {} {{", quote(title))?;
    writeln!(out, "    label={};", quote(title))?;
    writeln!(out, "    rankdir={};", settings.rankdir.as_str())?;
    writeln!(out, "    node [shape=triangle, style=filled, color=blue];")?;

    for vertex in graph.vertices() {
        writeln!(out, "    {};", quote(vertex.name()))?;
    }
    for (from, to) in graph.edges() {
        writeln!(
            out,
            "    {} -> {} [label={}];",
            quote(from.name()),
            quote(to.name()),
            quote(&settings.edge_label)
        )?;
    }

    writeln!(out, "}}")
}

fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use piethon_analyzer::ProcNode;
    use piethon_common::config::RankDir;

    use super::*;

    fn render_dot(graph: &CallGraph, title: &str, settings: &GraphSection) -> String {
        let mut out = String::new();
        write_dot(&mut out, graph, title, settings).unwrap();
        out
    }

    fn sample_graph() -> CallGraph {
        let mut graph = CallGraph::new();
        graph.add_vertex(ProcNode::new("g"));
        graph.add_edge(ProcNode::new("f"), ProcNode::new("g"));
        graph
    }

    #[test]
    fn renders_vertices_and_edges() {
        let dot = render_dot(&sample_graph(), "example", &GraphSection::default());
        assert_eq!(
            dot,
            "digraph \"example\" {\n\
             \x20   label=\"example\";\n\
             \x20   rankdir=LR;\n\
             \x20   node [shape=triangle, style=filled, color=blue];\n\
             \x20   \"g\";\n\
             \x20   \"f\";\n\
             \x20   \"f\" -> \"g\" [label=\"calls\"];\n\
             }\n"
        );
    }

    #[test]
    fn uses_configured_direction_and_label() {
        let settings = GraphSection {
            rankdir: RankDir::TopBottom,
            edge_label: "invokes".to_string(),
            ..GraphSection::default()
        };
        let dot = render_dot(&sample_graph(), "t", &settings);
        assert!(dot.contains("rankdir=TB;"));
        assert!(dot.contains("[label=\"invokes\"]"));
    }

    struct ClosedSink;

    impl Write for ClosedSink {
        fn write_str(&mut self, _: &str) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[test]
    fn writer_failure_is_returned() {
        let result = write_dot(&mut ClosedSink, &sample_graph(), "t", &GraphSection::default());
        assert!(result.is_err());
    }

    #[test]
    fn escapes_quotes_in_title() {
        let dot = render_dot(&CallGraph::new(), "say \"hi\"", &GraphSection::default());
        assert!(dot.starts_with("digraph \"say \\\"hi\\\"\" {"));
    }
}
