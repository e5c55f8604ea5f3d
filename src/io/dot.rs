//! GraphViz rendering of the graph or of the neighbourhood of a root.

use std::io::Write;

use petgraph::dot::{Config, Dot};
use petgraph::graph::{EdgeReference, NodeIndex, UnGraph};

use crate::graph::SimpleGraph;

/// Whole graph, vertices drawn with their label, vertex 0 filled.
pub fn write_dot<W: Write>(graph: &SimpleGraph, writer: &mut W) -> anyhow::Result<()> {
    // Dot needs displayable edge weights even when edge labels are off
    let g: UnGraph<char, &str> = graph.to_petgraph().map(|_, l| *l as char, |_, _| "");
    let root = NodeIndex::new(0);
    let edge_attr = |_: &UnGraph<char, &str>, _: EdgeReference<&str>| String::new();
    let node_attr = |_: &UnGraph<char, &str>, (n, _): (NodeIndex, &char)| {
        if n == root {
            String::from("style=filled, color=lightgray")
        } else {
            String::new()
        }
    };
    let dot = Dot::with_attr_getters(&g, &[Config::EdgeNoLabel], &edge_attr, &node_attr);
    writeln!(writer, "{}", dot)?;
    Ok(())
}

/// Vertices at distance less than bound from root, one rank per distance, root as a double circle.
pub fn write_dot_neighbourhood<W: Write>(graph: &SimpleGraph, root: usize, bound: usize, writer: &mut W) -> anyhow::Result<()> {
    if root >= graph.nb_nodes() {
        return Err(anyhow::anyhow!("root {} >= graph size {}", root, graph.nb_nodes()));
    }
    let dist = graph.bounded_breadth_first_sort(root, bound);
    writeln!(writer, "graph neighbourhood {{")?;
    writeln!(writer, "    graph [splines=true overlap=false]")?;
    writeln!(writer, "    node [shape=doublecircle]; n{} [label=\"{}\"];", root, graph.get_label(root) as char)?;
    writeln!(writer, "    node [shape=circle];")?;
    for i in (0..graph.nb_nodes()).filter(|i| *i != root && dist[*i] < bound) {
        writeln!(writer, "    n{} [label=\"{}\"];", i, graph.get_label(i) as char)?;
    }
    for d in 0..bound {
        let same: Vec<String> = (0..graph.nb_nodes()).filter(|i| dist[*i] == d).map(|i| format!("n{}", i)).collect();
        if !same.is_empty() {
            writeln!(writer, "    {{rank=same; {};}}", same.join(" "))?;
        }
    }
    for i in (0..graph.nb_nodes()).filter(|i| dist[*i] < bound) {
        for &j in graph.get_neighbours(i) {
            if i < j && dist[j] < bound {
                writeln!(writer, "    n{} -- n{};", i, j)?;
            }
        }
    }
    writeln!(writer, "}}")?;
    Ok(())
}
