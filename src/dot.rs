//! Graphviz (DOT) export.

use std::collections::BTreeMap;

use crate::engine::Engine;
use crate::reference::Ref;

impl Engine {
    /// Render the diagrams rooted at `roots` in DOT format.
    ///
    /// Internal nodes are grouped by variable level, reachable terminals
    /// are squares at the bottom. High edges are solid, low edges dashed.
    pub fn to_dot(&self, roots: &[Ref]) -> String {
        let reachable = self.descendants(roots.iter().copied());

        let mut levels: BTreeMap<u32, Vec<Ref>> = BTreeMap::new();
        let mut terminals: Vec<Ref> = Vec::new();
        for &node in &reachable {
            if self.is_terminal(node) {
                terminals.push(node);
            } else {
                levels.entry(self.variable(node)).or_default().push(node);
            }
        }
        for nodes in levels.values_mut() {
            nodes.sort();
        }
        terminals.sort();

        let mut out = String::new();
        out.push_str("digraph BDD {\n");

        for (&v, nodes) in &levels {
            out.push_str("  { rank=same;");
            for &node in nodes {
                out.push_str(&format!(" n{} [label=\"x{}\"];", node.index(), v));
            }
            out.push_str(" }\n");
        }

        if !terminals.is_empty() {
            out.push_str("  { rank=sink;");
            for &t in &terminals {
                let label = if self.is_one(t) { 1 } else { 0 };
                out.push_str(&format!(
                    " n{} [shape=square, label=\"{}\"];",
                    t.index(),
                    label
                ));
            }
            out.push_str(" }\n");
        }

        for nodes in levels.values() {
            for &node in nodes {
                out.push_str(&format!(
                    "  n{} -> n{};\n",
                    node.index(),
                    self.high(node).index()
                ));
                out.push_str(&format!(
                    "  n{} -> n{} [style=dashed];\n",
                    node.index(),
                    self.low(node).index()
                ));
            }
        }

        out.push_str("}\n");
        out
    }
}
