//! Graph interchange files for external analysis tools.
//!
//! Two formats: a JSON node/edge list and GEXF 1.2 (readable by Gephi and
//! networkx). Both list nodes in id order and edges in `(low, high)` order.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use resonance_core::error::ResonanceResult;

use crate::network::HarmonicNetwork;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportNode {
    pub id: u32,
    pub label: String,
    pub source: String,
    pub harmonic: u32,
    pub frequency_hz: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEdge {
    pub source: u32,
    pub target: u32,
}

/// Node list + edge list view of a network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphExport {
    pub threshold_hz: f64,
    pub nodes: Vec<ExportNode>,
    pub edges: Vec<ExportEdge>,
}

impl GraphExport {
    pub fn from_network(network: &HarmonicNetwork) -> Self {
        let sources = network.sources();
        let nodes = network
            .nodes()
            .iter()
            .map(|node| {
                let source = sources
                    .get(node.source_id)
                    .map(|f| f.display_label())
                    .unwrap_or_default();
                ExportNode {
                    id: node.id.0,
                    label: format!("{}_n{}", source, node.harmonic_index),
                    source,
                    harmonic: node.harmonic_index,
                    frequency_hz: node.frequency_hz,
                }
            })
            .collect();
        let edges = network
            .edges()
            .iter()
            .map(|e| ExportEdge {
                source: e.low.0,
                target: e.high.0,
            })
            .collect();
        Self {
            threshold_hz: network.threshold_hz(),
            nodes,
            edges,
        }
    }

    pub fn to_json_value(&self) -> ResonanceResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> ResonanceResult<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Render as a GEXF 1.2 document.
    pub fn to_gexf(&self) -> String {
        let mut out = String::with_capacity(128 + self.nodes.len() * 160 + self.edges.len() * 48);
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str("<gexf xmlns=\"http://www.gexf.net/1.2draft\" version=\"1.2\">\n");
        out.push_str("  <graph mode=\"static\" defaultedgetype=\"undirected\">\n");
        out.push_str("    <attributes class=\"node\">\n");
        out.push_str("      <attribute id=\"0\" title=\"frequency_hz\" type=\"double\"/>\n");
        out.push_str("      <attribute id=\"1\" title=\"source\" type=\"string\"/>\n");
        out.push_str("      <attribute id=\"2\" title=\"harmonic\" type=\"integer\"/>\n");
        out.push_str("    </attributes>\n");
        out.push_str("    <nodes>\n");
        for node in &self.nodes {
            // Writing into a String cannot fail.
            let _ = writeln!(
                out,
                "      <node id=\"{}\" label=\"{}\"><attvalues>\
                 <attvalue for=\"0\" value=\"{:e}\"/>\
                 <attvalue for=\"1\" value=\"{}\"/>\
                 <attvalue for=\"2\" value=\"{}\"/>\
                 </attvalues></node>",
                node.id,
                xml_escape(&node.label),
                node.frequency_hz,
                xml_escape(&node.source),
                node.harmonic
            );
        }
        out.push_str("    </nodes>\n");
        out.push_str("    <edges>\n");
        for (i, edge) in self.edges.iter().enumerate() {
            let _ = writeln!(
                out,
                "      <edge id=\"{}\" source=\"{}\" target=\"{}\"/>",
                i, edge.source, edge.target
            );
        }
        out.push_str("    </edges>\n");
        out.push_str("  </graph>\n");
        out.push_str("</gexf>\n");
        out
    }

    pub fn write_gexf(&self, path: impl AsRef<Path>) -> ResonanceResult<()> {
        fs::write(path, self.to_gexf())?;
        Ok(())
    }
}

fn xml_escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
