use serde::Deserialize;
use serde_json::Value;

use crate::error::FetchError;

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct RawNode {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Older payloads send the category as `type`; `category` wins when
    /// both are present.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct RawEdge {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

/// Records as delivered by the data endpoint, before validation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawGraph {
    pub nodes: Vec<RawNode>,
    pub edges: Vec<RawEdge>,
    /// Records whose JSON shape could not be decoded at all.
    pub undecodable: usize,
}

impl RawGraph {
    pub fn new(nodes: Vec<RawNode>, edges: Vec<RawEdge>) -> Self {
        Self {
            nodes,
            edges,
            undecodable: 0,
        }
    }
}

pub fn parse_graph(raw: &str) -> Result<RawGraph, FetchError> {
    let parsed: Value = serde_json::from_str(raw)?;
    let object = parsed
        .as_object()
        .ok_or_else(|| FetchError::Shape("expected a JSON object with nodes and edges".into()))?;

    let mut graph = RawGraph::default();

    if let Some(nodes) = object.get("nodes").and_then(Value::as_array) {
        graph.nodes.reserve(nodes.len());
        for value in nodes {
            match RawNode::deserialize(value) {
                Ok(node) => graph.nodes.push(node),
                Err(_) => graph.undecodable += 1,
            }
        }
    }

    // The analysis endpoint calls them edges, the force layout calls them links.
    let edges = object
        .get("edges")
        .or_else(|| object.get("links"))
        .and_then(Value::as_array);
    if let Some(edges) = edges {
        graph.edges.reserve(edges.len());
        for value in edges {
            match RawEdge::deserialize(value) {
                Ok(edge) => graph.edges.push(edge),
                Err(_) => graph.undecodable += 1,
            }
        }
    }

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_type_key_separately() {
        let graph = parse_graph(
            r#"{"nodes":[{"id":"A","name":"Alpha","type":"Corporation","value":11}],"edges":[]}"#,
        )
        .unwrap();

        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.nodes[0].kind.as_deref(), Some("Corporation"));
        assert_eq!(graph.nodes[0].value, Some(11.0));
    }

    #[test]
    fn keeps_records_carrying_both_category_keys() {
        let graph = parse_graph(
            r#"{"nodes":[{"id":"A","name":"Alpha","category":"Corporation","type":"Non-Profit"}],"edges":[]}"#,
        )
        .unwrap();

        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.undecodable, 0);
        assert_eq!(graph.nodes[0].category.as_deref(), Some("Corporation"));
        assert_eq!(graph.nodes[0].kind.as_deref(), Some("Non-Profit"));
    }

    #[test]
    fn skips_records_with_wrong_field_types() {
        let graph = parse_graph(
            r#"{
                "nodes": [{"id": 7}, {"id": "B"}, "garbage"],
                "edges": [{"source": "B", "target": ["x"]}, {"source": "B", "target": "B"}]
            }"#,
        )
        .unwrap();

        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.undecodable, 3);
    }

    #[test]
    fn missing_sections_are_empty() {
        let graph = parse_graph("{}").unwrap();
        assert!(graph.nodes.is_empty());
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn accepts_links_key() {
        let graph = parse_graph(r#"{"nodes":[],"links":[{"source":"A","target":"B"}]}"#).unwrap();
        assert_eq!(graph.edges.len(), 1);
    }

    #[test]
    fn rejects_non_object_payloads() {
        assert!(matches!(parse_graph("[1, 2]"), Err(FetchError::Shape(_))));
        assert!(matches!(parse_graph("not json"), Err(FetchError::Decode(_))));
    }
}
