use std::collections::HashMap;

use super::graph::{DEFAULT_WEIGHT, GraphData, Link, Node};
use super::raw::{RawEdge, RawGraph, RawNode};

/// Counts of records dropped while adapting a raw payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdaptReport {
    pub nodes_without_id: usize,
    pub duplicate_nodes: usize,
    pub edges_without_endpoint: usize,
    pub dangling_edges: usize,
    pub undecodable: usize,
}

impl AdaptReport {
    pub fn dropped(&self) -> usize {
        self.nodes_without_id
            + self.duplicate_nodes
            + self.edges_without_endpoint
            + self.dangling_edges
            + self.undecodable
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn weight_from(value: Option<f64>) -> f32 {
    match value {
        Some(value) if value.is_finite() && value > 0.0 => value as f32,
        _ => DEFAULT_WEIGHT,
    }
}

pub fn adapt(raw_nodes: Vec<RawNode>, raw_edges: Vec<RawEdge>) -> (GraphData, AdaptReport) {
    let mut report = AdaptReport::default();
    let mut nodes = Vec::with_capacity(raw_nodes.len());
    let mut index_by_id = HashMap::with_capacity(raw_nodes.len());

    for raw in raw_nodes {
        let Some(id) = non_blank(raw.id) else {
            report.nodes_without_id += 1;
            continue;
        };
        if index_by_id.contains_key(&id) {
            report.duplicate_nodes += 1;
            continue;
        }

        let name = non_blank(raw.name).unwrap_or_else(|| id.clone());
        index_by_id.insert(id.clone(), nodes.len());
        nodes.push(Node {
            id,
            name,
            category: non_blank(raw.category).or_else(|| non_blank(raw.kind)),
            weight: weight_from(raw.value),
        });
    }

    let mut links = Vec::with_capacity(raw_edges.len());
    let mut endpoints = Vec::with_capacity(raw_edges.len());
    for raw in raw_edges {
        let (Some(source), Some(target)) = (non_blank(raw.source), non_blank(raw.target)) else {
            report.edges_without_endpoint += 1;
            continue;
        };

        let (Some(&source_index), Some(&target_index)) =
            (index_by_id.get(&source), index_by_id.get(&target))
        else {
            report.dangling_edges += 1;
            continue;
        };

        endpoints.push((source_index, target_index));
        links.push(Link {
            source,
            target,
            label: raw.label,
        });
    }

    (
        GraphData {
            nodes,
            links,
            endpoints,
            index_by_id,
        },
        report,
    )
}

pub fn adapt_raw(raw: RawGraph) -> (GraphData, AdaptReport) {
    let undecodable = raw.undecodable;
    let (graph, mut report) = adapt(raw.nodes, raw.edges);
    report.undecodable = undecodable;
    (graph, report)
}
