use std::collections::HashMap;

pub const DEFAULT_WEIGHT: f32 = 5.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub weight: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Link {
    pub source: String,
    pub target: String,
    pub label: Option<String>,
}

/// A validated node/link set. Every link endpoint resolves to a node index.
#[derive(Clone, Debug, Default)]
pub struct GraphData {
    pub(crate) nodes: Vec<Node>,
    pub(crate) links: Vec<Link>,
    pub(crate) endpoints: Vec<(usize, usize)>,
    pub(crate) index_by_id: HashMap<String, usize>,
}

impl GraphData {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// `(source_index, target_index)` for each entry of [`Self::links`].
    pub fn endpoints(&self) -> &[(usize, usize)] {
        &self.endpoints
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of links touching each node, self-loops excluded.
    pub fn degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0usize; self.nodes.len()];
        for &(source, target) in &self.endpoints {
            if source == target {
                continue;
            }
            degrees[source] += 1;
            degrees[target] += 1;
        }
        degrees
    }
}
