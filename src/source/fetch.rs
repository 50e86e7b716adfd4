use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::FetchError;

use super::adapt::adapt_raw;
use super::graph::GraphData;
use super::raw::{RawGraph, parse_graph};

pub const DEFAULT_GRAPH_URL: &str = "http://localhost:8000/api/analysis/graph/entities";

/// Where raw graph records come from. Implementations block; the viewer
/// calls them from a worker thread.
pub trait GraphSource: Send + Sync {
    fn fetch(&self) -> Result<RawGraph, FetchError>;

    fn describe(&self) -> String;
}

#[derive(Clone, Debug)]
pub struct HttpSource {
    url: String,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }
}

impl GraphSource for HttpSource {
    fn fetch(&self) -> Result<RawGraph, FetchError> {
        let http_error = |source| FetchError::Http {
            url: self.url.clone(),
            source,
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(http_error)?;
        let response = client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .map_err(http_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(http_error)?;
        parse_graph(&body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl GraphSource for FileSource {
    fn fetch(&self) -> Result<RawGraph, FetchError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|source| FetchError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_graph(&raw)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Fetches and adapts one graph. Dropped records are logged, never fatal.
pub fn load_graph(source: &dyn GraphSource) -> Result<GraphData, FetchError> {
    let origin = source.describe();
    info!(source = %origin, "loading entity graph");

    let raw = source.fetch().inspect_err(|error| {
        warn!(source = %origin, %error, "graph fetch failed");
    })?;
    let (graph, report) = adapt_raw(raw);

    if report.dropped() > 0 {
        warn!(
            nodes_without_id = report.nodes_without_id,
            duplicate_nodes = report.duplicate_nodes,
            edges_without_endpoint = report.edges_without_endpoint,
            dangling_edges = report.dangling_edges,
            undecodable = report.undecodable,
            "dropped malformed graph records"
        );
    }
    info!(
        nodes = graph.node_count(),
        links = graph.link_count(),
        "entity graph loaded"
    );

    Ok(graph)
}
