mod adapt;
mod fetch;
mod graph;
mod raw;

pub use adapt::{AdaptReport, adapt, adapt_raw};
pub use fetch::{DEFAULT_GRAPH_URL, FileSource, GraphSource, HttpSource, load_graph};
pub use graph::{DEFAULT_WEIGHT, GraphData, Link, Node};
pub use raw::{RawEdge, RawGraph, RawNode, parse_graph};
