//! Force-directed viewer for entity relationship graphs.
//!
//! Graph records are pulled from a [`GraphSource`], validated into
//! [`GraphData`], laid out by [`Simulation`] and drawn by [`GraphViewer`]
//! inside any egui `Ui`.

pub mod app;
pub mod config;
pub mod error;
pub mod palette;
pub mod physics;
pub mod render;
pub mod search;
pub mod source;
pub mod viewer;
pub mod viewport;

pub use config::{SimulationConfig, ViewConfig, ViewerConfig};
pub use error::FetchError;
pub use physics::{Body, Phase, Simulation};
pub use source::{FileSource, GraphData, GraphSource, HttpSource, RawGraph};
pub use viewer::{GraphViewer, Scene, ViewerStatus};
pub use viewport::{Camera, Viewport};
