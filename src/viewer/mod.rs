//! The mountable graph widget: load lifecycle, per-frame stepping and UI.

mod controls;
mod interaction;
mod scene;

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use eframe::egui::{self, Pos2, Rect, Ui, vec2};
use tracing::{debug, info, warn};

use crate::config::ViewerConfig;
use crate::error::FetchError;
use crate::physics::Phase;
use crate::source::{GraphData, GraphSource, load_graph};
use crate::viewport::Camera;
pub use scene::Scene;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewerStatus {
    /// Nothing requested yet. The first `show` starts a load.
    Idle,
    Loading,
    Error(String),
    /// The source answered with no usable nodes.
    Empty,
    Ready,
}

struct LoadResponse {
    request: u64,
    result: Result<GraphData, FetchError>,
}

struct PendingLoad {
    request: u64,
    worker: JoinHandle<()>,
}

pub struct GraphViewer {
    source: Arc<dyn GraphSource>,
    config: ViewerConfig,
    status: ViewerStatus,
    scene: Option<Scene>,
    banner: Option<String>,
    last_request: u64,
    pending: Option<PendingLoad>,
    tx: Sender<LoadResponse>,
    rx: Receiver<LoadResponse>,
    canvas: Rect,
}

impl GraphViewer {
    pub fn new(source: impl GraphSource + 'static) -> Self {
        Self::with_config(source, ViewerConfig::default())
    }

    pub fn with_config(source: impl GraphSource + 'static, config: ViewerConfig) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source: Arc::new(source),
            config,
            status: ViewerStatus::Idle,
            scene: None,
            banner: None,
            last_request: 0,
            pending: None,
            tx,
            rx,
            canvas: Rect::from_min_size(Pos2::ZERO, vec2(800.0, 600.0)),
        }
    }

    pub fn status(&self) -> &ViewerStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Error from the latest reload while an older graph is still shown.
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.scene.as_mut()
    }

    pub fn node_count(&self) -> usize {
        self.scene.as_ref().map_or(0, |scene| scene.graph().node_count())
    }

    pub fn link_count(&self) -> usize {
        self.scene.as_ref().map_or(0, |scene| scene.graph().link_count())
    }

    pub fn legend(&self) -> &[String] {
        self.scene.as_ref().map_or(&[], |scene| scene.legend())
    }

    pub fn camera(&self) -> Option<Camera> {
        self.scene.as_ref().map(|scene| scene.viewport().camera())
    }

    pub fn fit_to_view(&mut self) {
        if let Some(scene) = self.scene.as_mut() {
            scene.fit_to_view();
        }
    }

    pub fn center(&mut self) {
        if let Some(scene) = self.scene.as_mut() {
            scene.center();
        }
    }

    pub fn zoom_in(&mut self) {
        if let Some(scene) = self.scene.as_mut() {
            scene.zoom_in();
        }
    }

    pub fn zoom_out(&mut self) {
        if let Some(scene) = self.scene.as_mut() {
            scene.zoom_out();
        }
    }

    pub fn relayout(&mut self) {
        if let Some(scene) = self.scene.as_mut() {
            scene.relayout();
        }
    }

    /// Starts a fresh load. Any load still in flight is superseded and its
    /// response will be dropped on arrival.
    pub fn reload(&mut self) {
        self.last_request += 1;
        let request = self.last_request;
        if let Some(previous) = self.pending.take() {
            debug!(superseded = previous.request, request, "superseding graph load");
        }

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let worker = thread::spawn(move || {
            let result = load_graph(source.as_ref());
            let _ = tx.send(LoadResponse { request, result });
        });

        self.pending = Some(PendingLoad { request, worker });
        self.status = ViewerStatus::Loading;
    }

    /// Drains finished loads without blocking.
    pub fn poll(&mut self) {
        let worker_finished = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.worker.is_finished());

        while let Ok(response) = self.rx.try_recv() {
            self.apply_response(response.request, response.result);
        }

        if worker_finished && let Some(pending) = self.pending.take() {
            self.apply_response(pending.request, Err(FetchError::Disconnected));
        }
    }

    /// Blocks until the current load resolves or `timeout` elapses.
    pub fn wait_for_load(&mut self, timeout: Duration) -> &ViewerStatus {
        let deadline = Instant::now() + timeout;
        while self.pending.is_some() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining.min(Duration::from_millis(50))) {
                Ok(response) => self.apply_response(response.request, response.result),
                Err(RecvTimeoutError::Timeout) => {
                    self.poll();
                    if Instant::now() >= deadline {
                        break;
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        &self.status
    }

    pub(crate) fn apply_response(&mut self, request: u64, result: Result<GraphData, FetchError>) {
        let is_current = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.request == request);
        if !is_current {
            debug!(request, latest = self.last_request, "dropping stale graph response");
            return;
        }
        self.pending = None;

        match result {
            Ok(graph) if graph.is_empty() => {
                info!("graph source returned no nodes");
                self.scene = None;
                self.banner = None;
                self.status = ViewerStatus::Empty;
            }
            Ok(graph) => {
                let mut scene = Scene::new(graph, &self.config, self.canvas);
                if let Some(previous) = &self.scene {
                    scene.carry_search_from(previous);
                }
                self.scene = Some(scene);
                self.banner = None;
                self.status = ViewerStatus::Ready;
            }
            Err(error) => {
                let message = error.to_string();
                if self.scene.is_some() {
                    warn!(%message, "reload failed, keeping previous graph");
                    self.banner = Some(message);
                    self.status = ViewerStatus::Ready;
                } else {
                    self.status = ViewerStatus::Error(message);
                }
            }
        }
    }

    /// Advances one frame without drawing: polls loads and steps the
    /// simulation once.
    pub fn step(&mut self, canvas: Rect, dt: f32) -> Option<Phase> {
        self.canvas = canvas;
        self.poll();
        let scene = self.scene.as_mut()?;
        Some(scene.advance_frame(canvas, dt))
    }

    pub fn show(&mut self, ui: &mut Ui) {
        if self.status == ViewerStatus::Idle {
            self.reload();
        }
        self.poll();
        if self.pending.is_some() {
            ui.ctx().request_repaint_after(Duration::from_millis(50));
        }

        match self.status.clone() {
            ViewerStatus::Idle | ViewerStatus::Loading if self.scene.is_none() => {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Loading entity network...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            }
            ViewerStatus::Error(message) => {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Failed to load entity network");
                    ui.add_space(6.0);
                    ui.label(message);
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        self.reload();
                    }
                });
            }
            ViewerStatus::Empty => {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("No network data available");
                    ui.add_space(10.0);
                    if ui.button("Reload").clicked() {
                        self.reload();
                    }
                });
            }
            _ => self.show_scene(ui),
        }
    }

    fn show_scene(&mut self, ui: &mut Ui) {
        self.draw_controls(ui);

        if let Some(message) = self.banner.clone() {
            ui.horizontal(|ui| {
                ui.colored_label(
                    ui.visuals().error_fg_color,
                    format!("Reload failed: {message}"),
                );
                if ui.add_enabled(!self.is_loading(), egui::Button::new("Retry")).clicked() {
                    self.reload();
                }
            });
        }

        self.draw_canvas(ui);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{RawEdge, RawGraph, RawNode, adapt};

    struct NeverSource;

    impl GraphSource for NeverSource {
        fn fetch(&self) -> Result<RawGraph, FetchError> {
            Err(FetchError::Shape("unused".into()))
        }

        fn describe(&self) -> String {
            "never".into()
        }
    }

    fn graph(ids: &[&str]) -> GraphData {
        let nodes = ids
            .iter()
            .map(|id| RawNode {
                id: Some((*id).to_owned()),
                ..RawNode::default()
            })
            .collect();
        let edges = ids
            .windows(2)
            .map(|pair| RawEdge {
                source: Some(pair[0].to_owned()),
                target: Some(pair[1].to_owned()),
                label: None,
            })
            .collect();
        adapt(nodes, edges).0
    }

    fn viewer() -> GraphViewer {
        GraphViewer::new(NeverSource)
    }

    fn pretend_pending(viewer: &mut GraphViewer) -> u64 {
        viewer.last_request += 1;
        let request = viewer.last_request;
        viewer.pending = Some(PendingLoad {
            request,
            worker: thread::spawn(|| {}),
        });
        viewer.status = ViewerStatus::Loading;
        request
    }

    #[test]
    fn starts_idle() {
        let viewer = viewer();
        assert_eq!(viewer.status(), &ViewerStatus::Idle);
        assert_eq!(viewer.node_count(), 0);
        assert!(viewer.legend().is_empty());
        assert!(viewer.camera().is_none());
    }

    #[test]
    fn stale_response_is_ignored() {
        let mut viewer = viewer();
        let first = pretend_pending(&mut viewer);
        let second = pretend_pending(&mut viewer);

        viewer.apply_response(first, Ok(graph(&["A", "B", "C"])));
        assert_eq!(viewer.status(), &ViewerStatus::Loading);
        assert_eq!(viewer.node_count(), 0);

        viewer.apply_response(second, Ok(graph(&["X", "Y"])));
        assert_eq!(viewer.status(), &ViewerStatus::Ready);
        assert_eq!(viewer.node_count(), 2);
        assert_eq!(viewer.link_count(), 1);
    }

    #[test]
    fn failure_after_success_keeps_previous_graph() {
        let mut viewer = viewer();
        let request = pretend_pending(&mut viewer);
        viewer.apply_response(request, Ok(graph(&["A", "B"])));

        let request = pretend_pending(&mut viewer);
        viewer.apply_response(request, Err(FetchError::Status {
            url: "http://example.invalid".into(),
            status: 503,
        }));

        assert_eq!(viewer.status(), &ViewerStatus::Ready);
        assert_eq!(viewer.node_count(), 2);
        assert!(viewer.banner().is_some_and(|banner| banner.contains("503")));
    }

    #[test]
    fn failure_without_graph_is_an_error() {
        let mut viewer = viewer();
        let request = pretend_pending(&mut viewer);
        viewer.apply_response(request, Err(FetchError::Disconnected));

        assert!(matches!(viewer.status(), ViewerStatus::Error(_)));
        assert!(viewer.scene().is_none());
    }

    #[test]
    fn empty_graph_creates_no_simulation() {
        let mut viewer = viewer();
        let request = pretend_pending(&mut viewer);
        viewer.apply_response(request, Ok(GraphData::default()));

        assert_eq!(viewer.status(), &ViewerStatus::Empty);
        assert!(viewer.scene().is_none());
        assert_eq!(viewer.step(viewer.canvas, 1.0 / 60.0), None);
    }

    #[test]
    fn success_after_failure_clears_banner_and_keeps_search() {
        let mut viewer = viewer();
        let request = pretend_pending(&mut viewer);
        viewer.apply_response(request, Ok(graph(&["A", "B"])));
        if let Some(scene) = viewer.scene_mut() {
            scene.set_search_query("A");
        }

        let request = pretend_pending(&mut viewer);
        viewer.apply_response(request, Err(FetchError::Disconnected));
        let request = pretend_pending(&mut viewer);
        viewer.apply_response(request, Ok(graph(&["A", "B", "C"])));

        assert_eq!(viewer.banner(), None);
        assert_eq!(viewer.node_count(), 3);
        assert_eq!(viewer.scene().map(Scene::search_query), Some("A"));
    }

    #[test]
    fn worker_result_arrives_through_poll() {
        let mut viewer = viewer();
        viewer.reload();
        let status = viewer.wait_for_load(Duration::from_secs(5)).clone();

        assert!(matches!(status, ViewerStatus::Error(message) if message.contains("unused")));
        assert!(!viewer.is_loading());
    }
}
