use eframe::egui::{Pos2, Rect};
use tracing::debug;

use crate::config::{ViewConfig, ViewerConfig};
use crate::palette::legend_entries;
use crate::physics::{Body, Phase, Simulation};
use crate::render::{self, Frame, FrameStats, Surface, advance_flow_phase};
use crate::search::SearchState;
use crate::source::GraphData;
use crate::viewport::{Viewport, ZoomLimits};

/// A loaded graph together with its layout and camera.
pub struct Scene {
    graph: GraphData,
    simulation: Simulation,
    viewport: Viewport,
    view: ViewConfig,
    radii: Vec<f32>,
    legend: Vec<String>,
    auto_fit_pending: bool,
    flow_phase: f32,
    pub(super) hovered: Option<usize>,
    pub(super) search: SearchState,
}

impl Scene {
    /// Builds the simulation and runs its warm-up before the first frame.
    pub fn new(graph: GraphData, config: &ViewerConfig, rect: Rect) -> Self {
        let radii = graph
            .nodes()
            .iter()
            .map(|node| config.simulation.node_radius(node.weight))
            .collect();
        let legend = legend_entries(graph.nodes());

        let mut simulation = Simulation::new(&graph, config.simulation.clone());
        let phase = simulation.warm_up();
        debug!(ticks = simulation.ticks(), ?phase, "layout warmed up");

        Self {
            graph,
            simulation,
            viewport: Viewport::new(rect, ZoomLimits::from(&config.view)),
            view: config.view.clone(),
            radii,
            legend,
            auto_fit_pending: true,
            flow_phase: 0.0,
            hovered: None,
            search: SearchState::default(),
        }
    }

    pub fn graph(&self) -> &GraphData {
        &self.graph
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn bodies(&self) -> &[Body] {
        self.simulation.bodies()
    }

    /// World-space disk radius per node.
    pub fn radii(&self) -> &[f32] {
        &self.radii
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn legend(&self) -> &[String] {
        &self.legend
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn search_query(&self) -> &str {
        &self.search.query
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search.query = query.into();
    }

    pub(super) fn carry_search_from(&mut self, previous: &Scene) {
        self.search = SearchState::new(previous.search.query.clone());
    }

    /// One frame of work: at most one simulation tick, then the one-time
    /// fit once the layout settles.
    pub fn advance_frame(&mut self, rect: Rect, dt: f32) -> Phase {
        self.viewport.set_rect(rect);
        self.flow_phase = advance_flow_phase(self.flow_phase, dt);

        let phase = self.simulation.advance();
        if phase == Phase::Settled && self.auto_fit_pending {
            self.auto_fit_pending = false;
            self.fit_to_view();
            debug!(zoom = self.viewport.zoom(), "fitted settled layout");
        }
        phase
    }

    pub fn fit_to_view(&mut self) {
        let discs = self
            .simulation
            .bodies()
            .iter()
            .zip(&self.radii)
            .map(|(body, radius)| (body.position, *radius))
            .collect::<Vec<_>>();
        self.viewport.fit_to_bounds(discs, self.view.fit_padding);
    }

    pub fn center(&mut self) {
        self.viewport.pan_to(0.0, 0.0);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_by(self.view.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_by(1.0 / self.view.zoom_step);
    }

    /// Restarts relaxation from the current layout.
    pub fn relayout(&mut self) {
        self.simulation.reheat();
    }

    pub fn node_at(&self, pointer: Pos2) -> Option<usize> {
        render::node_at(pointer, self.bodies(), &self.radii, &self.viewport)
    }

    pub fn link_at(&self, pointer: Pos2, tolerance: f32) -> Option<usize> {
        render::link_at(pointer, &self.graph, self.bodies(), &self.viewport, tolerance)
    }

    /// Centers on the node under `pointer` at the focus zoom. Returns the
    /// focused node, or `None` when the click hit empty space.
    pub fn focus_at(&mut self, pointer: Pos2) -> Option<usize> {
        let index = self.node_at(pointer)?;
        let position = self.bodies()[index].position;
        self.viewport.focus_on(position, self.view.focus_zoom);
        Some(index)
    }

    /// Recomputes the hovered node; returns it.
    pub fn hover_at(&mut self, pointer: Option<Pos2>) -> Option<usize> {
        self.hovered = pointer.and_then(|pointer| self.node_at(pointer));
        self.hovered
    }

    pub fn paint(&mut self, surface: &mut impl Surface) -> FrameStats {
        let matches = self.search.matches(self.graph.nodes());
        render::draw_frame(
            surface,
            &Frame {
                graph: &self.graph,
                bodies: self.simulation.bodies(),
                radii: &self.radii,
                viewport: &self.viewport,
                view: &self.view,
                flow_phase: self.flow_phase,
                hovered: self.hovered,
                matches,
            },
        )
    }

    pub fn node_tooltip(&self, index: usize) -> Option<String> {
        let node = self.graph.nodes().get(index)?;
        Some(match &node.category {
            Some(category) => format!("{} ({category})", node.name),
            None => node.name.clone(),
        })
    }

    pub fn link_tooltip(&self, index: usize) -> Option<String> {
        let link = self.graph.links().get(index)?;
        Some(
            link.label
                .clone()
                .unwrap_or_else(|| format!("{} -> {}", link.source, link.target)),
        )
    }
}
