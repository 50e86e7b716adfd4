//! Per-frame drawing of the graph and pointer hit testing.

mod surface;
mod utils;

use std::collections::HashSet;

use eframe::egui::{Align2, Color32, Pos2, Rect, Stroke, pos2, vec2};

use crate::config::ViewConfig;
use crate::palette::color_for;
use crate::physics::Body;
use crate::source::GraphData;
use crate::viewport::Viewport;
pub use surface::Surface;
use utils::{blend_color, circle_visible, distance_to_segment, edge_visible};

pub const BACKGROUND: Color32 = Color32::WHITE;
const GRID_COLOR: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 10);
const GRID_STEP: f32 = 100.0;
const LINK_COLOR: Color32 = Color32::from_rgba_premultiplied(36, 32, 102, 102);
const LINK_WIDTH: f32 = 2.0;
const PARTICLE_COLOR: Color32 = Color32::from_rgba_premultiplied(73, 63, 204, 204);
const PARTICLES_PER_LINK: usize = 4;
const PARTICLE_WIDTH: f32 = 2.5;
/// Fraction of a link a particle travels per 60 Hz frame.
pub const PARTICLE_SPEED: f32 = 0.006;
const NODE_BORDER: Color32 = Color32::from_rgba_premultiplied(204, 204, 204, 204);
const NODE_BORDER_WIDTH: f32 = 1.5;
const HOVER_RING: Color32 = Color32::from_rgb(26, 26, 26);
const MATCH_RING: Color32 = Color32::from_rgb(103, 196, 255);
const LABEL_TEXT: Color32 = Color32::from_rgb(26, 26, 26);
const LABEL_PLATE: Color32 = Color32::from_rgba_premultiplied(230, 230, 230, 230);
const LABEL_MIN_FONT: f32 = 10.0;
const LABEL_FONT: f32 = 14.0;

/// Everything one frame reads. Positions come straight from the
/// simulation's bodies; nothing here is mutated.
pub struct Frame<'a> {
    pub graph: &'a GraphData,
    pub bodies: &'a [Body],
    /// World-space disk radius per node.
    pub radii: &'a [f32],
    pub viewport: &'a Viewport,
    pub view: &'a ViewConfig,
    pub flow_phase: f32,
    pub hovered: Option<usize>,
    pub matches: Option<&'a HashSet<usize>>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub links: usize,
    pub particles: usize,
    pub nodes: usize,
    pub labels: usize,
}

pub fn labels_visible(zoom: f32, view: &ViewConfig) -> bool {
    zoom > view.label_zoom_threshold
}

/// Screen-space label font size: 14 px, growing once the world-space
/// minimum of 10 units outgrows it.
pub fn label_font_size(zoom: f32) -> f32 {
    (LABEL_MIN_FONT * zoom).max(LABEL_FONT)
}

fn draw_grid(surface: &mut impl Surface, viewport: &Viewport) {
    let rect = viewport.rect();
    let zoom = viewport.zoom();
    let mut step = GRID_STEP;
    while step * zoom < 24.0 {
        step *= 2.0;
    }

    let world = viewport.visible_world_rect();
    let stroke = Stroke::new(1.0, GRID_COLOR);

    let mut x = (world.left() / step).floor() * step;
    while x <= world.right() {
        let screen_x = viewport.world_to_screen(vec2(x, 0.0)).x;
        surface.line(pos2(screen_x, rect.top()), pos2(screen_x, rect.bottom()), stroke);
        x += step;
    }

    let mut y = (world.top() / step).floor() * step;
    while y <= world.bottom() {
        let screen_y = viewport.world_to_screen(vec2(0.0, y)).y;
        surface.line(pos2(rect.left(), screen_y), pos2(rect.right(), screen_y), stroke);
        y += step;
    }
}

fn draw_label(
    surface: &mut impl Surface,
    position: Pos2,
    radius: f32,
    zoom: f32,
    text: &str,
) {
    let font_size = label_font_size(zoom);
    let text_size = surface.measure_text(text, font_size);
    let padding = font_size * 0.3;
    let plate_top = position.y + radius + 4.0 * zoom;
    let plate = Rect::from_center_size(
        pos2(position.x, plate_top + (text_size.y + padding) * 0.5),
        vec2(text_size.x + padding, text_size.y + padding),
    );

    surface.fill_rect(plate, LABEL_PLATE);
    surface.draw_text(
        pos2(position.x, plate_top + padding * 0.5),
        Align2::CENTER_TOP,
        text,
        font_size,
        LABEL_TEXT,
    );
}

pub fn draw_frame(surface: &mut impl Surface, frame: &Frame<'_>) -> FrameStats {
    let viewport = frame.viewport;
    let rect = viewport.rect();
    let zoom = viewport.zoom();
    let mut stats = FrameStats::default();

    surface.fill_rect(rect, BACKGROUND);
    draw_grid(surface, viewport);

    let screen_positions = frame
        .bodies
        .iter()
        .map(|body| viewport.world_to_screen(body.position))
        .collect::<Vec<_>>();
    let screen_radii = frame
        .radii
        .iter()
        .map(|radius| radius * zoom)
        .collect::<Vec<_>>();

    let particle_radius = (PARTICLE_WIDTH * 0.5 * zoom).max(1.0);
    for &(source, target) in frame.graph.endpoints() {
        if source >= screen_positions.len() || target >= screen_positions.len() {
            continue;
        }
        let start = screen_positions[source];
        let end = screen_positions[target];
        if !edge_visible(rect, start, end, LINK_WIDTH) {
            continue;
        }

        surface.line(start, end, Stroke::new(LINK_WIDTH, LINK_COLOR));
        stats.links += 1;

        if frame.view.show_particles && source != target {
            for particle in 0..PARTICLES_PER_LINK {
                let t = (frame.flow_phase + particle as f32 / PARTICLES_PER_LINK as f32).fract();
                let position = start + (end - start) * t;
                surface.disc(position, particle_radius, PARTICLE_COLOR, Stroke::NONE);
                stats.particles += 1;
            }
        }
    }

    let searching = frame.matches.is_some();
    let show_labels = labels_visible(zoom, frame.view);
    for (index, node) in frame.graph.nodes().iter().enumerate() {
        let (Some(&position), Some(&radius)) =
            (screen_positions.get(index), screen_radii.get(index))
        else {
            continue;
        };
        if !circle_visible(rect, position, radius) {
            continue;
        }

        let is_match = frame.matches.is_some_and(|matches| matches.contains(&index));
        let base = color_for(node.category.as_deref());
        let fill = if searching && !is_match {
            blend_color(base, BACKGROUND, 0.7)
        } else {
            base
        };

        surface.disc(
            position,
            radius,
            fill,
            Stroke::new(NODE_BORDER_WIDTH, NODE_BORDER),
        );
        if frame.hovered == Some(index) {
            surface.disc(
                position,
                radius + 2.5,
                Color32::TRANSPARENT,
                Stroke::new(2.0, HOVER_RING),
            );
        } else if searching && is_match {
            surface.disc(
                position,
                radius + 2.5,
                Color32::TRANSPARENT,
                Stroke::new(2.0, MATCH_RING),
            );
        }
        stats.nodes += 1;

        if show_labels {
            draw_label(surface, position, radius, zoom, &node.name);
            stats.labels += 1;
        }
    }

    stats
}

/// Closest node whose screen-space disk contains `pointer`.
pub fn node_at(
    pointer: Pos2,
    bodies: &[Body],
    radii: &[f32],
    viewport: &Viewport,
) -> Option<usize> {
    let zoom = viewport.zoom();
    bodies
        .iter()
        .zip(radii)
        .enumerate()
        .filter_map(|(index, (body, radius))| {
            let distance = viewport.world_to_screen(body.position).distance(pointer);
            (distance <= radius * zoom).then_some((index, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}

/// Closest link passing within `tolerance` screen pixels of `pointer`.
pub fn link_at(
    pointer: Pos2,
    graph: &GraphData,
    bodies: &[Body],
    viewport: &Viewport,
    tolerance: f32,
) -> Option<usize> {
    graph
        .endpoints()
        .iter()
        .enumerate()
        .filter_map(|(index, &(source, target))| {
            let start = viewport.world_to_screen(bodies.get(source)?.position);
            let end = viewport.world_to_screen(bodies.get(target)?.position);
            let distance = distance_to_segment(pointer, start, end);
            (distance <= tolerance).then_some((index, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}

/// Advances the particle phase by a frame of `dt` seconds.
pub fn advance_flow_phase(phase: f32, dt: f32) -> f32 {
    (phase + PARTICLE_SPEED * dt * 60.0).fract()
}
