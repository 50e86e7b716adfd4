use eframe::egui::{CursorIcon, Rect, Response, Sense, Ui};

use super::GraphViewer;
use super::scene::Scene;

const LINK_HOVER_TOLERANCE: f32 = 4.0;

fn handle_zoom(scene: &mut Scene, ui: &Ui, rect: Rect, response: &Response) {
    if !response.hovered() {
        return;
    }

    let scroll = ui.input(|input| input.smooth_scroll_delta.y);
    if scroll.abs() <= f32::EPSILON {
        return;
    }

    let pointer = response.hover_pos().unwrap_or_else(|| rect.center());
    let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
    scene.viewport_mut().zoom_at(pointer, zoom_factor);
}

fn handle_pan(scene: &mut Scene, response: &Response) {
    if response.dragged() {
        scene.viewport_mut().pan_by_screen(response.drag_delta());
    }
}

fn handle_click(scene: &mut Scene, response: &Response) {
    if !response.clicked() {
        return;
    }
    if let Some(pointer) = response.interact_pointer_pos() {
        scene.focus_at(pointer);
    }
}

/// Hover cursor and tooltips. Nodes win over links.
fn handle_hover(scene: &mut Scene, ui: &Ui, response: &Response) {
    let pointer = if response.dragged() {
        None
    } else {
        response.hover_pos()
    };

    let tooltip = match scene.hover_at(pointer) {
        Some(index) => {
            ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
            scene.node_tooltip(index)
        }
        None => pointer
            .and_then(|pointer| scene.link_at(pointer, LINK_HOVER_TOLERANCE))
            .and_then(|index| scene.link_tooltip(index)),
    };

    if let Some(text) = tooltip {
        response.clone().on_hover_text_at_pointer(text);
    }
}

impl GraphViewer {
    pub(super) fn draw_canvas(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let dt = ui.input(|input| input.stable_dt).min(0.1);
        let show_particles = self.config.view.show_particles;

        let Some(scene) = self.scene.as_mut() else {
            return;
        };

        handle_zoom(scene, ui, rect, &response);
        handle_pan(scene, &response);
        handle_click(scene, &response);

        self.canvas = rect;
        scene.advance_frame(rect, dt);
        handle_hover(scene, ui, &response);

        let mut painter = ui.painter_at(rect);
        scene.paint(&mut painter);

        if !scene.simulation().is_settled() || show_particles || response.dragged() {
            ui.ctx().request_repaint();
        }
    }
}
