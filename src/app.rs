use eframe::egui::{self, Align, Context, Layout};

use crate::viewer::GraphViewer;

/// Desktop shell around the graph widget.
pub struct EntityGraphApp {
    origin: String,
    viewer: GraphViewer,
}

impl EntityGraphApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, origin: String, viewer: GraphViewer) -> Self {
        Self { origin, viewer }
    }
}

impl eframe::App for EntityGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Entity Relationship Network");
                    ui.separator();
                    ui.label(format!("source: {}", self.origin));
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(camera) = self.viewer.camera() {
                            ui.label(format!("zoom {:.2}x", camera.zoom));
                        }
                    });
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| self.viewer.show(ui));
    }
}
