use eframe::egui::{self, Align, Layout, Sense, Ui, vec2};

use crate::palette::color_for;

use super::GraphViewer;

const LEGEND_SWATCH: f32 = 12.0;

impl GraphViewer {
    pub(super) fn draw_controls(&mut self, ui: &mut Ui) {
        let is_loading = self.is_loading();

        ui.horizontal_wrapped(|ui| {
            if ui
                .button("Fit to View")
                .on_hover_text("Zoom so every entity is visible.")
                .clicked()
            {
                self.fit_to_view();
            }
            if ui.button("Center").clicked() {
                self.center();
            }
            if ui.button("Zoom In").clicked() {
                self.zoom_in();
            }
            if ui.button("Zoom Out").clicked() {
                self.zoom_out();
            }
            if ui
                .button("Re-layout")
                .on_hover_text("Restart the force layout from the current positions.")
                .clicked()
            {
                self.relayout();
            }
            if ui
                .add_enabled(!is_loading, egui::Button::new("Reload"))
                .clicked()
            {
                self.reload();
            }
            if is_loading {
                ui.spinner();
            }

            ui.separator();

            if let Some(scene) = self.scene.as_mut() {
                ui.label("Search");
                ui.add(
                    egui::TextEdit::singleline(&mut scene.search.query)
                        .hint_text("entity name")
                        .desired_width(180.0),
                )
                .on_hover_text("Dim entities whose name does not match.");
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.label(format!(
                    "{} nodes / {} connections",
                    self.node_count(),
                    self.link_count()
                ));
            });
        });

        self.draw_legend(ui);
        ui.separator();
    }

    fn draw_legend(&self, ui: &mut Ui) {
        let legend = self.legend();
        if legend.is_empty() {
            return;
        }

        ui.horizontal_wrapped(|ui| {
            ui.strong("Entity Types");
            for category in legend {
                let (rect, _) =
                    ui.allocate_exact_size(vec2(LEGEND_SWATCH, LEGEND_SWATCH), Sense::hover());
                ui.painter().circle_filled(
                    rect.center(),
                    LEGEND_SWATCH * 0.5,
                    color_for(Some(category.as_str())),
                );
                ui.label(category);
                ui.add_space(6.0);
            }
        });
    }
}
