use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, Vec2};

/// Drawing target for one frame, in screen coordinates.
pub trait Surface {
    fn fill_rect(&mut self, rect: Rect, color: Color32);

    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke);

    fn disc(&mut self, center: Pos2, radius: f32, fill: Color32, stroke: Stroke);

    fn measure_text(&self, text: &str, font_size: f32) -> Vec2;

    fn draw_text(&mut self, anchor: Pos2, align: Align2, text: &str, font_size: f32, color: Color32);
}

impl Surface for Painter {
    fn fill_rect(&mut self, rect: Rect, color: Color32) {
        Painter::rect_filled(self, rect, 0.0, color);
    }

    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke) {
        Painter::line_segment(self, [from, to], stroke);
    }

    fn disc(&mut self, center: Pos2, radius: f32, fill: Color32, stroke: Stroke) {
        Painter::circle(self, center, radius, fill, stroke);
    }

    fn measure_text(&self, text: &str, font_size: f32) -> Vec2 {
        Painter::layout_no_wrap(
            self,
            text.to_owned(),
            FontId::proportional(font_size),
            Color32::WHITE,
        )
        .size()
    }

    fn draw_text(&mut self, anchor: Pos2, align: Align2, text: &str, font_size: f32, color: Color32) {
        Painter::text(
            self,
            anchor,
            align,
            text,
            FontId::proportional(font_size),
            color,
        );
    }
}
