//! Camera state and the world <-> screen mapping.
//!
//! `screen = (world - center) * zoom + rect.center()`

use eframe::egui::{Pos2, Rect, Vec2, pos2, vec2};

use crate::config::ViewConfig;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomLimits {
    pub min: f32,
    pub max: f32,
}

impl ZoomLimits {
    pub fn clamp(self, zoom: f32) -> f32 {
        zoom.clamp(self.min, self.max)
    }
}

impl From<&ViewConfig> for ZoomLimits {
    fn from(config: &ViewConfig) -> Self {
        let min = config.min_zoom.max(f32::EPSILON);
        Self {
            min,
            max: config.max_zoom.max(min),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub center: Vec2,
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Camera {
    pub fn panned_to(self, x: f32, y: f32) -> Self {
        Self {
            center: vec2(x, y),
            ..self
        }
    }

    pub fn zoomed_by(self, factor: f32, limits: ZoomLimits) -> Self {
        if !factor.is_finite() || factor <= 0.0 {
            return self;
        }
        Self {
            zoom: limits.clamp(self.zoom * factor),
            ..self
        }
    }
}

#[derive(Clone, Debug)]
pub struct Viewport {
    rect: Rect,
    camera: Camera,
    limits: ZoomLimits,
}

impl Viewport {
    pub fn new(rect: Rect, limits: ZoomLimits) -> Self {
        Self {
            rect,
            camera: Camera {
                zoom: limits.clamp(1.0),
                ..Camera::default()
            },
            limits,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    pub fn zoom(&self) -> f32 {
        self.camera.zoom
    }

    pub fn limits(&self) -> ZoomLimits {
        self.limits
    }

    pub fn pan_to(&mut self, x: f32, y: f32) {
        self.camera = self.camera.panned_to(x, y);
    }

    pub fn zoom_by(&mut self, factor: f32) {
        self.camera = self.camera.zoomed_by(factor, self.limits);
    }

    /// Zooms while keeping the world point under `anchor` in place.
    pub fn zoom_at(&mut self, anchor: Pos2, factor: f32) {
        let world_before = self.screen_to_world(anchor);
        self.zoom_by(factor);
        let world_after = self.screen_to_world(anchor);
        self.camera.center += world_before - world_after;
    }

    pub fn pan_by_screen(&mut self, delta: Vec2) {
        self.camera.center -= delta / self.camera.zoom;
    }

    pub fn focus_on(&mut self, world: Vec2, zoom: f32) {
        self.camera = Camera {
            center: world,
            zoom: self.limits.clamp(zoom),
        };
    }

    pub fn world_to_screen(&self, world: Vec2) -> Pos2 {
        self.rect.center() + (world - self.camera.center) * self.camera.zoom
    }

    pub fn screen_to_world(&self, screen: Pos2) -> Vec2 {
        (screen - self.rect.center()) / self.camera.zoom + self.camera.center
    }

    pub fn visible_world_rect(&self) -> Rect {
        let min = self.screen_to_world(self.rect.min);
        let max = self.screen_to_world(self.rect.max);
        Rect::from_min_max(pos2(min.x, min.y), pos2(max.x, max.y))
    }

    /// Centers on the disks and picks the largest zoom that keeps all of
    /// them inside the viewport minus `padding`. No-op without disks.
    pub fn fit_to_bounds(&mut self, discs: impl IntoIterator<Item = (Vec2, f32)>, padding: f32) {
        let mut min = vec2(f32::INFINITY, f32::INFINITY);
        let mut max = vec2(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for (center, radius) in discs {
            let radius = radius.max(0.0);
            min = min.min(center - vec2(radius, radius));
            max = max.max(center + vec2(radius, radius));
        }
        if !min.x.is_finite() || !min.y.is_finite() || !max.x.is_finite() || !max.y.is_finite() {
            return;
        }

        let extent = (max - min).max(vec2(1.0, 1.0));
        let available = (self.rect.size() - vec2(padding, padding) * 2.0).max(vec2(1.0, 1.0));
        let zoom = (available.x / extent.x).min(available.y / extent.y);

        self.camera = Camera {
            center: (min + max) * 0.5,
            zoom: self.limits.clamp(zoom),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> ZoomLimits {
        ZoomLimits { min: 0.3, max: 8.0 }
    }

    fn viewport() -> Viewport {
        Viewport::new(
            Rect::from_min_size(pos2(20.0, 40.0), vec2(800.0, 600.0)),
            limits(),
        )
    }

    fn assert_close(a: Pos2, b: Pos2) {
        assert!((a - b).length() < 1e-2, "{a:?} != {b:?}");
    }

    #[test]
    fn round_trips_for_many_cameras() {
        let mut viewport = viewport();
        let points = [pos2(20.0, 40.0), pos2(420.0, 340.0), pos2(811.5, 17.25), pos2(-90.0, 1000.0)];
        let cameras = [(0.0, 0.0, 1.0), (250.0, -80.0, 0.3), (-1e3, 4e3, 8.0), (3.5, 9.25, 2.7)];

        for (x, y, zoom) in cameras {
            viewport.focus_on(vec2(x, y), zoom);
            for point in points {
                assert_close(viewport.world_to_screen(viewport.screen_to_world(point)), point);
            }
        }
    }

    #[test]
    fn origin_maps_to_viewport_center() {
        let viewport = viewport();
        assert_close(viewport.world_to_screen(Vec2::ZERO), viewport.rect().center());
    }

    #[test]
    fn zoom_is_clamped() {
        let mut viewport = viewport();
        viewport.zoom_by(100.0);
        assert_eq!(viewport.zoom(), 8.0);
        viewport.zoom_by(0.0001);
        assert_eq!(viewport.zoom(), 0.3);
        viewport.zoom_by(f32::NAN);
        assert_eq!(viewport.zoom(), 0.3);
        viewport.zoom_by(-2.0);
        assert_eq!(viewport.zoom(), 0.3);
    }

    #[test]
    fn camera_transforms_are_pure() {
        let camera = Camera {
            center: vec2(3.0, 4.0),
            zoom: 1.2,
        };
        assert_eq!(camera.zoomed_by(1.5, limits()), camera.zoomed_by(1.5, limits()));
        assert_eq!(camera.panned_to(7.0, 8.0), camera.panned_to(7.0, 8.0));

        let mut viewport = viewport();
        viewport.pan_to(10.0, -5.0);
        let once = viewport.camera();
        viewport.pan_to(10.0, -5.0);
        assert_eq!(viewport.camera(), once);
    }

    #[test]
    fn zoom_at_keeps_anchor_fixed() {
        let mut viewport = viewport();
        viewport.pan_to(40.0, 12.0);
        let anchor = pos2(600.0, 120.0);
        let world = viewport.screen_to_world(anchor);

        viewport.zoom_at(anchor, 1.8);

        assert!((viewport.zoom() - 1.8).abs() < 1e-5);
        assert_close(viewport.world_to_screen(world), anchor);
    }

    #[test]
    fn drag_moves_world_with_pointer() {
        let mut viewport = viewport();
        viewport.zoom_by(2.0);
        let world = vec2(15.0, 15.0);
        let before = viewport.world_to_screen(world);

        viewport.pan_by_screen(vec2(30.0, -10.0));

        assert_close(viewport.world_to_screen(world), before + vec2(30.0, -10.0));
    }

    #[test]
    fn fit_keeps_every_disk_inside_padding() {
        let mut viewport = viewport();
        let discs = [
            (vec2(-300.0, 10.0), 5.0),
            (vec2(420.0, -50.0), 12.0),
            (vec2(60.0, 380.0), 8.0),
        ];

        viewport.fit_to_bounds(discs, 50.0);

        let inner = viewport.rect().shrink(50.0 - 0.01);
        for (center, radius) in discs {
            let screen = viewport.world_to_screen(center);
            let r = radius * viewport.zoom();
            assert!(inner.contains(screen - vec2(r, r)), "{screen:?}");
            assert!(inner.contains(screen + vec2(r, r)), "{screen:?}");
        }
    }

    #[test]
    fn fit_on_single_small_disk_hits_max_zoom() {
        let mut viewport = viewport();
        viewport.fit_to_bounds([(vec2(5.0, 5.0), 1.0)], 50.0);
        assert_eq!(viewport.zoom(), 8.0);
        assert_eq!(viewport.camera().center, vec2(5.0, 5.0));
    }

    #[test]
    fn fit_without_disks_is_noop() {
        let mut viewport = viewport();
        viewport.pan_to(3.0, 3.0);
        let before = viewport.camera();
        viewport.fit_to_bounds(std::iter::empty(), 50.0);
        assert_eq!(viewport.camera(), before);
    }
}
