use std::io::Write;
use std::time::Duration;

use eframe::egui::{Align2, Color32, Pos2, Rect, Stroke, Vec2, vec2};
use entity_graph::render::Surface;
use entity_graph::source::{FileSource, GraphSource, RawGraph, parse_graph};
use entity_graph::{FetchError, GraphViewer, Phase, ViewerStatus};

const ALPHA_BETA: &str = r#"{
    "nodes": [
        {"id": "A", "name": "Alpha", "category": "Corporation"},
        {"id": "B", "name": "Beta", "category": "Government Agency"}
    ],
    "edges": [
        {"source": "A", "target": "B", "label": "Contract"}
    ]
}"#;

struct StaticSource(&'static str);

impl GraphSource for StaticSource {
    fn fetch(&self) -> Result<RawGraph, FetchError> {
        parse_graph(self.0)
    }

    fn describe(&self) -> String {
        "static".into()
    }
}

#[derive(Default)]
struct CountingSurface {
    lines: usize,
    discs: usize,
    texts: Vec<String>,
}

impl Surface for CountingSurface {
    fn fill_rect(&mut self, _rect: Rect, _color: Color32) {}

    fn line(&mut self, _from: Pos2, _to: Pos2, _stroke: Stroke) {
        self.lines += 1;
    }

    fn disc(&mut self, _center: Pos2, _radius: f32, _fill: Color32, _stroke: Stroke) {
        self.discs += 1;
    }

    fn measure_text(&self, text: &str, font_size: f32) -> Vec2 {
        vec2(text.len() as f32 * font_size * 0.5, font_size)
    }

    fn draw_text(&mut self, _anchor: Pos2, _align: Align2, text: &str, _size: f32, _color: Color32) {
        self.texts.push(text.to_owned());
    }
}

fn canvas() -> Rect {
    Rect::from_min_size(Pos2::ZERO, vec2(1000.0, 700.0))
}

fn loaded(source: impl GraphSource + 'static) -> GraphViewer {
    let mut viewer = GraphViewer::new(source);
    viewer.reload();
    viewer.wait_for_load(Duration::from_secs(10));
    viewer
}

fn settle(viewer: &mut GraphViewer) {
    for _ in 0..10_000 {
        if viewer.step(canvas(), 1.0 / 60.0) == Some(Phase::Settled) {
            return;
        }
    }
    panic!("layout never settled");
}

#[test]
fn alpha_beta_scenario() {
    let mut viewer = loaded(StaticSource(ALPHA_BETA));
    assert_eq!(viewer.status(), &ViewerStatus::Ready);
    assert_eq!(viewer.node_count(), 2);
    assert_eq!(viewer.link_count(), 1);
    assert_eq!(viewer.legend(), ["Corporation", "Government Agency"]);

    settle(&mut viewer);

    let scene = viewer.scene().unwrap();
    assert_eq!(scene.radii(), [5.0, 5.0]);
    let bodies = scene.bodies();
    let distance = (bodies[0].position - bodies[1].position).length();
    assert!(distance >= 10.0, "disks overlap at distance {distance}");

    let mut surface = CountingSurface::default();
    let stats = viewer.scene_mut().unwrap().paint(&mut surface);
    assert_eq!(stats.links, 1);
    assert_eq!(stats.nodes, 2);
    assert_eq!(surface.texts, ["Alpha", "Beta"]);
}

#[test]
fn settled_layout_is_fitted_inside_padding() {
    let mut viewer = loaded(StaticSource(ALPHA_BETA));
    settle(&mut viewer);

    let scene = viewer.scene().unwrap();
    let viewport = scene.viewport();
    let inner = viewport.rect().shrink(50.0 - 0.01);
    for (body, radius) in scene.bodies().iter().zip(scene.radii()) {
        let center = viewport.world_to_screen(body.position);
        let r = radius * viewport.zoom();
        assert!(inner.contains(center - vec2(r, r)));
        assert!(inner.contains(center + vec2(r, r)));
    }
}

#[test]
fn dangling_edge_is_dropped() {
    let viewer = loaded(StaticSource(
        r#"{"nodes": [{"id": "A", "name": "Alpha"}], "edges": [{"source": "A", "target": "Z"}]}"#,
    ));

    assert_eq!(viewer.status(), &ViewerStatus::Ready);
    assert_eq!(viewer.node_count(), 1);
    assert_eq!(viewer.link_count(), 0);
}

#[test]
fn empty_dataset_runs_no_simulation() {
    let mut viewer = loaded(StaticSource(r#"{"nodes": [], "edges": []}"#));

    assert_eq!(viewer.status(), &ViewerStatus::Empty);
    assert!(viewer.scene().is_none());
    assert_eq!(viewer.step(canvas(), 1.0 / 60.0), None);
}

#[test]
fn invalid_payload_is_an_error_state() {
    let viewer = loaded(StaticSource("[1, 2, 3]"));
    assert!(matches!(viewer.status(), ViewerStatus::Error(_)));
}

#[test]
fn file_source_feeds_the_viewer() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(ALPHA_BETA.as_bytes()).unwrap();

    let viewer = loaded(FileSource::new(file.path()));

    assert_eq!(viewer.status(), &ViewerStatus::Ready);
    assert_eq!(viewer.node_count(), 2);
}
