//! Tunables for the layout engine and the viewer.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes:
//!
//! ```json
//! { "simulation": { "link_distance": 200.0 }, "view": { "max_zoom": 12.0 } }
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub charge_strength: f32,
    pub charge_distance_max: f32,
    pub barnes_hut_theta: f32,
    pub link_distance: f32,
    pub collision_padding: f32,
    pub collision_strength: f32,
    pub center_strength: f32,
    pub min_radius: f32,
    pub initial_radius: f32,
    pub alpha_decay: f32,
    pub alpha_min: f32,
    pub velocity_decay: f32,
    pub max_speed: f32,
    pub settle_epsilon: f32,
    pub warmup_ticks: u32,
    pub cooldown_ticks: u32,
    pub cooldown_time_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            charge_strength: -600.0,
            charge_distance_max: 500.0,
            barnes_hut_theta: 0.9,
            link_distance: 150.0,
            collision_padding: 30.0,
            collision_strength: 0.9,
            center_strength: 0.1,
            min_radius: 3.0,
            initial_radius: 10.0,
            alpha_decay: 0.01,
            alpha_min: 0.001,
            velocity_decay: 0.15,
            max_speed: 60.0,
            settle_epsilon: 0.01,
            warmup_ticks: 100,
            cooldown_ticks: 200,
            cooldown_time_ms: 5_000,
        }
    }
}

impl SimulationConfig {
    pub fn cooldown_time(&self) -> Duration {
        Duration::from_millis(self.cooldown_time_ms)
    }

    /// Rendered disk radius for a node of the given weight.
    pub fn node_radius(&self, weight: f32) -> f32 {
        weight.max(self.min_radius)
    }

    pub fn collision_radius(&self, weight: f32) -> f32 {
        self.node_radius(weight) + self.collision_padding
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewConfig {
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub zoom_step: f32,
    pub focus_zoom: f32,
    pub fit_padding: f32,
    pub label_zoom_threshold: f32,
    pub show_particles: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.3,
            max_zoom: 8.0,
            zoom_step: 1.5,
            focus_zoom: 2.0,
            fit_padding: 50.0,
            label_zoom_threshold: 0.5,
            show_particles: true,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    pub simulation: SimulationConfig,
    pub view: ViewConfig,
}

impl ViewerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid viewer config in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: ViewerConfig =
            serde_json::from_str(r#"{"simulation":{"link_distance":200.0}}"#).unwrap();

        assert_eq!(config.simulation.link_distance, 200.0);
        assert_eq!(config.simulation.warmup_ticks, 100);
        assert_eq!(config.view, ViewConfig::default());
    }

    #[test]
    fn radius_respects_minimum() {
        let config = SimulationConfig::default();
        assert_eq!(config.node_radius(0.5), 3.0);
        assert_eq!(config.node_radius(12.0), 12.0);
        assert_eq!(config.collision_radius(5.0), 35.0);
    }
}
