//! Force-directed layout.
//!
//! The engine is driven explicitly: [`Simulation::warm_up`] runs the
//! unconditional warm-up ticks and [`Simulation::advance`] runs one tick of
//! relaxation. Nothing here reads a frame clock, so tests can step it
//! synchronously. Only the cooldown budget looks at wall-clock time.

mod forces;
mod quadtree;

use std::time::Instant;

use eframe::egui::{Vec2, vec2};
use tracing::debug;

use crate::config::SimulationConfig;
use crate::source::GraphData;
use forces::{
    ChargeParams, CollisionParams, Spring, accumulate_charge_for_node, accumulate_collision_pairs,
    accumulate_springs,
};
use quadtree::QuadNode;

const GOLDEN_ANGLE: f32 = std::f32::consts::PI * 0.763_932; // π(3 - √5)

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    WarmingUp,
    Relaxing,
    Settled,
}

#[derive(Default)]
struct Scratch {
    positions: Vec<Vec2>,
    velocities: Vec<Vec2>,
    impulses: Vec<Vec2>,
}

pub struct Simulation {
    config: SimulationConfig,
    bodies: Vec<Body>,
    collision_radii: Vec<f32>,
    springs: Vec<Spring>,
    alpha: f32,
    ticks: u32,
    relax_ticks: u32,
    relax_started: Option<Instant>,
    phase: Phase,
    scratch: Scratch,
}

pub(crate) fn initial_position(index: usize, spacing: f32) -> Vec2 {
    let radius = spacing * (0.5 + index as f32).sqrt();
    let angle = index as f32 * GOLDEN_ANGLE;
    vec2(radius * angle.cos(), radius * angle.sin())
}

impl Simulation {
    pub fn new(graph: &GraphData, config: SimulationConfig) -> Self {
        let bodies = (0..graph.node_count())
            .map(|index| Body {
                position: initial_position(index, config.initial_radius),
                velocity: Vec2::ZERO,
            })
            .collect::<Vec<_>>();

        let collision_radii = graph
            .nodes()
            .iter()
            .map(|node| config.collision_radius(node.weight))
            .collect();

        let degrees = graph.degrees();
        let springs = graph
            .endpoints()
            .iter()
            .filter(|(source, target)| source != target)
            .map(|&(source, target)| {
                let (source_degree, target_degree) =
                    (degrees[source] as f32, degrees[target] as f32);
                Spring {
                    source,
                    target,
                    strength: 1.0 / source_degree.min(target_degree),
                    bias: source_degree / (source_degree + target_degree),
                }
            })
            .collect();

        let phase = if bodies.len() < 2 {
            Phase::Settled
        } else if config.warmup_ticks == 0 {
            Phase::Relaxing
        } else {
            Phase::WarmingUp
        };

        Self {
            config,
            bodies,
            collision_radii,
            springs,
            alpha: 1.0,
            ticks: 0,
            relax_ticks: 0,
            relax_started: None,
            phase,
            scratch: Scratch::default(),
        }
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_settled(&self) -> bool {
        self.phase == Phase::Settled
    }

    /// Total ticks executed since construction.
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn warm_up(&mut self) -> Phase {
        while self.phase == Phase::WarmingUp {
            self.advance();
        }
        self.phase
    }

    pub fn advance(&mut self) -> Phase {
        if self.phase == Phase::Settled {
            return self.phase;
        }

        let max_speed = self.tick();
        self.ticks += 1;

        if self.phase == Phase::WarmingUp {
            if self.ticks >= self.config.warmup_ticks {
                self.phase = Phase::Relaxing;
            }
            return self.phase;
        }

        let started = *self.relax_started.get_or_insert_with(Instant::now);
        self.relax_ticks += 1;

        let settled_reason = if self.alpha < self.config.alpha_min {
            Some("alpha")
        } else if max_speed < self.config.settle_epsilon {
            Some("motion")
        } else if self.relax_ticks >= self.config.cooldown_ticks {
            Some("tick budget")
        } else if started.elapsed() >= self.config.cooldown_time() {
            Some("time budget")
        } else {
            None
        };

        if let Some(reason) = settled_reason {
            debug!(
                ticks = self.ticks,
                alpha = self.alpha,
                reason,
                "layout settled"
            );
            self.phase = Phase::Settled;
        }
        self.phase
    }

    /// Runs warm-up and relaxation to completion. Always terminates because
    /// relaxation is bounded by `cooldown_ticks`.
    pub fn run_to_settle(&mut self) -> Phase {
        while self.phase != Phase::Settled {
            self.advance();
        }
        self.phase
    }

    /// Restarts relaxation from the current positions.
    pub fn reheat(&mut self) {
        if self.bodies.len() < 2 {
            return;
        }
        self.alpha = 1.0;
        self.relax_ticks = 0;
        self.relax_started = None;
        self.phase = Phase::Relaxing;
    }

    /// One integration step. Returns the largest speed after damping.
    fn tick(&mut self) -> f32 {
        let config = &self.config;
        self.alpha += (0.0 - self.alpha) * config.alpha_decay;
        let alpha = self.alpha;

        let scratch = &mut self.scratch;
        scratch.positions.clear();
        scratch.velocities.clear();
        for body in &self.bodies {
            scratch.positions.push(body.position);
            scratch.velocities.push(body.velocity);
        }
        scratch.impulses.clear();
        scratch.impulses.resize(self.bodies.len(), Vec2::ZERO);

        let positions = &scratch.positions;
        let impulses = &mut scratch.impulses;

        if let Some(tree) = QuadNode::build(positions) {
            let charge = ChargeParams {
                strength: config.charge_strength * alpha,
                distance_max_sq: config.charge_distance_max * config.charge_distance_max,
                theta: config.barnes_hut_theta,
            };
            for (index, impulse) in impulses.iter_mut().enumerate() {
                accumulate_charge_for_node(&tree, index, positions, charge, impulse);
            }

            let max_radius = self
                .collision_radii
                .iter()
                .copied()
                .fold(0.0_f32, f32::max);
            let max_reach = max_radius * 2.0;
            if max_reach > 0.0 && config.collision_strength > 0.0 {
                accumulate_collision_pairs(
                    &tree,
                    &tree,
                    true,
                    positions,
                    &self.collision_radii,
                    CollisionParams {
                        strength: config.collision_strength,
                        max_reach_sq: max_reach * max_reach,
                    },
                    impulses,
                );
            }
        }

        accumulate_springs(
            &self.springs,
            positions,
            &scratch.velocities,
            config.link_distance,
            alpha,
            impulses,
        );

        let retain = 1.0 - config.velocity_decay.clamp(0.0, 1.0);
        let max_speed_sq = config.max_speed * config.max_speed;
        let mut fastest_sq = 0.0_f32;
        let mut centroid = Vec2::ZERO;
        for (body, impulse) in self.bodies.iter_mut().zip(impulses.iter()) {
            let mut velocity = body.velocity + *impulse;
            let speed_sq = velocity.length_sq();
            if speed_sq > max_speed_sq {
                velocity *= config.max_speed / speed_sq.sqrt();
            }
            velocity *= retain;

            body.velocity = velocity;
            body.position += velocity;
            fastest_sq = fastest_sq.max(velocity.length_sq());
            centroid += body.position;
        }

        if !self.bodies.is_empty() {
            centroid /= self.bodies.len() as f32;
            let shift = centroid * config.center_strength.clamp(0.0, 1.0);
            if shift.length_sq() > 0.0 {
                for body in &mut self.bodies {
                    body.position -= shift;
                }
            }
        }

        fastest_sq.sqrt()
    }
}
