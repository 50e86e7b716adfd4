use eframe::egui::{Vec2, vec2};

use super::quadtree::QuadNode;

const MIN_DISTANCE_SQ: f32 = 1.0;
const COINCIDENT_SQ: f32 = 1e-6;

#[derive(Clone, Copy)]
pub(super) struct ChargeParams {
    /// Signed strength already scaled by alpha; negative repels.
    pub(super) strength: f32,
    pub(super) distance_max_sq: f32,
    pub(super) theta: f32,
}

#[derive(Clone, Copy)]
pub(super) struct CollisionParams {
    pub(super) strength: f32,
    pub(super) max_reach_sq: f32,
}

#[derive(Clone, Copy, Debug)]
pub(super) struct Spring {
    pub(super) source: usize,
    pub(super) target: usize,
    pub(super) strength: f32,
    pub(super) bias: f32,
}

/// Deterministic unit direction for points that sit on top of each other.
pub(super) fn jiggle(from: usize, to: usize) -> Vec2 {
    let angle = ((from as f32) * 0.618_034 + (to as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

fn charge_between(
    index: usize,
    other: usize,
    positions: &[Vec2],
    params: ChargeParams,
) -> Vec2 {
    let mut delta = positions[other] - positions[index];
    let mut distance_sq = delta.length_sq();
    if distance_sq >= params.distance_max_sq {
        return Vec2::ZERO;
    }
    if distance_sq < COINCIDENT_SQ {
        delta = -jiggle(index, other);
        distance_sq = 1.0;
    }
    if distance_sq < MIN_DISTANCE_SQ {
        distance_sq = distance_sq.sqrt();
    }
    delta * (params.strength / distance_sq)
}

pub(super) fn accumulate_charge_for_node(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    params: ChargeParams,
    impulse: &mut Vec2,
) {
    if node.mass <= 0.0 {
        return;
    }

    if node.is_leaf() {
        for &other in &node.indices {
            if other != index {
                *impulse += charge_between(index, other, positions, params);
            }
        }
        return;
    }

    let point = positions[index];
    let delta = node.center_of_mass - point;
    let distance_sq = delta.length_sq().max(COINCIDENT_SQ);
    let side = node.bounds.side_length();
    let can_approximate = !node.bounds.contains(point)
        && side * side < params.theta * params.theta * distance_sq;

    if can_approximate {
        if distance_sq < params.distance_max_sq {
            let distance_sq = if distance_sq < MIN_DISTANCE_SQ {
                distance_sq.sqrt()
            } else {
                distance_sq
            };
            *impulse += delta * (params.strength * node.mass / distance_sq);
        }
        return;
    }

    for child in node.children() {
        accumulate_charge_for_node(child, index, positions, params, impulse);
    }
}

fn collide_pair(
    from: usize,
    to: usize,
    positions: &[Vec2],
    radii: &[f32],
    strength: f32,
    impulses: &mut [Vec2],
) {
    let reach = radii[from] + radii[to];
    let mut delta = positions[from] - positions[to];
    let mut distance_sq = delta.length_sq();
    if distance_sq >= reach * reach {
        return;
    }
    if distance_sq < COINCIDENT_SQ {
        delta = jiggle(from, to);
        distance_sq = 1.0;
    }

    let distance = distance_sq.sqrt();
    let push = delta * ((reach - distance) / distance * strength);
    let from_area = radii[from] * radii[from];
    let to_area = radii[to] * radii[to];
    let share = to_area / (from_area + to_area);

    impulses[from] += push * share;
    impulses[to] -= push * (1.0 - share);
}

pub(super) fn accumulate_collision_pairs(
    node_a: &QuadNode,
    node_b: &QuadNode,
    same_node: bool,
    positions: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    impulses: &mut [Vec2],
) {
    if node_a.bounds.distance_sq_to(node_b.bounds) > params.max_reach_sq {
        return;
    }

    if node_a.is_leaf() && node_b.is_leaf() {
        if same_node {
            for (offset, &from) in node_a.indices.iter().enumerate() {
                for &to in &node_a.indices[offset + 1..] {
                    collide_pair(from, to, positions, radii, params.strength, impulses);
                }
            }
        } else {
            for &from in &node_a.indices {
                for &to in &node_b.indices {
                    collide_pair(from, to, positions, radii, params.strength, impulses);
                }
            }
        }
        return;
    }

    if same_node {
        let children = node_a.children().collect::<Vec<_>>();
        for (first, child_a) in children.iter().enumerate() {
            accumulate_collision_pairs(child_a, child_a, true, positions, radii, params, impulses);
            for child_b in &children[first + 1..] {
                accumulate_collision_pairs(
                    child_a, child_b, false, positions, radii, params, impulses,
                );
            }
        }
        return;
    }

    let split_a = if node_a.is_leaf() {
        false
    } else if node_b.is_leaf() {
        true
    } else {
        node_a.bounds.half_extent >= node_b.bounds.half_extent
    };

    if split_a {
        for child in node_a.children() {
            accumulate_collision_pairs(child, node_b, false, positions, radii, params, impulses);
        }
    } else {
        for child in node_b.children() {
            accumulate_collision_pairs(node_a, child, false, positions, radii, params, impulses);
        }
    }
}

/// Springs read predicted positions (`position + velocity`).
pub(super) fn accumulate_springs(
    springs: &[Spring],
    positions: &[Vec2],
    velocities: &[Vec2],
    rest_length: f32,
    alpha: f32,
    impulses: &mut [Vec2],
) {
    for spring in springs {
        let (source, target) = (spring.source, spring.target);
        let mut delta =
            (positions[target] + velocities[target]) - (positions[source] + velocities[source]);
        let mut distance = delta.length();
        if distance * distance < COINCIDENT_SQ {
            delta = jiggle(source, target) * 1e-3;
            distance = 1e-3;
        }

        let stretch = (distance - rest_length) / distance * alpha * spring.strength;
        let correction = delta * stretch;
        impulses[target] -= correction * spring.bias;
        impulses[source] += correction * (1.0 - spring.bias);
    }
}
