//! Closed-form motion driven by elapsed time.
//!
//! Controllers are pure functions of `t` (seconds since the animation clock
//! started) plus whatever they read from the registry. They never touch sun or
//! water state.

use glam::{Quat, Vec3};
use rayon::prelude::*;

use crate::asset::LoadedNode;
use crate::scene::transform::face_towards;
use crate::scene::{NodeId, SceneRegistry, Transform};

/// `axis(t) = base + amplitude * sin(t * speed)` on every axis with a nonzero speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatoryParams {
    pub base: Vec3,
    pub amplitude: Vec3,
    /// Angular speed per axis in radians per second.
    pub speed: Vec3,
}

impl OscillatoryParams {
    pub fn position_at(&self, t: f64) -> Vec3 {
        let axis = |base: f32, amplitude: f32, speed: f32| {
            if speed == 0.0 {
                base
            } else {
                (base as f64 + amplitude as f64 * (t * speed as f64).sin()) as f32
            }
        };
        Vec3::new(
            axis(self.base.x, self.amplitude.x, self.speed.x),
            axis(self.base.y, self.amplitude.y, self.speed.y),
            axis(self.base.z, self.amplitude.z, self.speed.z),
        )
    }
}

/// Circles `reference` in the XZ plane at a height fixed when the node loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalParams {
    pub reference: NodeId,
    pub radius: f32,
    /// Radians per second; positive speeds run clockwise seen from above.
    pub speed: f32,
}

impl OrbitalParams {
    pub fn position_at(&self, center: Vec3, height: f32, t: f64) -> Vec3 {
        let angle = -(self.speed as f64) * t;
        Vec3::new(
            (center.x as f64 + self.radius as f64 * angle.cos()) as f32,
            height,
            (center.z as f64 + self.radius as f64 * angle.sin()) as f32,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionController {
    Oscillatory(OscillatoryParams),
    Orbital(OrbitalParams),
}

#[derive(Debug, Clone, Copy)]
pub struct MotionBinding {
    pub target: NodeId,
    pub controller: MotionController,
    /// Height of `target` captured when it entered the registry.
    pub initial_height: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionUpdate {
    pub target: NodeId,
    pub transform: Transform,
}

/// Inputs gathered from the registry before the parallel evaluation.
struct Sample {
    binding: MotionBinding,
    current: Transform,
    reference: Option<Vec3>,
}

#[derive(Debug, Default)]
pub struct MotionSystem {
    bindings: Vec<MotionBinding>,
}

impl MotionSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, target: NodeId, controller: MotionController) {
        self.bindings.push(MotionBinding {
            target,
            controller,
            initial_height: None,
        });
    }

    pub fn bindings(&self) -> &[MotionBinding] {
        &self.bindings
    }

    /// Captures load-time values for every binding controlling `node`.
    pub fn on_node_loaded(&mut self, node: &LoadedNode) {
        for binding in self.bindings.iter_mut().filter(|b| b.target == node.id) {
            if binding.initial_height.is_none() {
                binding.initial_height = Some(node.transform.translation.y);
            }
        }
    }

    pub fn evaluate(&self, registry: &SceneRegistry, t: f64) -> Vec<MotionUpdate> {
        let samples: Vec<_> = self
            .bindings
            .iter()
            .filter_map(|binding| {
                let current = registry.transform(binding.target)?;
                let reference = match binding.controller {
                    MotionController::Orbital(orbit) => {
                        registry.transform(orbit.reference).map(|r| r.translation)
                    }
                    MotionController::Oscillatory(_) => None,
                };
                Some(Sample {
                    binding: *binding,
                    current,
                    reference,
                })
            })
            .collect();

        samples
            .par_iter()
            .filter_map(|sample| evaluate_one(sample, t))
            .collect()
    }

    pub fn apply(registry: &mut SceneRegistry, updates: &[MotionUpdate]) -> usize {
        updates
            .iter()
            .filter(|u| registry.set_transform(u.target, u.transform))
            .count()
    }

    /// Evaluates every binding at `t` and writes the results back.
    pub fn step(&self, registry: &mut SceneRegistry, t: f64) -> usize {
        let updates = self.evaluate(registry, t);
        Self::apply(registry, &updates)
    }
}

fn evaluate_one(sample: &Sample, t: f64) -> Option<MotionUpdate> {
    let binding = &sample.binding;
    let mut transform = sample.current;

    match binding.controller {
        MotionController::Oscillatory(params) => {
            transform.translation = params.position_at(t);
        }
        MotionController::Orbital(params) => {
            let Some(center) = sample.reference else {
                log::debug!(
                    "Orbit reference {} for {} not loaded yet",
                    params.reference,
                    binding.target
                );
                return None;
            };
            let height = binding
                .initial_height
                .unwrap_or(sample.current.translation.y);
            transform.translation = params.position_at(center, height, t);
            transform.rotation =
                face_towards(transform.translation, center, Vec3::Y).unwrap_or(Quat::IDENTITY);
        }
    }

    Some(MotionUpdate {
        target: binding.target,
        transform,
    })
}
