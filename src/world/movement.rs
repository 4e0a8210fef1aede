//! Straight-line locomotion with stall detection

use crate::cognition::collaborators::Mover;
use crate::core::config::SandboxConfig;
use crate::core::types::Vec2;

#[derive(Debug, Clone)]
pub struct Locomotion {
    position: Vec2,
    target: Option<Vec2>,
    velocity: Vec2,
    base_speed: f32,
    speed_multiplier: f32,
    arrival_radius: f32,
    stall_interval: f32,
    stall_distance: f32,
    stall_timer: f32,
    stall_anchor: Vec2,
}

impl Locomotion {
    pub fn new(position: Vec2, config: &SandboxConfig) -> Self {
        Self {
            position,
            target: None,
            velocity: Vec2::ZERO,
            base_speed: config.base_speed,
            speed_multiplier: 1.0,
            arrival_radius: config.arrival_radius,
            stall_interval: config.stall_check_interval,
            stall_distance: config.stall_distance,
            stall_timer: 0.0,
            stall_anchor: position,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn target(&self) -> Option<Vec2> {
        self.target
    }

    /// Phenotype and life stage scaling, refreshed every tick
    pub fn set_speed_multiplier(&mut self, multiplier: f32) {
        self.speed_multiplier = multiplier.max(0.0);
    }

    pub fn speed(&self) -> f32 {
        self.base_speed * self.speed_multiplier
    }

    /// Advance toward the target. Returns the new position.
    pub fn step(&mut self, dt: f32) -> Vec2 {
        let Some(target) = self.target else {
            return self.position;
        };

        let remaining = self.position.distance(&target);
        if remaining <= self.arrival_radius {
            self.arrive();
            return self.position;
        }

        let travel = (self.speed() * dt).min(remaining);
        let direction = (target - self.position).normalize();
        self.velocity = direction * self.speed();
        self.position = self.position + direction * travel;

        if self.position.distance(&target) <= self.arrival_radius {
            self.arrive();
            return self.position;
        }

        self.stall_timer += dt;
        if self.stall_timer >= self.stall_interval {
            if self.position.distance(&self.stall_anchor) < self.stall_distance {
                tracing::debug!(?target, "movement stalled, giving up");
                self.stop_moving();
            }
            self.stall_timer = 0.0;
            self.stall_anchor = self.position;
        }
        self.position
    }

    fn arrive(&mut self) {
        self.target = None;
        self.velocity = Vec2::ZERO;
    }
}

impl Mover for Locomotion {
    fn move_to(&mut self, target: Vec2) {
        self.target = Some(target);
        self.stall_timer = 0.0;
        self.stall_anchor = self.position;
    }

    fn stop_moving(&mut self) {
        self.target = None;
        self.velocity = Vec2::ZERO;
        self.stall_timer = 0.0;
    }

    fn has_arrived(&self) -> bool {
        self.target.is_none()
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }
}
