//! Movement constants shared by the physics and patrol systems.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Tunable constants for player movement and walker patrols.
///
/// Every field has a default, so configuration files only need to list the
/// values they override. Speeds are in world units per second, accelerations
/// in world units per second squared and timers in seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    /// Player box while standing.
    pub standing_size: Vec2,
    /// Player box while morphed.
    pub morphed_size: Vec2,
    /// Horizontal acceleration while grounded.
    pub ground_acceleration: f32,
    /// Horizontal acceleration while airborne.
    pub air_acceleration: f32,
    /// Deceleration applied on the ground when no direction is held.
    pub ground_friction: f32,
    /// Horizontal speed cap on the ground.
    pub max_ground_speed: f32,
    /// Horizontal speed cap in the air.
    pub max_air_speed: f32,
    /// Downward acceleration.
    pub gravity: f32,
    /// Terminal falling speed.
    pub max_fall_speed: f32,
    /// Magnitude of the upward velocity set by a ground jump.
    pub jump_speed: f32,
    /// Fraction of [`Self::jump_speed`] granted by a double jump.
    pub double_jump_factor: f32,
    /// Extra gravity multiple applied while rising with jump released.
    pub jump_cut_gravity_factor: f32,
    /// Grace window after leaving the ground during which a jump still counts.
    pub coyote_time: f32,
    /// Window during which a jump press is remembered.
    pub jump_buffer_time: f32,
    /// Horizontal speed held for the duration of a dash.
    pub dash_speed: f32,
    /// Length of a dash.
    pub dash_duration: f32,
    /// Delay after a dash ends before another may start.
    pub dash_cooldown: f32,
    /// Gravity multiple applied while dashing.
    pub dash_gravity_factor: f32,
    /// Largest vertical speed at which the morph toggle is honoured.
    pub morph_speed_threshold: f32,
    /// Fixed band above a one-way platform's top surface that still lands.
    pub one_way_tolerance: f32,
    /// Walker box.
    pub walker_size: Vec2,
    /// Walker patrol speed.
    pub walker_speed: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            standing_size: Vec2::new(20.0, 40.0),
            morphed_size: Vec2::new(20.0, 20.0),
            ground_acceleration: 2400.0,
            air_acceleration: 1500.0,
            ground_friction: 2200.0,
            max_ground_speed: 260.0,
            max_air_speed: 290.0,
            gravity: 1800.0,
            max_fall_speed: 900.0,
            jump_speed: 620.0,
            double_jump_factor: 0.9,
            jump_cut_gravity_factor: 2.0,
            coyote_time: 0.10,
            jump_buffer_time: 0.12,
            dash_speed: 620.0,
            dash_duration: 0.18,
            dash_cooldown: 0.45,
            dash_gravity_factor: 0.25,
            morph_speed_threshold: 1.0,
            one_way_tolerance: 4.0,
            walker_size: Vec2::new(24.0, 20.0),
            walker_speed: 60.0,
        }
    }
}
