#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic player kinematics over the tile map.
//!
//! [`PlayerBody::step`] advances one fixed tick. The order of operations is
//! part of the contract: later steps read flags written by earlier ones in the
//! same tick, so reordering changes behaviour.

use burrow_core::{Aabb, Ability, AbilitySet, ControlInput, Facing, JumpKind, MovementTuning};
use burrow_system_collision::{ClearedTile, CollisionContext, TileMap};
use glam::Vec2;

/// Distance a blocked box retreats per resolution step, in world units.
const RESOLVE_STEP: f32 = 1.0;

/// Dash lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DashState {
    /// A dash may start.
    #[default]
    Ready,
    /// A dash is in progress.
    Dashing {
        /// Seconds left before the dash ends.
        remaining: f32,
    },
    /// The previous dash ended recently.
    Cooldown {
        /// Seconds left before another dash may start.
        remaining: f32,
    },
}

/// Side effects produced by a single physics tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepOutcome {
    /// Breakable barriers destroyed by the dash this tick.
    pub cleared: Vec<ClearedTile>,
    /// Jump performed this tick, if any.
    pub jumped: Option<JumpKind>,
    /// Direction of a dash that started this tick.
    pub dash_started: Option<Facing>,
    /// New morph state when the morph toggle succeeded this tick.
    pub morph_changed: Option<bool>,
    /// The body touched down after being airborne.
    pub landed: bool,
}

/// Kinematic state of the player.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerBody {
    bounds: Aabb,
    velocity: Vec2,
    grounded: bool,
    coyote_timer: f32,
    jump_buffer: f32,
    jump_was_held: bool,
    double_jump_used: bool,
    dash: DashState,
    morphed: bool,
    facing: Facing,
}

impl PlayerBody {
    /// Creates a standing, airborne body at rest with its top-left corner at
    /// `position`.
    #[must_use]
    pub fn new(position: Vec2, tuning: &MovementTuning) -> Self {
        Self {
            bounds: Aabb::new(position, tuning.standing_size),
            velocity: Vec2::ZERO,
            grounded: false,
            coyote_timer: 0.0,
            jump_buffer: 0.0,
            jump_was_held: false,
            double_jump_used: false,
            dash: DashState::Ready,
            morphed: false,
            facing: Facing::Right,
        }
    }

    /// Current box.
    #[must_use]
    pub const fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Current velocity.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Whether the body rested on the ground at the end of the last tick.
    #[must_use]
    pub const fn grounded(&self) -> bool {
        self.grounded
    }

    /// Remaining coyote window in seconds.
    #[must_use]
    pub const fn coyote_timer(&self) -> f32 {
        self.coyote_timer
    }

    /// Remaining jump buffer window in seconds.
    #[must_use]
    pub const fn jump_buffer(&self) -> f32 {
        self.jump_buffer
    }

    /// Whether the air jump was spent during the current airborne period.
    #[must_use]
    pub const fn double_jump_used(&self) -> bool {
        self.double_jump_used
    }

    /// Dash lifecycle state.
    #[must_use]
    pub const fn dash(&self) -> DashState {
        self.dash
    }

    /// Whether a dash is in progress.
    #[must_use]
    pub const fn is_dashing(&self) -> bool {
        matches!(self.dash, DashState::Dashing { .. })
    }

    /// Whether the body is morphed.
    #[must_use]
    pub const fn morphed(&self) -> bool {
        self.morphed
    }

    /// Horizontal facing.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// Returns the body to a standing rest state at `position`.
    ///
    /// Every transient timer and flag is cleared; only the facing survives.
    pub fn respawn(&mut self, position: Vec2, tuning: &MovementTuning) {
        let facing = self.facing;
        *self = Self::new(position, tuning);
        self.facing = facing;
    }

    /// Re-sizes the box to the configured standing or morphed size, keeping the
    /// bottom-center anchor.
    pub fn resize(&mut self, tuning: &MovementTuning) {
        let size = if self.morphed {
            tuning.morphed_size
        } else {
            tuning.standing_size
        };
        self.bounds = Aabb::from_bottom_center(self.bounds.bottom_center(), size);
    }

    /// Advances the body by `dt` seconds.
    pub fn step(
        &mut self,
        input: ControlInput,
        abilities: AbilitySet,
        tuning: &MovementTuning,
        dt: f32,
        map: &mut TileMap,
    ) -> StepOutcome {
        let mut outcome = StepOutcome::default();
        let held = input.horizontal();

        let jump_pressed = input.jump_held && !self.jump_was_held;
        self.jump_was_held = input.jump_held;
        self.jump_buffer = if jump_pressed {
            tuning.jump_buffer_time
        } else {
            decay(self.jump_buffer, dt)
        };
        self.coyote_timer = decay(self.coyote_timer, dt);

        if input.morph_toggle
            && abilities.contains(Ability::Morph)
            && self.grounded
            && self.velocity.y.abs() <= tuning.morph_speed_threshold
            && !self.is_dashing()
            && self.toggle_morph(tuning, map)
        {
            outcome.morph_changed = Some(self.morphed);
        }

        if !self.is_dashing() {
            if let Some(direction) = held {
                self.facing = direction;
            }
            self.accelerate(held, tuning, dt);
        }

        self.update_dash(input, held, abilities, tuning, dt, &mut outcome);

        let gravity_scale = if self.is_dashing() {
            tuning.dash_gravity_factor
        } else {
            1.0
        };
        self.velocity.y =
            (self.velocity.y + tuning.gravity * gravity_scale * dt).min(tuning.max_fall_speed);

        self.try_jump(abilities, tuning, &mut outcome);

        if !input.jump_held && self.velocity.y < 0.0 {
            self.velocity.y += tuning.gravity * tuning.jump_cut_gravity_factor * dt;
        }

        if self.is_dashing() {
            map.apply_dash_break(&self.bounds, &mut outcome.cleared);
        }

        self.move_and_resolve(tuning, dt, map, &mut outcome);

        if self.is_dashing() {
            map.apply_dash_break(&self.bounds, &mut outcome.cleared);
        }

        outcome
    }

    fn toggle_morph(&mut self, tuning: &MovementTuning, map: &TileMap) -> bool {
        let anchor = self.bounds.bottom_center();
        if self.morphed {
            let standing = Aabb::from_bottom_center(anchor, tuning.standing_size);
            let context = CollisionContext {
                morphed: false,
                dashing: false,
                vertical_velocity: self.velocity.y,
                one_way_band: None,
            };
            if map.box_overlaps_solid(&standing, context) {
                return false;
            }
            self.bounds = standing;
            self.morphed = false;
        } else {
            self.bounds = Aabb::from_bottom_center(anchor, tuning.morphed_size);
            self.morphed = true;
        }
        true
    }

    fn accelerate(&mut self, held: Option<Facing>, tuning: &MovementTuning, dt: f32) {
        match held {
            Some(direction) => {
                let acceleration = if self.grounded {
                    tuning.ground_acceleration
                } else {
                    tuning.air_acceleration
                };
                self.velocity.x += direction.sign() * acceleration * dt;
            }
            None if self.grounded => {
                let drop = tuning.ground_friction * dt;
                self.velocity.x = if self.velocity.x.abs() <= drop {
                    0.0
                } else {
                    self.velocity.x - self.velocity.x.signum() * drop
                };
            }
            None => {}
        }

        let cap = if self.grounded {
            tuning.max_ground_speed
        } else {
            tuning.max_air_speed
        };
        self.velocity.x = self.velocity.x.clamp(-cap, cap);
    }

    fn update_dash(
        &mut self,
        input: ControlInput,
        held: Option<Facing>,
        abilities: AbilitySet,
        tuning: &MovementTuning,
        dt: f32,
        outcome: &mut StepOutcome,
    ) {
        if let DashState::Cooldown { remaining } = self.dash {
            let remaining = remaining - dt;
            self.dash = if remaining <= 0.0 {
                DashState::Ready
            } else {
                DashState::Cooldown { remaining }
            };
        }

        if self.dash == DashState::Ready
            && input.dash_pressed
            && abilities.contains(Ability::Dash)
            && held.is_some()
            && !self.morphed
        {
            self.dash = DashState::Dashing {
                remaining: tuning.dash_duration,
            };
            self.velocity.y = 0.0;
            outcome.dash_started = Some(self.facing);
        }

        if let DashState::Dashing { remaining } = self.dash {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                self.dash = DashState::Cooldown {
                    remaining: tuning.dash_cooldown,
                };
                self.velocity.x = self
                    .velocity
                    .x
                    .clamp(-tuning.max_ground_speed, tuning.max_ground_speed);
            } else {
                self.dash = DashState::Dashing { remaining };
                self.velocity.x = self.facing.sign() * tuning.dash_speed;
            }
        }
    }

    fn try_jump(&mut self, abilities: AbilitySet, tuning: &MovementTuning, outcome: &mut StepOutcome) {
        if self.jump_buffer <= 0.0 {
            return;
        }

        if self.grounded || self.coyote_timer > 0.0 {
            self.velocity.y = -tuning.jump_speed;
            self.grounded = false;
            self.coyote_timer = 0.0;
            self.jump_buffer = 0.0;
            outcome.jumped = Some(JumpKind::Ground);
        } else if abilities.contains(Ability::DoubleJump) && !self.double_jump_used {
            self.velocity.y = -tuning.jump_speed * tuning.double_jump_factor;
            self.double_jump_used = true;
            self.jump_buffer = 0.0;
            outcome.jumped = Some(JumpKind::Double);
        }
    }

    fn move_and_resolve(
        &mut self,
        tuning: &MovementTuning,
        dt: f32,
        map: &TileMap,
        outcome: &mut StepOutcome,
    ) {
        let dx = self.velocity.x * dt;
        let x_context = self.collision_context(None);
        if sweep(&mut self.bounds, Vec2::new(dx, 0.0), map, x_context) {
            self.velocity.x = 0.0;
        }

        let dy = self.velocity.y * dt;
        let y_context = self.collision_context(Some(tuning.one_way_tolerance + dy.max(0.0)));
        let was_grounded = self.grounded;
        if sweep(&mut self.bounds, Vec2::new(0.0, dy), map, y_context) {
            if self.velocity.y >= 0.0 {
                self.grounded = true;
                self.coyote_timer = tuning.coyote_time;
                self.double_jump_used = false;
                outcome.landed = !was_grounded;
            }
            self.velocity.y = 0.0;
        } else {
            self.grounded = false;
        }
    }

    fn collision_context(&self, one_way_band: Option<f32>) -> CollisionContext {
        CollisionContext {
            morphed: self.morphed,
            dashing: self.is_dashing(),
            vertical_velocity: self.velocity.y,
            one_way_band,
        }
    }
}

/// Moves `bounds` by `delta` along a single axis. A blocked box backs out one
/// unit at a time until it is clear, then closes the remaining gap to the grid
/// line ahead so it rests flush against whatever stopped it. Returns whether
/// the move was blocked.
fn sweep(bounds: &mut Aabb, delta: Vec2, map: &TileMap, context: CollisionContext) -> bool {
    let moved = bounds.translated(delta);
    if !map.box_overlaps_solid(&moved, context) {
        *bounds = moved;
        return false;
    }

    let distance = delta.length();
    if distance <= f32::EPSILON {
        return true;
    }

    let forward = delta / distance;
    let limit = distance + map.tile_length();
    let mut candidate = moved;
    let mut retreated = 0.0;
    let mut last_step = 0.0;
    while map.box_overlaps_solid(&candidate, context) {
        if retreated >= limit {
            return true;
        }
        last_step = (limit - retreated).min(RESOLVE_STEP);
        candidate = candidate.translated(-forward * last_step);
        retreated += last_step;
    }

    *bounds = close_gap(candidate, forward, last_step, map, context);
    true
}

/// Pushes a clear box forward onto the next grid line when that line lies
/// within the last retreat step and the box stays clear there.
fn close_gap(
    candidate: Aabb,
    forward: Vec2,
    last_step: f32,
    map: &TileMap,
    context: CollisionContext,
) -> Aabb {
    let tile = map.tile_length();
    let min = candidate.min();
    let size = candidate.size();
    let (gap, flush_min) = if forward.x > 0.0 {
        let line = (candidate.right() / tile).ceil() * tile;
        (line - candidate.right(), Vec2::new(line - size.x, min.y))
    } else if forward.x < 0.0 {
        let line = (candidate.left() / tile).floor() * tile;
        (candidate.left() - line, Vec2::new(line, min.y))
    } else if forward.y > 0.0 {
        let line = (candidate.bottom() / tile).ceil() * tile;
        (line - candidate.bottom(), Vec2::new(min.x, line - size.y))
    } else {
        let line = (candidate.top() / tile).floor() * tile;
        (candidate.top() - line, Vec2::new(min.x, line))
    };

    if gap <= 0.0 || gap > last_step {
        return candidate;
    }
    let flush = Aabb::new(flush_min, size);
    if map.box_overlaps_solid(&flush, context) {
        candidate
    } else {
        flush
    }
}

fn decay(timer: f32, dt: f32) -> f32 {
    (timer - dt).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burrow_core::{CellCoord, TileKind};

    const DT: f32 = 1.0 / 60.0;
    const T: f32 = 32.0;

    fn map(rows: &[&str]) -> TileMap {
        let decoded: Vec<Vec<TileKind>> = rows
            .iter()
            .map(|row| {
                row.chars()
                    .map(|symbol| match symbol {
                        '#' => TileKind::Solid,
                        '=' => TileKind::OneWay,
                        'X' => TileKind::Breakable,
                        '~' => TileKind::Crawlway,
                        _ => TileKind::Empty,
                    })
                    .collect()
            })
            .collect();
        TileMap::from_rows(&decoded, T).expect("valid layout")
    }

    fn body_on(cell: CellCoord, tuning: &MovementTuning) -> PlayerBody {
        PlayerBody::new(cell.standing_position(T, tuning.standing_size), tuning)
    }

    fn idle() -> ControlInput {
        ControlInput::default()
    }

    #[test]
    fn settles_onto_floor_in_one_tick() {
        let tuning = MovementTuning::default();
        let mut map = map(&["....", "....", "####"]);
        let mut body = body_on(CellCoord::new(1, 1), &tuning);

        let outcome = body.step(idle(), AbilitySet::empty(), &tuning, DT, &mut map);

        assert!(body.grounded());
        assert!(outcome.landed);
        assert_eq!(body.bounds().bottom(), 2.0 * T);
        assert_eq!(body.velocity().y, 0.0);
        assert_eq!(body.coyote_timer(), tuning.coyote_time);
    }

    #[test]
    fn friction_stops_without_reversing() {
        let tuning = MovementTuning::default();
        let mut map = map(&["......", "......", "######"]);
        let mut body = body_on(CellCoord::new(2, 1), &tuning);
        body.grounded = true;
        body.velocity.x = 10.0;

        let _ = body.step(idle(), AbilitySet::empty(), &tuning, DT, &mut map);

        assert_eq!(body.velocity().x, 0.0);
    }

    #[test]
    fn horizontal_speed_is_capped() {
        let tuning = MovementTuning::default();
        let mut map = map(&["....................", "....................", "####################"]);
        let mut body = body_on(CellCoord::new(1, 1), &tuning);
        let run = ControlInput {
            move_right: true,
            ..idle()
        };

        for _ in 0..60 {
            let _ = body.step(run, AbilitySet::empty(), &tuning, DT, &mut map);
            assert!(body.velocity().x <= tuning.max_ground_speed);
        }
        assert_eq!(body.velocity().x, tuning.max_ground_speed);
    }

    #[test]
    fn wall_contact_zeroes_horizontal_velocity() {
        let tuning = MovementTuning::default();
        let mut map = map(&["....#", "....#", "#####"]);
        let mut body = body_on(CellCoord::new(2, 1), &tuning);
        let run = ControlInput {
            move_right: true,
            ..idle()
        };

        for _ in 0..60 {
            let _ = body.step(run, AbilitySet::empty(), &tuning, DT, &mut map);
        }

        assert_eq!(body.velocity().x, 0.0);
        assert_eq!(body.bounds().right(), 4.0 * T);
    }

    #[test]
    fn coyote_window_allows_late_jump() {
        let tuning = MovementTuning::default();
        let mut map = map(&["....", "....", "....", "...."]);
        let mut body = body_on(CellCoord::new(1, 1), &tuning);
        body.coyote_timer = 0.05;

        let jump = ControlInput {
            jump_held: true,
            ..idle()
        };
        let outcome = body.step(jump, AbilitySet::empty(), &tuning, DT, &mut map);

        assert_eq!(outcome.jumped, Some(JumpKind::Ground));
        assert!(body.velocity().y < 0.0);
        assert_eq!(body.coyote_timer(), 0.0);
    }

    #[test]
    fn releasing_jump_cuts_the_ascent() {
        let tuning = MovementTuning::default();
        let rows = ["....", "....", "....", "....", "....", "....", "####"];
        let hold = ControlInput {
            jump_held: true,
            ..idle()
        };

        let apex = |release_after: usize| {
            let mut map = map(&rows);
            let mut body = body_on(CellCoord::new(1, 5), &tuning);
            let _ = body.step(idle(), AbilitySet::empty(), &tuning, DT, &mut map);
            let mut highest = body.bounds().top();
            for tick in 0..60 {
                let input = if tick < release_after { hold } else { idle() };
                let _ = body.step(input, AbilitySet::empty(), &tuning, DT, &mut map);
                highest = highest.min(body.bounds().top());
            }
            highest
        };

        assert!(apex(2) > apex(60), "short press should peak lower");
    }

    #[test]
    fn morph_keeps_feet_planted() {
        let tuning = MovementTuning::default();
        let mut map = map(&["....", "....", "####"]);
        let mut body = body_on(CellCoord::new(1, 1), &tuning);
        let _ = body.step(idle(), AbilitySet::all(), &tuning, DT, &mut map);
        let feet = body.bounds().bottom_center();

        let toggle = ControlInput {
            morph_toggle: true,
            ..idle()
        };
        let outcome = body.step(toggle, AbilitySet::all(), &tuning, DT, &mut map);

        assert_eq!(outcome.morph_changed, Some(true));
        assert!(body.morphed());
        assert_eq!(body.bounds().size(), tuning.morphed_size);
        assert_eq!(body.bounds().bottom_center(), feet);
    }

    #[test]
    fn resize_follows_morph_state() {
        let mut tuning = MovementTuning::default();
        let mut body = body_on(CellCoord::new(1, 1), &tuning);
        let feet = body.bounds().bottom_center();

        tuning.standing_size = Vec2::new(16.0, 32.0);
        tuning.morphed_size = Vec2::new(16.0, 16.0);
        body.resize(&tuning);
        assert_eq!(body.bounds().size(), tuning.standing_size);
        assert_eq!(body.bounds().bottom_center(), feet);

        body.morphed = true;
        body.resize(&tuning);
        assert_eq!(body.bounds().size(), tuning.morphed_size);
        assert_eq!(body.bounds().bottom_center(), feet);
    }

    #[test]
    fn head_bump_rests_flush_under_ceiling() {
        let tuning = MovementTuning::default();
        let mut map = map(&["....", "####", "....", "....", "####"]);
        let mut body = PlayerBody::new(Vec2::new(1.2 * T, 2.0 * T + 0.4), &tuning);
        body.velocity.y = -600.0;

        let _ = body.step(
            ControlInput {
                jump_held: true,
                ..idle()
            },
            AbilitySet::empty(),
            &tuning,
            DT,
            &mut map,
        );

        assert_eq!(body.bounds().top(), 2.0 * T);
        assert_eq!(body.velocity().y, 0.0);
        assert!(!body.grounded());
    }

    #[test]
    fn morph_requires_the_ability() {
        let tuning = MovementTuning::default();
        let mut map = map(&["....", "....", "####"]);
        let mut body = body_on(CellCoord::new(1, 1), &tuning);
        let _ = body.step(idle(), AbilitySet::empty(), &tuning, DT, &mut map);

        let toggle = ControlInput {
            morph_toggle: true,
            ..idle()
        };
        let outcome = body.step(toggle, AbilitySet::empty(), &tuning, DT, &mut map);

        assert_eq!(outcome.morph_changed, None);
        assert!(!body.morphed());
    }

    #[test]
    fn standing_up_under_a_solid_tile_is_rejected() {
        let tuning = MovementTuning::default();
        let mut map = map(&["......", "..#...", "......", "######"]);
        let anchor = Vec2::new(2.5 * T, 3.0 * T);
        let mut body = PlayerBody::new(Vec2::ZERO, &tuning);
        body.bounds = Aabb::from_bottom_center(anchor, tuning.morphed_size);
        body.morphed = true;
        body.grounded = true;

        let toggle = ControlInput {
            morph_toggle: true,
            ..idle()
        };
        let outcome = body.step(toggle, AbilitySet::all(), &tuning, DT, &mut map);

        assert_eq!(outcome.morph_changed, None);
        assert!(body.morphed());
        assert_eq!(body.bounds().size(), tuning.morphed_size);
    }

    #[test]
    fn standing_up_inside_a_crawlway_is_rejected() {
        let tuning = MovementTuning::default();
        let mut map = map(&["......", "..~...", "......", "######"]);
        let anchor = Vec2::new(2.5 * T, 3.0 * T);
        let mut body = PlayerBody::new(Vec2::ZERO, &tuning);
        body.bounds = Aabb::from_bottom_center(anchor, tuning.morphed_size);
        body.morphed = true;
        body.grounded = true;

        let toggle = ControlInput {
            morph_toggle: true,
            ..idle()
        };
        let outcome = body.step(toggle, AbilitySet::all(), &tuning, DT, &mut map);

        assert_eq!(outcome.morph_changed, None);
        assert!(body.morphed());
        assert_eq!(body.bounds().size(), tuning.morphed_size);
        assert_eq!(body.bounds().bottom_center(), anchor);
    }

    #[test]
    fn dash_cannot_start_while_morphed() {
        let tuning = MovementTuning::default();
        let mut map = map(&["......", "......", "######"]);
        let mut body = body_on(CellCoord::new(1, 1), &tuning);
        let _ = body.step(idle(), AbilitySet::all(), &tuning, DT, &mut map);
        let _ = body.step(
            ControlInput {
                morph_toggle: true,
                ..idle()
            },
            AbilitySet::all(),
            &tuning,
            DT,
            &mut map,
        );

        let dash = ControlInput {
            move_right: true,
            dash_pressed: true,
            ..idle()
        };
        let outcome = body.step(dash, AbilitySet::all(), &tuning, DT, &mut map);

        assert_eq!(outcome.dash_started, None);
        assert!(!body.is_dashing());
    }

    #[test]
    fn dash_runs_its_course_then_cools_down() {
        let tuning = MovementTuning::default();
        let mut map = map(&[
            "..............................",
            "..............................",
            "##############################",
        ]);
        let mut body = body_on(CellCoord::new(1, 1), &tuning);
        let _ = body.step(idle(), AbilitySet::all(), &tuning, DT, &mut map);

        let dash = ControlInput {
            move_right: true,
            dash_pressed: true,
            ..idle()
        };
        let outcome = body.step(dash, AbilitySet::all(), &tuning, DT, &mut map);
        assert_eq!(outcome.dash_started, Some(Facing::Right));
        assert_eq!(body.velocity().x, tuning.dash_speed);

        let mut dashing_ticks = 1;
        while body.is_dashing() {
            let _ = body.step(dash, AbilitySet::all(), &tuning, DT, &mut map);
            dashing_ticks += 1;
            assert!(dashing_ticks < 60, "dash never ended");
        }

        assert!(matches!(body.dash(), DashState::Cooldown { .. }));
        assert!(body.velocity().x <= tuning.max_ground_speed);

        let again = body.step(dash, AbilitySet::all(), &tuning, DT, &mut map);
        assert_eq!(again.dash_started, None, "cooldown must block a new dash");
    }

    #[test]
    fn dash_without_direction_does_nothing() {
        let tuning = MovementTuning::default();
        let mut map = map(&["......", "......", "######"]);
        let mut body = body_on(CellCoord::new(1, 1), &tuning);
        let _ = body.step(idle(), AbilitySet::all(), &tuning, DT, &mut map);

        let dash = ControlInput {
            dash_pressed: true,
            ..idle()
        };
        let outcome = body.step(dash, AbilitySet::all(), &tuning, DT, &mut map);

        assert_eq!(outcome.dash_started, None);
        assert_eq!(body.dash(), DashState::Ready);
    }

    #[test]
    fn respawn_clears_transient_state() {
        let tuning = MovementTuning::default();
        let mut body = PlayerBody::new(Vec2::new(5.0, 5.0), &tuning);
        body.velocity = Vec2::new(100.0, -200.0);
        body.grounded = true;
        body.coyote_timer = 0.1;
        body.jump_buffer = 0.1;
        body.double_jump_used = true;
        body.dash = DashState::Dashing { remaining: 0.1 };
        body.morphed = true;
        body.bounds = Aabb::new(Vec2::new(5.0, 25.0), tuning.morphed_size);
        body.facing = Facing::Left;

        body.respawn(Vec2::new(40.0, 60.0), &tuning);

        assert_eq!(body.bounds(), Aabb::new(Vec2::new(40.0, 60.0), tuning.standing_size));
        assert_eq!(body.velocity(), Vec2::ZERO);
        assert!(!body.grounded());
        assert_eq!(body.coyote_timer(), 0.0);
        assert_eq!(body.jump_buffer(), 0.0);
        assert!(!body.double_jump_used());
        assert_eq!(body.dash(), DashState::Ready);
        assert!(!body.morphed());
        assert_eq!(body.facing(), Facing::Left);
    }
}
