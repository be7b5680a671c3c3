use bevy_math::{Vec2, Vec3};
use rand::Rng;

#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "bincode")]
use bincode::{Decode, Encode};

use crate::{
    collision::Terrain,
    config::Tunables,
    constants::{CELL_SIZE, NPC_COLOR, PLAYER_COLOR, PLAYER_ROTATION},
};

// ============================================================================
// Character Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
pub enum CharacterKind {
    Barbarian,
    Dwarf,
    Elf,
    Wizard,
    Goblin,
    Orc,
}

impl CharacterKind {
    #[must_use]
    pub const fn is_player(self) -> bool {
        matches!(self, Self::Barbarian | Self::Dwarf | Self::Elf | Self::Wizard)
    }
}

// ============================================================================
// Rates
// ============================================================================

// Per-instance motion parameters, fixed for a character's lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterRates {
    pub movement: f32,
    pub jump: f32,
    pub rotation: f32,
    pub collision_radius: f32,
    pub height: f32,
    pub gravity: f32,
    pub ground_offset: f32,
}

impl From<&Tunables> for CharacterRates {
    fn from(tunables: &Tunables) -> Self {
        Self {
            movement: tunables.movement_rate,
            jump: tunables.jump_rate,
            rotation: tunables.rotation_rate,
            collision_radius: tunables.collision_radius,
            height: tunables.character_height,
            gravity: tunables.gravity,
            ground_offset: tunables.ground_offset,
        }
    }
}

impl Default for CharacterRates {
    fn default() -> Self {
        Self::from(&Tunables::default())
    }
}

// ============================================================================
// Character
// ============================================================================

// The player or an NPC. Position is in cell units with z up; rotation is in
// degrees, counter-clockwise from +X, and is never wrapped.
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    kind: CharacterKind,
    position: Vec3,
    rotation: f32,
    vertical_velocity: f32,
    rates: CharacterRates,
    color: [f32; 3],
}

impl Character {
    // Player standing in the middle of the start cell, facing north.
    #[must_use]
    pub fn player(kind: CharacterKind, start_x: usize, rates: CharacterRates) -> Self {
        Self::new(
            kind,
            start_x as f32 + CELL_SIZE / 2.0,
            CELL_SIZE / 2.0,
            PLAYER_ROTATION,
            rates,
        )
    }

    // Character of any kind standing at (x, y).
    #[must_use]
    pub fn new(kind: CharacterKind, x: f32, y: f32, rotation: f32, rates: CharacterRates) -> Self {
        Self {
            kind,
            position: Vec3::new(x, y, rates.ground_offset),
            rotation,
            vertical_velocity: 0.0,
            rates,
            color: if kind.is_player() { PLAYER_COLOR } else { NPC_COLOR },
        }
    }

    // NPC centered in a random cell of a `width × height` grid, facing a random whole degree.
    pub fn spawn_npc<R: Rng + ?Sized>(
        kind: CharacterKind,
        width: usize,
        height: usize,
        rates: CharacterRates,
        rng: &mut R,
    ) -> Self {
        let col = rng.random_range(0..width.max(1));
        let row = rng.random_range(0..height.max(1));
        let rotation = rng.random_range(0..360u16);
        Self::new(
            kind,
            col as f32 + CELL_SIZE / 2.0,
            row as f32 + CELL_SIZE / 2.0,
            f32::from(rotation),
            rates,
        )
    }

    #[must_use]
    pub const fn kind(&self) -> CharacterKind {
        self.kind
    }

    #[must_use]
    pub const fn is_player(&self) -> bool {
        self.kind.is_player()
    }

    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    #[must_use]
    pub const fn x(&self) -> f32 {
        self.position.x
    }

    #[must_use]
    pub const fn y(&self) -> f32 {
        self.position.y
    }

    #[must_use]
    pub const fn z(&self) -> f32 {
        self.position.z
    }

    #[must_use]
    pub const fn rotation(&self) -> f32 {
        self.rotation
    }

    #[must_use]
    pub const fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    #[must_use]
    pub const fn rates(&self) -> &CharacterRates {
        &self.rates
    }

    #[must_use]
    pub const fn height(&self) -> f32 {
        self.rates.height
    }

    #[must_use]
    pub const fn collision_radius(&self) -> f32 {
        self.rates.collision_radius
    }

    #[must_use]
    pub const fn color(&self) -> [f32; 3] {
        self.color
    }

    // Unit facing vector. `sin_cos` tolerates unbounded angles.
    #[must_use]
    pub fn heading(&self) -> Vec2 {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        Vec2::new(cos, sin)
    }

    // Forward look-ahead by one step
    #[must_use]
    pub fn next_x(&self) -> f32 {
        self.heading().x.mul_add(self.rates.movement, self.position.x)
    }

    #[must_use]
    pub fn next_y(&self) -> f32 {
        self.heading().y.mul_add(self.rates.movement, self.position.y)
    }

    // ========================================================================
    // Horizontal Motion
    // ========================================================================

    // Commit each axis on its own: X against the current Y, then Y against the
    // (possibly updated) current X. Blocked on one axis still slides on the other.
    fn step_axes<T: Terrain + ?Sized>(&mut self, step: Vec2, terrain: &T) {
        let radius = self.rates.collision_radius;

        let new_x = self.position.x + step.x;
        if terrain.is_legal_position(new_x, self.position.y, radius) {
            self.position.x = new_x;
        }

        let new_y = self.position.y + step.y;
        if terrain.is_legal_position(self.position.x, new_y, radius) {
            self.position.y = new_y;
        }
    }

    pub fn move_forward<T: Terrain + ?Sized>(&mut self, terrain: &T) {
        let step = self.heading() * self.rates.movement;
        self.step_axes(step, terrain);
    }

    pub fn move_backward<T: Terrain + ?Sized>(&mut self, terrain: &T) {
        let step = -self.heading() * self.rates.movement;
        self.step_axes(step, terrain);
    }

    pub fn strafe_left<T: Terrain + ?Sized>(&mut self, terrain: &T) {
        let step = self.heading().perp() * self.rates.movement;
        self.step_axes(step, terrain);
    }

    pub fn strafe_right<T: Terrain + ?Sized>(&mut self, terrain: &T) {
        let step = -self.heading().perp() * self.rates.movement;
        self.step_axes(step, terrain);
    }

    // Face `other` and take one step forward.
    pub fn move_toward<T: Terrain + ?Sized>(&mut self, other: &Self, terrain: &T) {
        let opposite = other.position.y - self.position.y;
        let adjacent = other.position.x - self.position.x;

        if opposite != 0.0 || adjacent != 0.0 {
            // atan alone cannot tell facing from facing away
            self.rotation = (opposite / adjacent).atan().to_degrees();
            if self.position.x > other.position.x {
                self.rotation += 180.0;
            }
        }

        self.move_forward(terrain);
    }

    pub fn rotate_left(&mut self) {
        self.rotation += self.rates.rotation;
    }

    pub fn rotate_right(&mut self) {
        self.rotation -= self.rates.rotation;
    }

    // ========================================================================
    // Vertical Motion
    // ========================================================================

    pub fn jump(&mut self) {
        if self.position.z <= self.rates.ground_offset {
            self.vertical_velocity += self.rates.jump;
            self.position.z += self.vertical_velocity;
        }
    }

    // Apply gravity while airborne; on the ground, snap back to rest.
    pub fn fall(&mut self) {
        if self.position.z > self.rates.ground_offset {
            self.vertical_velocity -= self.rates.gravity;
            self.position.z += self.vertical_velocity;
        } else {
            self.position.z = self.rates.ground_offset;
            self.vertical_velocity = 0.0;
        }
    }

    // Clamps z up to the ground before answering.
    #[allow(clippy::float_cmp)]
    pub fn is_on_ground(&mut self) -> bool {
        if self.position.z <= self.rates.ground_offset {
            self.position.z = self.rates.ground_offset;
        }

        self.position.z == self.rates.ground_offset
    }

    // ========================================================================
    // NPC Behavior
    // ========================================================================

    // No line-of-sight model yet
    #[must_use]
    pub const fn can_see(&self, _other: &Self) -> bool {
        false
    }

    // Wall follower: walk on while both forward axes are clear, otherwise turn right.
    pub fn act<T: Terrain + ?Sized>(&mut self, player: &Self, terrain: &T) {
        if self.is_player() {
            return;
        }

        if self.can_see(player) {
            self.move_toward(player, terrain);
            return;
        }

        let radius = self.rates.collision_radius;
        if terrain.is_legal_position(self.next_x(), self.position.y, radius)
            && terrain.is_legal_position(self.position.x, self.next_y(), radius)
        {
            self.move_forward(terrain);
        } else {
            self.rotate_right();
        }
    }
}
