use anyhow::{Result, bail};

#[cfg(feature = "json")]
use anyhow::Context;
#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "json")]
use std::path::Path;

use crate::constants::*;

// ============================================================================
// Tunables
// ============================================================================

// Every tunable of the core in one place. `Default` gives the stock game.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize), serde(default))]
pub struct Tunables {
    pub width: usize,
    pub height: usize,
    pub num_npcs: usize,
    pub num_quests: u32,
    pub movement_rate: f32,
    pub jump_rate: f32,
    pub rotation_rate: f32,
    pub collision_radius: f32,
    pub character_height: f32,
    pub gravity: f32,
    pub ground_offset: f32,
    // Punch the start cell's south wall and the finish cell's north wall through the boundary
    pub open_doors: bool,
    // Remove every cell's ceiling after generation
    pub open_ceiling: bool,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            width: DEFAULT_MAZE_WIDTH,
            height: DEFAULT_MAZE_HEIGHT,
            num_npcs: DEFAULT_NUM_NPCS,
            num_quests: NUM_QUESTS,
            movement_rate: MOVEMENT_RATE,
            jump_rate: JUMP_RATE,
            rotation_rate: ROTATION_RATE,
            collision_radius: COLLISION_RADIUS,
            character_height: CHARACTER_HEIGHT,
            gravity: GRAVITY,
            ground_offset: GROUND_OFFSET,
            open_doors: false,
            open_ceiling: false,
        }
    }
}

impl Tunables {
    // Reject configurations the simulation cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!("maze dimensions must be non-zero, got {}x{}", self.width, self.height);
        }
        if self.num_quests == 0 {
            bail!("num_quests must be at least 1");
        }

        let rates = [
            ("movement_rate", self.movement_rate),
            ("jump_rate", self.jump_rate),
            ("rotation_rate", self.rotation_rate),
            ("collision_radius", self.collision_radius),
            ("character_height", self.character_height),
            ("gravity", self.gravity),
        ];
        for (name, value) in rates {
            if !value.is_finite() || value <= 0.0 {
                bail!("{name} must be a positive finite number, got {value}");
            }
        }
        if !self.ground_offset.is_finite() || self.ground_offset < 0.0 {
            bail!("ground_offset must be a non-negative finite number, got {}", self.ground_offset);
        }

        Ok(())
    }
}

// ============================================================================
// Loading
// ============================================================================

// Load tunables from a JSON file; fields missing from the file keep their defaults.
#[cfg(feature = "json")]
pub fn load_tunables(path: impl AsRef<Path>) -> Result<Tunables> {
    let path = path.as_ref();
    let data = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let tunables: Tunables =
        serde_json::from_slice(&data).with_context(|| format!("Failed to parse {}", path.display()))?;
    tunables.validate().context("Invalid tunables")?;
    Ok(tunables)
}
