// ============================================================================
// Grid & Quests
// ============================================================================

pub const CELL_SIZE: f32 = 1.0; // Position units per cell
pub const DEFAULT_MAZE_WIDTH: usize = 26; // Number of cell columns (X axis)
pub const DEFAULT_MAZE_HEIGHT: usize = 19; // Number of cell rows (Y axis, row 0 is south)
pub const DEFAULT_QUEST_NO: u32 = 1;
pub const NUM_QUESTS: u32 = 3; // Quest numbers wrap back to 1 after this
pub const DEFAULT_NUM_NPCS: usize = 30;

// ============================================================================
// Textures
// ============================================================================

// Each quest uses four consecutive texture slots: walls, floor, ceiling, door
pub const TEXTURE_OFFSET_PER_QUEST: u32 = 4;
pub const TEXTURE_WALL: u32 = 0;
pub const TEXTURE_FLOOR: u32 = 1;
pub const TEXTURE_CEILING: u32 = 2;
pub const TEXTURE_DOOR: u32 = 3;

// ============================================================================
// Characters
// ============================================================================

pub const MOVEMENT_RATE: f32 = 0.04; // cells per frame
pub const JUMP_RATE: f32 = 0.05; // vertical impulse per jump
pub const ROTATION_RATE: f32 = 2.0; // degrees per frame
pub const COLLISION_RADIUS: f32 = 0.25; // cells
pub const CHARACTER_HEIGHT: f32 = CELL_SIZE / 1.5;
pub const PLAYER_ROTATION: f32 = 90.0; // Players start facing north
pub const PLAYER_COLOR: [f32; 3] = [0.5, 0.0, 0.0];
pub const NPC_COLOR: [f32; 3] = [0.0, 0.0, 0.5];

// ============================================================================
// Vertical Motion
// ============================================================================

pub const GRAVITY: f32 = 0.004; // subtracted from vertical velocity per frame
pub const GROUND_OFFSET: f32 = 0.001; // z of a character standing on the floor
