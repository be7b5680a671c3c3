use rand::Rng;
use tracing::debug;

#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "bincode")]
use bincode::{Decode, Encode};

use crate::{
    cell::{CellId, Side, TextureId},
    character::{Character, CharacterKind, CharacterRates},
    collision::Terrain,
    config::Tunables,
    constants::*,
    maze::{self, Grid},
};

// ============================================================================
// Perspective
// ============================================================================

// Camera mode chosen by the player; the core only stores it for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
pub enum Perspective {
    #[default]
    FirstPerson,
    ThirdPerson,
}

impl Perspective {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::FirstPerson => Self::ThirdPerson,
            Self::ThirdPerson => Self::FirstPerson,
        }
    }
}

// ============================================================================
// Quest
// ============================================================================

// One maze level: the carved grid, its entry and exit columns, and the NPCs
// roaming it. The player belongs to the session, not to the quest.
#[derive(Debug, Clone)]
pub struct Quest {
    quest_no: u32,
    start_x: usize,
    finish_x: usize,
    perspective: Perspective,
    maze: Grid,
    npcs: Vec<Character>,
}

impl Quest {
    pub fn new<R: Rng + ?Sized>(quest_no: u32, tunables: &Tunables, rng: &mut R) -> Self {
        let width = tunables.width;
        let height = tunables.height;

        let mut maze = maze::generate(width, height, rng);

        // Entry is on the south edge, exit on the north edge
        let (start_x, finish_x) = if width == 0 {
            (0, 0)
        } else {
            (rng.random_range(0..width), rng.random_range(0..width))
        };

        let start = maze.index(start_x, 0);
        let finish = maze.index(finish_x, height.saturating_sub(1));

        if tunables.open_doors {
            if let Some(start) = start {
                maze.remove_wall(start, Side::South);
            }
            if let Some(finish) = finish {
                maze.remove_wall(finish, Side::North);
            }
        }
        if tunables.open_ceiling {
            maze.remove_wall_everywhere(Side::Top);
        }

        assign_textures(&mut maze, quest_no, start, finish);

        let rates = CharacterRates::from(tunables);
        let npcs = (0..tunables.num_npcs)
            .map(|_| Character::spawn_npc(CharacterKind::Goblin, width, height, rates, rng))
            .collect::<Vec<_>>();

        debug!(
            quest_no,
            start_x,
            finish_x,
            npcs = npcs.len(),
            "quest initialized"
        );

        Self {
            quest_no,
            start_x,
            finish_x,
            perspective: Perspective::default(),
            maze,
            npcs,
        }
    }

    #[must_use]
    pub const fn quest_no(&self) -> u32 {
        self.quest_no
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.maze.width()
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.maze.height()
    }

    #[must_use]
    pub const fn start_x(&self) -> usize {
        self.start_x
    }

    #[must_use]
    pub const fn finish_x(&self) -> usize {
        self.finish_x
    }

    #[must_use]
    pub const fn maze(&self) -> &Grid {
        &self.maze
    }

    #[must_use]
    pub fn npcs(&self) -> &[Character] {
        &self.npcs
    }

    #[must_use]
    pub const fn perspective(&self) -> Perspective {
        self.perspective
    }

    pub const fn set_perspective(&mut self, perspective: Perspective) -> Perspective {
        self.perspective = perspective;
        perspective
    }

    pub const fn toggle_perspective(&mut self) -> Perspective {
        self.set_perspective(self.perspective.toggled())
    }

    // Whether (x, y) lies in the doorway at the top of the finish column.
    #[must_use]
    pub fn in_finish_doorway(&self, x: f32, y: f32) -> bool {
        let finish = self.finish_x as f32;
        x > finish && x < finish + CELL_SIZE && y > self.height() as f32 - 2.0 * CELL_SIZE
    }

    // Every NPC acts once against the read-only maze, in roster order.
    pub fn step_npcs(&mut self, player: &Character) {
        let Self { maze, npcs, .. } = self;
        for npc in npcs.iter_mut() {
            npc.act(player, &*maze);
        }
    }
}

impl Terrain for Quest {
    fn is_legal_position(&self, x: f32, y: f32, radius: f32) -> bool {
        self.maze.is_legal_position(x, y, radius)
    }
}

// Walls, floor, and ceiling share the quest's texture set; the start and
// finish doorways get the door texture.
fn assign_textures(maze: &mut Grid, quest_no: u32, start: Option<CellId>, finish: Option<CellId>) {
    let base = TEXTURE_OFFSET_PER_QUEST * quest_no.saturating_sub(1);

    for index in 0..maze.len() {
        let id = CellId(index);
        for side in Side::CARDINAL {
            maze.set_texture(id, side, TextureId(base + TEXTURE_WALL));
        }
        maze.set_texture(id, Side::Bottom, TextureId(base + TEXTURE_FLOOR));
        maze.set_texture(id, Side::Top, TextureId(base + TEXTURE_CEILING));
    }

    if let Some(start) = start {
        maze.set_texture(start, Side::South, TextureId(base + TEXTURE_DOOR));
    }
    if let Some(finish) = finish {
        maze.set_texture(finish, Side::North, TextureId(base + TEXTURE_DOOR));
    }
}
