#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "bincode")]
use bincode::{Decode, Encode};

use crate::{
    cell::{CellId, NUM_SIDES, TextureId},
    character::{Character, CharacterKind},
    quest::{Perspective, Quest},
};

// Macro to reduce boilerplate for structs
macro_rules! view {
    ($(#[$meta:meta])* struct $name:ident $body:tt) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        #[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
        #[cfg_attr(feature = "bincode", derive(Encode, Decode))]
        pub struct $name $body
    };
}

// ============================================================================
// Render Views
// ============================================================================

view! {
// Wall geometry input for one cell. Walls and textures are indexed by `Side`.
struct CellView {
    pub x: u32,
    pub y: u32,
    pub walls: [bool; NUM_SIDES],
    pub textures: [TextureId; NUM_SIDES],
}
}

view! {
// Pose and appearance of one character.
struct CharacterView {
    pub kind: CharacterKind,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rotation: f32,
    pub height: f32,
    pub color: [f32; 3],
}
}

view! {
// Everything the renderer reads for one frame. Never fed back into the core.
struct Snapshot {
    pub quest_no: u32,
    pub perspective: Perspective,
    pub width: u32,
    pub height: u32,
    pub start_x: u32,
    pub finish_x: u32,
    pub cells: Vec<CellView>,
    pub player: CharacterView,
    pub npcs: Vec<CharacterView>,
}
}

impl From<&Character> for CharacterView {
    fn from(character: &Character) -> Self {
        Self {
            kind: character.kind(),
            x: character.x(),
            y: character.y(),
            z: character.z(),
            rotation: character.rotation(),
            height: character.height(),
            color: character.color(),
        }
    }
}

impl Snapshot {
    #[must_use]
    pub fn capture(quest: &Quest, player: &Character) -> Self {
        let maze = quest.maze();
        let cells = maze
            .cells()
            .iter()
            .enumerate()
            .map(|(index, cell)| {
                let (x, y) = maze.coords(CellId(index));
                CellView {
                    x: x as u32,
                    y: y as u32,
                    walls: cell.walls(),
                    textures: cell.textures(),
                }
            })
            .collect();

        Self {
            quest_no: quest.quest_no(),
            perspective: quest.perspective(),
            width: quest.width() as u32,
            height: quest.height() as u32,
            start_x: quest.start_x() as u32,
            finish_x: quest.finish_x() as u32,
            cells,
            player: CharacterView::from(player),
            npcs: quest.npcs().iter().map(CharacterView::from).collect(),
        }
    }
}
