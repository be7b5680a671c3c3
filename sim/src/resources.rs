use bevy_ecs::prelude::*;

use common::session::{IntentSet, Session};

use crate::input::IntentSource;

// ============================================================================
// Bevy Resources
// ============================================================================

// The running session, stepped once per schedule run
#[derive(Resource)]
pub struct SessionRes(pub Session);

// Resource wrapper for whatever produces the player's input
#[derive(Resource)]
pub struct InputRes(Box<dyn IntentSource>);

impl InputRes {
    #[must_use]
    pub fn new(source: impl IntentSource + 'static) -> Self {
        Self(Box::new(source))
    }

    pub fn next_intents(&mut self, session: &Session) -> Option<IntentSet> {
        self.0.next_intents(session)
    }
}

// Intents gathered for the current frame. `None` once the input has run dry.
#[derive(Resource, Default)]
pub struct FrameInput(pub Option<IntentSet>);

// Running totals for the end-of-run summary
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub frames: u64,
    pub quests_completed: u32,
    pub jumps: u64,
}
