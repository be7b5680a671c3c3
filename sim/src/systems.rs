use bevy_ecs::prelude::*;
use tracing::{info, trace};

use common::session::StepOutcome;

use crate::resources::{FrameInput, InputRes, RunStats, SessionRes};

// ============================================================================
// Frame Systems
// ============================================================================

// Ask the input source for this frame's intents
pub fn input_system(session: Res<SessionRes>, mut source: ResMut<InputRes>, mut input: ResMut<FrameInput>) {
    input.0 = source.next_intents(&session.0);
}

// Step the session once with the gathered intents. Does nothing once the input
// has run dry.
pub fn step_system(mut session: ResMut<SessionRes>, input: Res<FrameInput>, mut stats: ResMut<RunStats>) {
    let Some(intents) = input.0 else {
        return;
    };

    let before = session.0.player();
    let grounded = before.z() <= before.rates().ground_offset;

    let outcome = session.0.step(intents);
    stats.frames += 1;

    if grounded && session.0.player().vertical_velocity() > 0.0 {
        stats.jumps += 1;
    }

    let player = session.0.player();
    trace!(
        frame = session.0.frame(),
        x = player.x(),
        y = player.y(),
        z = player.z(),
        rotation = player.rotation(),
        "frame stepped"
    );

    if let StepOutcome::Advanced { quest_no } = outcome {
        stats.quests_completed += 1;
        info!(quest_no, frame = session.0.frame(), "player reached the exit");
    }
}
