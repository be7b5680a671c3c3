pub mod config;
pub mod input;
pub mod resources;
pub mod systems;

pub use config::{Args, SnapshotFormat, init_tracing};
pub use input::{Autopilot, IntentSource, Script};

use anyhow::{Context, Result};
use bevy_ecs::prelude::*;
use std::{fs, path::Path};
use tracing::{debug, info};

use common::{session::Session, snapshot::Snapshot};

use crate::{
    resources::{FrameInput, InputRes, RunStats, SessionRes},
    systems::{input_system, step_system},
};

const PROGRESS_LOG_INTERVAL: u64 = 600;

// ============================================================================
// Simulation
// ============================================================================

// A session plus its input source, stepped by an input-then-step schedule.
pub struct Simulation {
    world: World,
    schedule: Schedule,
}

impl Simulation {
    #[must_use]
    pub fn new(session: Session, source: impl IntentSource + 'static) -> Self {
        let mut world = World::new();
        world.insert_resource(SessionRes(session));
        world.insert_resource(InputRes::new(source));
        world.insert_resource(FrameInput::default());
        world.insert_resource(RunStats::default());

        let mut schedule = Schedule::default();
        // Input must be gathered before the frame it drives
        schedule.add_systems((input_system, step_system).chain());

        Self { world, schedule }
    }

    // Run one frame. Returns false once the input source has run dry.
    pub fn update(&mut self) -> bool {
        self.schedule.run(&mut self.world);
        self.world.resource::<FrameInput>().0.is_some()
    }

    // Run up to `frames` frames, stopping early if the input runs dry.
    pub fn run_frames(&mut self, frames: u64) -> RunStats {
        for _ in 0..frames {
            if !self.update() {
                debug!("input exhausted");
                break;
            }

            let stats = self.stats();
            if stats.frames % PROGRESS_LOG_INTERVAL == 0 {
                let session = self.session();
                info!(
                    frame = stats.frames,
                    quest_no = session.quest().quest_no(),
                    x = session.player().x(),
                    y = session.player().y(),
                    "progress"
                );
            }
        }
        self.stats()
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.world.resource::<SessionRes>().0
    }

    #[must_use]
    pub fn stats(&self) -> RunStats {
        *self.world.resource::<RunStats>()
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.session().snapshot()
    }
}

// ============================================================================
// Snapshot Output
// ============================================================================

pub fn encode_snapshot(snapshot: &Snapshot, format: SnapshotFormat) -> Result<Vec<u8>> {
    match format {
        #[cfg(feature = "json")]
        SnapshotFormat::Json => common::io::to_json(snapshot),
        #[cfg(feature = "bincode")]
        SnapshotFormat::Bincode => common::io::to_bincode(snapshot),
        #[allow(unreachable_patterns)]
        other => anyhow::bail!("{other:?} snapshots need the matching cargo feature"),
    }
}

pub fn write_snapshot(path: &Path, snapshot: &Snapshot, format: SnapshotFormat) -> Result<()> {
    let bytes = encode_snapshot(snapshot, format)?;
    fs::write(path, &bytes).with_context(|| format!("failed to write snapshot {}", path.display()))?;
    info!(bytes = bytes.len(), "wrote snapshot to {}", path.display());
    Ok(())
}

// ============================================================================
// Main Loop
// ============================================================================

pub fn run(args: &Args) -> Result<()> {
    let tunables = args.tunables()?;
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(
        seed,
        width = tunables.width,
        height = tunables.height,
        npcs = tunables.num_npcs,
        "starting simulation"
    );

    let session = Session::new(tunables, seed);
    let mut simulation = match &args.script {
        Some(path) => Simulation::new(session, Script::load(path)?),
        None => Simulation::new(session, Autopilot::default()),
    };

    let stats = simulation.run_frames(args.frames);
    let session = simulation.session();
    info!(
        frames = stats.frames,
        quests_completed = stats.quests_completed,
        jumps = stats.jumps,
        quest_no = session.quest().quest_no(),
        "simulation finished"
    );

    if let Some(path) = &args.snapshot {
        write_snapshot(path, &simulation.snapshot(), args.format)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{
        config::Tunables,
        quest::Perspective,
        session::{Intent, IntentSet},
    };

    fn tunables() -> Tunables {
        Tunables {
            width: 4,
            height: 4,
            num_npcs: 3,
            ..Tunables::default()
        }
    }

    #[test]
    fn script_drives_the_player() {
        let script = Script::parse("25 forward\n").expect("parse");
        let mut simulation = Simulation::new(Session::new(tunables(), 8), script);
        let start_y = simulation.session().player().y();

        let stats = simulation.run_frames(100);
        assert_eq!(stats.frames, 25);
        assert!(simulation.session().player().y() >= start_y);
        assert_eq!(simulation.session().frame(), 25);
    }

    #[test]
    fn run_stops_at_the_frame_limit() {
        let mut simulation = Simulation::new(Session::new(tunables(), 8), Autopilot::default());
        let stats = simulation.run_frames(50);
        assert_eq!(stats.frames, 50);
        assert_eq!(simulation.session().frame(), 50);
    }

    #[test]
    fn jumps_are_counted_once_per_takeoff() {
        let script: Script = [
            IntentSet::new().with(Intent::Jump),
            IntentSet::new().with(Intent::Jump),
            IntentSet::new(),
        ]
        .into_iter()
        .collect();
        let mut simulation = Simulation::new(Session::new(tunables(), 2), script);
        assert_eq!(simulation.run_frames(10).jumps, 1);
    }

    #[test]
    fn same_seed_same_run() {
        let mut a = Simulation::new(Session::new(tunables(), 77), Autopilot::default());
        let mut b = Simulation::new(Session::new(tunables(), 77), Autopilot::default());
        a.run_frames(300);
        b.run_frames(300);
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn perspective_toggle_reaches_the_snapshot() {
        let script = Script::parse("perspective\n").expect("parse");
        let mut simulation = Simulation::new(Session::new(tunables(), 3), script);
        simulation.run_frames(5);
        assert_eq!(simulation.snapshot().perspective, Perspective::ThirdPerson);
    }

    #[cfg(feature = "bincode")]
    #[test]
    fn bincode_snapshot_encodes() {
        let simulation = Simulation::new(Session::new(tunables(), 3), Autopilot::default());
        let bytes = encode_snapshot(&simulation.snapshot(), SnapshotFormat::Bincode).expect("encode");
        assert!(!bytes.is_empty());
    }
}
