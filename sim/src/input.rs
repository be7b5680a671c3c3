use anyhow::{Context, Result};
use std::{collections::VecDeque, fs, path::Path};
use tracing::debug;

use common::{
    collision::Terrain,
    session::{Intent, IntentSet, Session},
};

// ============================================================================
// Intent Sources
// ============================================================================

// Produces the intents for the next frame. `None` means the source has run dry
// and the run should stop.
pub trait IntentSource: Send + Sync {
    fn next_intents(&mut self, session: &Session) -> Option<IntentSet>;
}

// ============================================================================
// Script
// ============================================================================

// Pre-recorded input. Each line is one frame of whitespace-separated intent
// names; a leading count repeats the line, e.g. `30 forward`. Blank lines are
// idle frames and `#` starts a comment.
#[derive(Debug, Clone, Default)]
pub struct Script {
    frames: VecDeque<IntentSet>,
}

impl Script {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).with_context(|| format!("failed to read script {}", path.display()))?;
        let script = Self::parse(&text).with_context(|| format!("invalid script {}", path.display()))?;
        debug!(frames = script.len(), "loaded script {}", path.display());
        Ok(script)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut frames = VecDeque::new();

        for (number, line) in text.lines().enumerate() {
            let line = line.split_once('#').map_or(line, |(before, _)| before).trim();

            let (repeat, rest) = match line.split_once(char::is_whitespace) {
                Some((first, rest)) if first.bytes().all(|b| b.is_ascii_digit()) => {
                    (first.parse::<usize>().with_context(|| format!("line {}", number + 1))?, rest)
                }
                _ if !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit()) => {
                    (line.parse::<usize>().with_context(|| format!("line {}", number + 1))?, "")
                }
                _ => (1, line),
            };

            let intents: IntentSet = rest.parse().with_context(|| format!("line {}", number + 1))?;
            frames.extend(std::iter::repeat_n(intents, repeat));
        }

        Ok(Self { frames })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FromIterator<IntentSet> for Script {
    fn from_iter<I: IntoIterator<Item = IntentSet>>(iter: I) -> Self {
        Self {
            frames: iter.into_iter().collect(),
        }
    }
}

impl IntentSource for Script {
    fn next_intents(&mut self, _session: &Session) -> Option<IntentSet> {
        self.frames.pop_front()
    }
}

// ============================================================================
// Autopilot
// ============================================================================

// Plays the player like an NPC: walk on while the way ahead is clear, turn
// right otherwise, and take the exit whenever standing in front of it.
// Occasionally hops so the vertical motion gets exercised too.
#[derive(Debug, Clone, Copy, Default)]
pub struct Autopilot {
    frames: u64,
}

const AUTOPILOT_JUMP_INTERVAL: u64 = 240;

impl IntentSource for Autopilot {
    fn next_intents(&mut self, session: &Session) -> Option<IntentSet> {
        self.frames += 1;

        if session.at_exit() {
            return Some(IntentSet::new().with(Intent::Exit).with(Intent::Forward));
        }

        let player = session.player();
        let quest = session.quest();
        let radius = player.collision_radius();
        let clear = quest.is_legal_position(player.next_x(), player.y(), radius)
            && quest.is_legal_position(player.x(), player.next_y(), radius);

        let mut intents = IntentSet::new().with(if clear { Intent::Forward } else { Intent::RotateRight });
        if self.frames % AUTOPILOT_JUMP_INTERVAL == 0 {
            intents.insert(Intent::Jump);
        }
        Some(intents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::config::Tunables;

    #[test]
    fn script_lines_become_frames() {
        let script = Script::parse("forward\n\n3 rotate-left jump\n# comment only\nexit # leave\n").expect("parse");
        let frames: Vec<IntentSet> = script.frames.iter().copied().collect();

        assert_eq!(frames.len(), 7);
        assert_eq!(frames[0], IntentSet::new().with(Intent::Forward));
        assert!(frames[1].is_empty());
        for frame in &frames[2..5] {
            assert!(frame.contains(Intent::RotateLeft));
            assert!(frame.contains(Intent::Jump));
        }
        assert!(frames[5].is_empty());
        assert_eq!(frames[6], IntentSet::new().with(Intent::Exit));
    }

    #[test]
    fn bare_count_repeats_idle_frames() {
        let script = Script::parse("5\n").expect("parse");
        assert_eq!(script.len(), 5);
    }

    #[test]
    fn unknown_intent_names_the_line() {
        let err = Script::parse("forward\nteleport\n").expect_err("bad intent");
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn script_runs_dry() {
        let session = Session::new(
            Tunables {
                width: 2,
                height: 2,
                num_npcs: 0,
                ..Tunables::default()
            },
            1,
        );
        let mut script: Script = [IntentSet::new()].into_iter().collect();
        assert!(script.next_intents(&session).is_some());
        assert!(script.next_intents(&session).is_none());
    }

    #[test]
    fn autopilot_never_runs_dry_and_always_acts() {
        let session = Session::new(
            Tunables {
                width: 3,
                height: 3,
                num_npcs: 0,
                ..Tunables::default()
            },
            4,
        );
        let mut autopilot = Autopilot::default();
        for _ in 0..10 {
            let intents = autopilot.next_intents(&session).expect("autopilot");
            assert!(!intents.is_empty());
        }
    }
}
