use anyhow::{Result, anyhow};
use rand::{SeedableRng, rngs::StdRng};
use std::{fmt, str::FromStr};
use tracing::{debug, info};

use crate::{
    character::{Character, CharacterKind, CharacterRates},
    config::Tunables,
    constants::DEFAULT_QUEST_NO,
    quest::Quest,
    snapshot::Snapshot,
};

// ============================================================================
// Intents
// ============================================================================

// One input command, issued at most once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
    RotateLeft,
    RotateRight,
    Jump,
    TogglePerspective,
    Exit,
}

impl Intent {
    pub const ALL: [Self; 9] = [
        Self::Forward,
        Self::Backward,
        Self::StrafeLeft,
        Self::StrafeRight,
        Self::RotateLeft,
        Self::RotateRight,
        Self::Jump,
        Self::TogglePerspective,
        Self::Exit,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::StrafeLeft => "strafe-left",
            Self::StrafeRight => "strafe-right",
            Self::RotateLeft => "rotate-left",
            Self::RotateRight => "rotate-right",
            Self::Jump => "jump",
            Self::TogglePerspective => "perspective",
            Self::Exit => "exit",
        }
    }

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Intent {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|intent| intent.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow!("unknown intent '{s}'"))
    }
}

// The intents active during one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntentSet(u16);

impl IntentSet {
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    pub const fn insert(&mut self, intent: Intent) {
        self.0 |= intent.bit();
    }

    #[must_use]
    pub const fn with(mut self, intent: Intent) -> Self {
        self.insert(intent);
        self
    }

    #[must_use]
    pub const fn contains(&self, intent: Intent) -> bool {
        self.0 & intent.bit() != 0
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Intent> + '_ {
        Intent::ALL.into_iter().filter(|intent| self.contains(*intent))
    }
}

impl FromIterator<Intent> for IntentSet {
    fn from_iter<I: IntoIterator<Item = Intent>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::with)
    }
}

// Whitespace-separated intent names, e.g. "forward jump".
impl FromStr for IntentSet {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        s.split_whitespace().map(Intent::from_str).collect()
    }
}

// ============================================================================
// Session
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continued,
    // The player walked out through the exit and a fresh quest was built
    Advanced { quest_no: u32 },
}

// Owns the current quest and the player, and steps both one frame at a time.
pub struct Session {
    tunables: Tunables,
    rng: StdRng,
    quest: Quest,
    player: Character,
    frame: u64,
}

impl Session {
    #[must_use]
    pub fn new(tunables: Tunables, seed: u64) -> Self {
        Self::with_player(tunables, seed, CharacterKind::Barbarian)
    }

    #[must_use]
    pub fn with_player(tunables: Tunables, seed: u64, kind: CharacterKind) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let quest = Quest::new(DEFAULT_QUEST_NO, &tunables, &mut rng);
        let player = Character::player(kind, quest.start_x(), CharacterRates::from(&tunables));
        info!(seed, quest_no = quest.quest_no(), "session started");

        Self {
            tunables,
            rng,
            quest,
            player,
            frame: 0,
        }
    }

    #[must_use]
    pub const fn quest(&self) -> &Quest {
        &self.quest
    }

    #[must_use]
    pub const fn player(&self) -> &Character {
        &self.player
    }

    #[must_use]
    pub const fn tunables(&self) -> &Tunables {
        &self.tunables
    }

    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.quest, &self.player)
    }

    #[must_use]
    pub const fn next_quest_no(&self) -> u32 {
        let next = self.quest.quest_no() + 1;
        if next > self.tunables.num_quests { 1 } else { next }
    }

    // The player's next forward step would land in the exit doorway.
    #[must_use]
    pub fn at_exit(&self) -> bool {
        self.quest
            .in_finish_doorway(self.player.next_x(), self.player.next_y())
    }

    // Tear down the current quest and build the next one. The player keeps
    // their class and perspective and starts over at the new entrance.
    pub fn advance_quest(&mut self) -> u32 {
        let quest_no = self.next_quest_no();
        let perspective = self.quest.perspective();

        self.quest = Quest::new(quest_no, &self.tunables, &mut self.rng);
        self.quest.set_perspective(perspective);
        self.player = Character::player(
            self.player.kind(),
            self.quest.start_x(),
            CharacterRates::from(&self.tunables),
        );

        info!(quest_no, start_x = self.quest.start_x(), "advanced to next quest");
        quest_no
    }

    // Run one frame: exit check, gravity, player intents, then every NPC.
    pub fn step(&mut self, input: IntentSet) -> StepOutcome {
        self.frame += 1;
        let mut outcome = StepOutcome::Continued;

        if input.contains(Intent::Exit) && self.at_exit() {
            outcome = StepOutcome::Advanced {
                quest_no: self.advance_quest(),
            };
        }

        // Also settles a landed player's vertical velocity back to zero
        self.player.fall();

        if input.contains(Intent::TogglePerspective) {
            let perspective = self.quest.toggle_perspective();
            debug!(?perspective, "perspective changed");
        }

        self.apply_player_intents(input);
        self.quest.step_npcs(&self.player);

        outcome
    }

    fn apply_player_intents(&mut self, input: IntentSet) {
        let quest = &self.quest;
        let player = &mut self.player;

        if input.contains(Intent::Jump) && player.is_on_ground() {
            player.jump();
        }
        if input.contains(Intent::Forward) {
            player.move_forward(quest);
        }
        if input.contains(Intent::Backward) {
            player.move_backward(quest);
        }
        if input.contains(Intent::StrafeLeft) {
            player.strafe_left(quest);
        }
        if input.contains(Intent::StrafeRight) {
            player.strafe_right(quest);
        }
        if input.contains(Intent::RotateLeft) {
            player.rotate_left();
        }
        if input.contains(Intent::RotateRight) {
            player.rotate_right();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quest::Perspective;

    fn tunables() -> Tunables {
        Tunables {
            width: 5,
            height: 4,
            num_npcs: 3,
            ..Tunables::default()
        }
    }

    #[test]
    fn intents_parse_from_names() {
        let set: IntentSet = "forward  JUMP rotate-left".parse().expect("parse");
        assert!(set.contains(Intent::Forward));
        assert!(set.contains(Intent::Jump));
        assert!(set.contains(Intent::RotateLeft));
        assert!(!set.contains(Intent::Exit));
        assert_eq!(set.iter().count(), 3);
        assert!("fly".parse::<IntentSet>().is_err());
        assert!("".parse::<IntentSet>().expect("empty").is_empty());
    }

    #[test]
    fn every_intent_round_trips_through_its_name() {
        for intent in Intent::ALL {
            assert_eq!(intent.to_string().parse::<Intent>().expect("parse"), intent);
        }
    }

    #[test]
    fn same_seed_same_session() {
        let a = Session::new(tunables(), 42);
        let b = Session::new(tunables(), 42);
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn player_starts_at_the_entrance() {
        let session = Session::new(tunables(), 7);
        let player = session.player();
        assert!((player.x() - (session.quest().start_x() as f32 + 0.5)).abs() < 1e-5);
        assert!((player.y() - 0.5).abs() < 1e-5);
        assert!(player.is_player());
    }

    #[test]
    fn jump_then_gravity_brings_player_down() {
        let mut session = Session::new(tunables(), 3);
        let ground = session.tunables().ground_offset;
        session.step(IntentSet::new().with(Intent::Jump));
        assert!(session.player().z() > ground);
        for _ in 0..200 {
            session.step(IntentSet::new());
        }
        assert!((session.player().z() - ground).abs() < 1e-6);
        assert!(session.player().vertical_velocity().abs() < 1e-6);
    }

    #[test]
    fn perspective_toggle_flips_each_frame_it_is_held() {
        let mut session = Session::new(tunables(), 3);
        session.step(IntentSet::new().with(Intent::TogglePerspective));
        assert_eq!(session.quest().perspective(), Perspective::ThirdPerson);
        session.step(IntentSet::new());
        assert_eq!(session.quest().perspective(), Perspective::ThirdPerson);
    }

    #[test]
    fn exit_outside_the_doorway_does_nothing() {
        let mut session = Session::new(tunables(), 9);
        let outcome = session.step(IntentSet::new().with(Intent::Exit));
        assert_eq!(outcome, StepOutcome::Continued);
        assert_eq!(session.quest().quest_no(), 1);
    }

    #[test]
    fn exit_from_the_doorway_builds_the_next_quest() {
        let mut session = Session::with_player(tunables(), 12, CharacterKind::Elf);
        let finish_x = session.quest().finish_x() as f32;
        let top = session.quest().height() as f32;
        session.player = Character::new(
            CharacterKind::Elf,
            finish_x + 0.5,
            top - 0.5,
            90.0,
            CharacterRates::from(session.tunables()),
        );
        assert!(session.at_exit());

        let outcome = session.step(IntentSet::new().with(Intent::Exit));
        assert_eq!(outcome, StepOutcome::Advanced { quest_no: 2 });
        assert_eq!(session.quest().quest_no(), 2);
        assert_eq!(session.player().kind(), CharacterKind::Elf);
        assert!((session.player().y() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn quest_numbers_wrap() {
        let mut session = Session::with_player(tunables(), 1, CharacterKind::Wizard);
        session.quest.toggle_perspective();
        assert_eq!(session.advance_quest(), 2);
        assert_eq!(session.advance_quest(), 3);
        assert_eq!(session.advance_quest(), 1);
        assert_eq!(session.player().kind(), CharacterKind::Wizard);
        assert_eq!(session.quest().perspective(), Perspective::ThirdPerson);
        assert_eq!(session.quest().npcs().len(), 3);
    }
}
