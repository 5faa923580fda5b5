//! Game event log, consumed by the presentation and audio layers

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::{CellCoord, PlatoonId, UnitId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameEvent {
    pub turn: u64,
    pub kind: GameEventKind,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEventKind {
    UnitSelected { unit: UnitId },
    UnitDeselected { unit: UnitId },
    UnitActivated { unit: UnitId },
    UnitMoved { unit: UnitId, from: CellCoord, to: CellCoord },
    ShotFired { attacker: UnitId, target: UnitId, hit: bool },
    MeleeFought { attacker: UnitId, target: UnitId, hit: bool },
    UnitKilled { unit: UnitId },
    UnitExhausted { unit: UnitId },
    TurnEnded { next_platoon: Option<PlatoonId> },
    RoundStarted { round: u64 },
}

/// Sound clip the audio layer should play for an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    Bang,
    Boom,
    Kablooie,
    Ratatatata,
    Blaggard,
    FightMe,
    FiteMe,
    ForTheEmperor,
    HaveAtYe,
}

const SHOOT_CUES: [SoundCue; 4] = [
    SoundCue::Bang,
    SoundCue::Boom,
    SoundCue::Kablooie,
    SoundCue::Ratatatata,
];

const FIGHT_CUES: [SoundCue; 5] = [
    SoundCue::Blaggard,
    SoundCue::FightMe,
    SoundCue::FiteMe,
    SoundCue::ForTheEmperor,
    SoundCue::HaveAtYe,
];

impl SoundCue {
    /// Pick a clip for combat events; other events are silent
    pub fn for_event<R: Rng>(kind: &GameEventKind, rng: &mut R) -> Option<Self> {
        match kind {
            GameEventKind::ShotFired { .. } => SHOOT_CUES.choose(rng).copied(),
            GameEventKind::MeleeFought { .. } => FIGHT_CUES.choose(rng).copied(),
            _ => None,
        }
    }

    pub fn clip_name(&self) -> &'static str {
        match self {
            SoundCue::Bang => "bang.mp3",
            SoundCue::Boom => "boom.mp3",
            SoundCue::Kablooie => "kablooie.mp3",
            SoundCue::Ratatatata => "ratatatata.mp3",
            SoundCue::Blaggard => "blaggard.mp3",
            SoundCue::FightMe => "fight_me.mp3",
            SoundCue::FiteMe => "fite_me.mp3",
            SoundCue::ForTheEmperor => "for_the_emperor.mp3",
            SoundCue::HaveAtYe => "have_at_ye.mp3",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_combat_events_get_matching_cues() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let shot = GameEventKind::ShotFired {
            attacker: UnitId::new(),
            target: UnitId::new(),
            hit: true,
        };
        let fight = GameEventKind::MeleeFought {
            attacker: UnitId::new(),
            target: UnitId::new(),
            hit: false,
        };
        for _ in 0..10 {
            assert!(SHOOT_CUES.contains(&SoundCue::for_event(&shot, &mut rng).unwrap()));
            assert!(FIGHT_CUES.contains(&SoundCue::for_event(&fight, &mut rng).unwrap()));
        }
    }

    #[test]
    fn test_non_combat_events_are_silent() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let kind = GameEventKind::RoundStarted { round: 2 };
        assert_eq!(SoundCue::for_event(&kind, &mut rng), None);
        assert_eq!(SoundCue::HaveAtYe.clip_name(), "have_at_ye.mp3");
    }
}
