//! Missions
//!
//! Scripted objectives that react to gameplay notifications. Each mission
//! is a variant of [`Mission`]; notifications return an optional
//! [`MissionEvent`] for the host to act on (play a voice line, show the
//! end screen).

use serde::{Deserialize, Serialize};
use tracing::info;

use super::level::PrefabKind;

/// Voice lines a mission can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoiceCue {
    /// Hint that tanks are armored and need another approach
    ArmorHint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionEvent {
    PlayVoice(VoiceCue),
    Completed,
}

/// First mission: destroy the tanks, with an armor hint after repeated
/// ineffective hits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArmorTutorial {
    hits_until_hint: u32,
    enemies_remaining: u32,
    completed: bool,
}

impl ArmorTutorial {
    pub const HITS_BEFORE_HINT: u32 = 2;

    pub fn new() -> Self {
        Self {
            hits_until_hint: Self::HITS_BEFORE_HINT,
            enemies_remaining: 0,
            completed: false,
        }
    }

    fn on_enemy_hit(&mut self, kind: PrefabKind) -> Option<MissionEvent> {
        if kind != PrefabKind::Tank || self.hits_until_hint == 0 {
            return None;
        }
        self.hits_until_hint -= 1;
        (self.hits_until_hint == 0).then_some(MissionEvent::PlayVoice(VoiceCue::ArmorHint))
    }

    fn on_object_destroyed(&mut self, kind: PrefabKind) -> Option<MissionEvent> {
        if kind != PrefabKind::Tank || self.completed || self.enemies_remaining == 0 {
            return None;
        }
        self.enemies_remaining -= 1;
        if self.enemies_remaining == 0 {
            self.completed = true;
            info!("armor tutorial completed");
            return Some(MissionEvent::Completed);
        }
        None
    }
}

impl Default for ArmorTutorial {
    fn default() -> Self {
        Self::new()
    }
}

/// Active mission strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mission {
    ArmorTutorial(ArmorTutorial),
}

impl Default for Mission {
    fn default() -> Self {
        Mission::ArmorTutorial(ArmorTutorial::new())
    }
}

impl Mission {
    /// Number of enemies spawned for this mission.
    pub fn set_enemy_count(&mut self, count: u32) {
        match self {
            Mission::ArmorTutorial(m) => m.enemies_remaining = count,
        }
    }

    pub fn enemies_remaining(&self) -> u32 {
        match self {
            Mission::ArmorTutorial(m) => m.enemies_remaining,
        }
    }

    pub fn is_completed(&self) -> bool {
        match self {
            Mission::ArmorTutorial(m) => m.completed,
        }
    }

    /// The player struck an enemy.
    pub fn on_enemy_hit(&mut self, kind: PrefabKind) -> Option<MissionEvent> {
        match self {
            Mission::ArmorTutorial(m) => m.on_enemy_hit(kind),
        }
    }

    pub fn on_object_destroyed(&mut self, kind: PrefabKind) -> Option<MissionEvent> {
        match self {
            Mission::ArmorTutorial(m) => m.on_object_destroyed(kind),
        }
    }

    /// Per-frame update.
    pub fn on_tick(&mut self, _time: f32) -> Option<MissionEvent> {
        match self {
            Mission::ArmorTutorial(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_armor_hint_on_second_tank_hit_only() {
        let mut mission = Mission::default();
        assert_eq!(mission.on_enemy_hit(PrefabKind::Tank), None);
        assert_eq!(
            mission.on_enemy_hit(PrefabKind::Tank),
            Some(MissionEvent::PlayVoice(VoiceCue::ArmorHint))
        );
        assert_eq!(mission.on_enemy_hit(PrefabKind::Tank), None);
    }

    #[test]
    fn test_non_tank_hits_do_not_count() {
        let mut mission = Mission::default();
        assert_eq!(mission.on_enemy_hit(PrefabKind::Factory), None);
        assert_eq!(mission.on_enemy_hit(PrefabKind::Tank), None);
        assert!(mission.on_enemy_hit(PrefabKind::Tank).is_some());
    }

    #[test]
    fn test_completes_when_all_tanks_destroyed() {
        let mut mission = Mission::default();
        mission.set_enemy_count(2);
        assert_eq!(mission.on_object_destroyed(PrefabKind::Tank), None);
        assert_eq!(mission.enemies_remaining(), 1);
        assert_eq!(mission.on_object_destroyed(PrefabKind::Tank), Some(MissionEvent::Completed));
        assert!(mission.is_completed());
        assert_eq!(mission.on_object_destroyed(PrefabKind::Tank), None);
    }

    #[test]
    fn test_tick_is_quiet() {
        let mut mission = Mission::default();
        assert_eq!(mission.on_tick(1.0), None);
    }
}
