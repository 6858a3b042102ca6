/// Phase of the battle state machine.
///
/// The phase decides which inputs are accepted and whether the speed gauges
/// advance. Only `Normal` runs the scheduler and drains the order queue.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BattlePhase {
    /// Roster and board are set up; `start` has not been called.
    #[default]
    BattlePrep,
    Normal,
    /// A ready player entity is selected and picks a command.
    Commanding,
    /// Picking an entity target.
    Selection,
    /// Picking a skill, spell, tech or item slot.
    SpecialSelection,
    /// Picking a destination tile.
    TileSelection,
    PlayerProjection,
    /// AI preview, confirmed automatically after a short delay.
    EnemyProjection,
    Animating,
    /// Waiting for the presentation to report a special's arrival.
    SpecialAnimating,
    LevelUp,
    Paused,
    Victory,
    GameOver,
    FleeReport,
}

impl BattlePhase {
    pub fn allows_scheduling(self) -> bool {
        self == Self::Normal
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Victory | Self::GameOver | Self::FleeReport)
    }

    pub fn is_projection(self) -> bool {
        matches!(self, Self::PlayerProjection | Self::EnemyProjection)
    }

    pub fn is_animating(self) -> bool {
        matches!(self, Self::Animating | Self::SpecialAnimating)
    }

    /// Phases in which a player is building a command.
    pub fn is_selecting(self) -> bool {
        matches!(
            self,
            Self::Commanding | Self::Selection | Self::SpecialSelection | Self::TileSelection
        )
    }
}

/// How a battle ended.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum BattleOutcome {
    Victory,
    Defeat,
    Fled,
}

impl BattleOutcome {
    pub fn phase(self) -> BattlePhase {
        match self {
            Self::Victory => BattlePhase::Victory,
            Self::Defeat => BattlePhase::GameOver,
            Self::Fled => BattlePhase::FleeReport,
        }
    }
}
