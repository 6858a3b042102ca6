/// Battle configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Global multiplier on every entity's gauge growth (fast-forward / slow-motion).
    pub speed_multiplier: f32,

    /// Seconds an ATTACK order stays on screen before the queue moves on.
    pub attack_delay: f32,

    /// Seconds a SKILL/MAGIC/TECH order waits after its animation reports arrival.
    pub special_delay: f32,

    /// Seconds any other order (ITEM, MOVE, FLEE) stays on screen.
    pub default_delay: f32,

    /// Seconds an AI projection is shown before it is confirmed automatically.
    pub enemy_projection_delay: f32,

    /// Upper bound of the random gauge head start enemies receive at battle start.
    pub enemy_head_start: f32,

    /// Seed for the battle's random number generator.
    pub seed: u64,
}

impl BattleConfig {
    // ===== gauge =====
    /// Gauge value at which an entity becomes ready.
    pub const MAX_GAUGE: f32 = 100.0;
    /// Value the gauge is parked at after the ready edge fires.
    pub const READY_NUDGE: f32 = 100.1;
    /// Gauge points gained per point of SPD per tick.
    pub const SPEED_DIVISOR: f32 = 25.0;
    pub const MIN_SPEED_MULTIPLIER: f32 = 0.125;
    pub const MAX_SPEED_MULTIPLIER: f32 = 8.0;

    // ===== entities =====
    pub const MAX_STATUS_EFFECTS: usize = 12;
    /// Experience needed for one level.
    pub const EXP_THRESHOLD: u32 = 100;
    /// HP percentage below which an entity is in critical condition.
    pub const LOW_HEALTH_PERCENT: i32 = 30;
    /// Percentage of max HP restored by a revive.
    pub const REVIVE_PERCENT: i32 = 33;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ATTACK_DELAY: f32 = 1.0;
    pub const DEFAULT_SPECIAL_DELAY: f32 = 0.0;
    pub const DEFAULT_ORDER_DELAY: f32 = 1.5;
    pub const DEFAULT_ENEMY_PROJECTION_DELAY: f32 = 0.5;
    pub const DEFAULT_ENEMY_HEAD_START: f32 = 50.0;

    pub fn new() -> Self {
        Self {
            speed_multiplier: 1.0,
            attack_delay: Self::DEFAULT_ATTACK_DELAY,
            special_delay: Self::DEFAULT_SPECIAL_DELAY,
            default_delay: Self::DEFAULT_ORDER_DELAY,
            enemy_projection_delay: Self::DEFAULT_ENEMY_PROJECTION_DELAY,
            enemy_head_start: Self::DEFAULT_ENEMY_HEAD_START,
            seed: 0,
        }
    }

    /// Configuration with every delay set to zero, so a single `tick` is
    /// enough to move past each animation step.
    pub fn instant() -> Self {
        Self {
            attack_delay: 0.0,
            special_delay: 0.0,
            default_delay: 0.0,
            enemy_projection_delay: 0.0,
            ..Self::new()
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_speed_multiplier(mut self, multiplier: f32) -> Self {
        self.speed_multiplier = multiplier;
        self
    }

    #[must_use]
    pub fn with_enemy_head_start(mut self, head_start: f32) -> Self {
        self.enemy_head_start = head_start;
        self
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
