/// Divisor applied to an ore's corruption delay to derive its blob's rate.
pub const BLOB_RATE_SCALE: u64 = 4;
/// Multiplier applied to the randomized blob animation factor.
pub const BLOB_ANIMATION_RATE_SCALE: u64 = 50;
/// Number of animation frames a quake plays before going still.
pub const QUAKE_STEPS: u32 = 10;
/// Ticks between a quake's creation and its removal.
pub const QUAKE_DURATION: u64 = 1100;
/// Ticks between quake animation frames.
pub const QUAKE_ANIMATION_RATE: u64 = 100;

/// Configuration for a simulation run.
///
/// Randomized cadences are drawn from the inclusive ranges below; fixing a
/// range to a single value makes the corresponding behavior deterministic,
/// which the tests rely on.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for deterministic simulation.
    pub seed: u64,
    /// Lower bound of randomized vein spawn rates.
    pub vein_rate_min: u64,
    /// Upper bound of randomized vein spawn rates.
    pub vein_rate_max: u64,
    /// Lower bound of randomized ore corruption delays.
    pub ore_corrupt_min: u64,
    /// Upper bound of randomized ore corruption delays.
    pub ore_corrupt_max: u64,
    /// Lower bound of the randomized blob animation factor.
    pub blob_animation_min: u64,
    /// Upper bound of the randomized blob animation factor.
    pub blob_animation_max: u64,
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            vein_rate_min: 8000,
            vein_rate_max: 17000,
            ore_corrupt_min: 20000,
            ore_corrupt_max: 30000,
            blob_animation_min: 1,
            blob_animation_max: 3,
            max_events: 0,
        }
    }
}

impl SimConfig {
    /// Set the RNG seed for deterministic simulation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the inclusive range of randomized vein spawn rates.
    pub fn with_vein_rate(mut self, min: u64, max: u64) -> Self {
        self.vein_rate_min = min;
        self.vein_rate_max = max;
        self
    }

    /// Set the inclusive range of randomized ore corruption delays.
    pub fn with_ore_corrupt(mut self, min: u64, max: u64) -> Self {
        self.ore_corrupt_min = min;
        self.ore_corrupt_max = max;
        self
    }

    /// Set the inclusive range of the randomized blob animation factor.
    pub fn with_blob_animation(mut self, min: u64, max: u64) -> Self {
        self.blob_animation_min = min;
        self.blob_animation_max = max;
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }
}
