//! Construction and rollout configuration.

use serde::{Deserialize, Serialize};

/// Configuration for building state-machine instances.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineConfig {
    /// Number of independent circuit instances to build (one per worker).
    pub instance_count: usize,

    /// Build instances concurrently on the rayon pool.
    pub parallel_build: bool,

    /// Master seed for rollout RNG streams.
    pub seed: u64,

    /// Rollout limits.
    pub playout: PlayoutConfig,
}

impl Default for MachineConfig {
    fn default() -> Self {
        let workers = std::thread::available_parallelism()
            .map(std::num::NonZeroUsize::get)
            .unwrap_or(1);
        Self {
            instance_count: workers,
            parallel_build: true,
            seed: 42,
            playout: PlayoutConfig::default(),
        }
    }
}

impl MachineConfig {
    /// Set the number of instances.
    pub fn with_instances(mut self, count: usize) -> Self {
        self.instance_count = count;
        self
    }

    /// Enable or disable parallel construction.
    pub fn with_parallel_build(mut self, parallel: bool) -> Self {
        self.parallel_build = parallel;
        self
    }

    /// Set the master seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set rollout limits.
    pub fn with_playout(mut self, playout: PlayoutConfig) -> Self {
        self.playout = playout;
        self
    }
}

/// Limits for a single random rollout (depth charge).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoutConfig {
    /// Maximum joint moves per rollout (0 = play to terminal).
    pub max_depth: u32,

    /// Stop issuing steps once the deadline is closer than this (milliseconds).
    pub time_buffer_ms: u64,
}

impl Default for PlayoutConfig {
    fn default() -> Self {
        Self {
            max_depth: 0,
            time_buffer_ms: 1000,
        }
    }
}

impl PlayoutConfig {
    /// Set the maximum rollout depth.
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the deadline buffer.
    pub fn with_time_buffer_ms(mut self, buffer: u64) -> Self {
        self.time_buffer_ms = buffer;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MachineConfig::default();
        assert!(config.instance_count >= 1);
        assert!(config.parallel_build);
        assert_eq!(config.playout.max_depth, 0);
        assert_eq!(config.playout.time_buffer_ms, 1000);
    }

    #[test]
    fn test_builder_pattern() {
        let config = MachineConfig::default()
            .with_instances(4)
            .with_parallel_build(false)
            .with_seed(7)
            .with_playout(PlayoutConfig::default().with_max_depth(30));

        assert_eq!(config.instance_count, 4);
        assert!(!config.parallel_build);
        assert_eq!(config.seed, 7);
        assert_eq!(config.playout.max_depth, 30);
    }

    #[test]
    fn test_serialization() {
        let config = MachineConfig::default().with_instances(3);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: MachineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
