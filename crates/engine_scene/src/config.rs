//! Scene and runner configuration.

use crate::error::SceneError;

/// Configuration for a [`Scene`](crate::Scene).
#[derive(Debug, Clone)]
pub struct SceneConfig {
    /// Human-readable scene name, used in log output.
    pub name: String,
    /// Number of entities to reserve space for up front.
    pub capacity: usize,
}

impl SceneConfig {
    /// Create a config with the given scene name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capacity: 0,
        }
    }

    /// Reserve space for `capacity` entities.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::new("Scene")
    }
}

/// Configuration for the [`SceneRunner`](crate::SceneRunner) frame loop.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Target frames per second.
    pub update_rate: f64,
    /// Fixed physics steps per second.
    pub fixed_update_rate: f64,
    /// Maximum number of frames to run (0 = unlimited).
    pub max_frames: u64,
}

impl RunnerConfig {
    /// Create a runner config with the given rates and no frame limit.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidRate`] if either rate is not a positive
    /// finite number.
    pub fn new(update_rate: f64, fixed_update_rate: f64) -> Result<Self, SceneError> {
        let config = Self {
            update_rate,
            fixed_update_rate,
            max_frames: 0,
        };
        config.validate()?;
        Ok(config)
    }

    /// Stop after `max_frames` frames (0 = unlimited).
    #[must_use]
    pub fn with_max_frames(mut self, max_frames: u64) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// Check that both rates are positive and finite.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidRate`] naming the first bad field.
    pub fn validate(&self) -> Result<(), SceneError> {
        check_rate("update_rate", self.update_rate)?;
        check_rate("fixed_update_rate", self.fixed_update_rate)
    }

    /// Seconds per frame at [`RunnerConfig::update_rate`].
    #[must_use]
    pub fn frame_interval(&self) -> f64 {
        1.0 / self.update_rate
    }

    /// Seconds per physics step at [`RunnerConfig::fixed_update_rate`].
    #[must_use]
    pub fn fixed_interval(&self) -> f64 {
        1.0 / self.fixed_update_rate
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            update_rate: 60.0,
            fixed_update_rate: 50.0,
            max_frames: 0,
        }
    }
}

fn check_rate(field: &'static str, rate: f64) -> Result<(), SceneError> {
    if rate.is_finite() && rate > 0.0 {
        Ok(())
    } else {
        Err(SceneError::InvalidRate { field, rate })
    }
}
