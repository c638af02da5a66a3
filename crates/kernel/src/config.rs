use pixelswarm_common::Bounds;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::timing::TimingCurve;

/// World configuration: integration rate, lifecycle timing, optional walls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Simulation steps per second.
    pub frame_rate: f64,
    /// How long the creation fade takes, in milliseconds.
    pub creation_duration_ms: f64,
    /// How long the death fade takes, in milliseconds.
    pub death_duration_ms: f64,
    pub creation_curve: TimingCurve,
    pub death_curve: TimingCurve,
    /// Walls for the root scope. Child scopes copy their parent's bounds.
    pub bounds: Option<Bounds>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            frame_rate: 30.0,
            creation_duration_ms: 1000.0,
            death_duration_ms: 500.0,
            creation_curve: TimingCurve::EaseInQuad,
            death_curve: TimingCurve::EaseInQuad,
            bounds: None,
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_frame_rate(self.frame_rate)?;
        validate_duration("creation", self.creation_duration_ms)?;
        validate_duration("death", self.death_duration_ms)?;
        Ok(())
    }

    /// Health gained per tick while creating.
    pub fn creation_rate(&self) -> f64 {
        rate(self.creation_duration_ms, self.frame_rate)
    }

    /// Health lost per tick while dying.
    pub fn death_rate(&self) -> f64 {
        rate(self.death_duration_ms, self.frame_rate)
    }
}

pub(crate) fn validate_frame_rate(frame_rate: f64) -> Result<(), ConfigError> {
    if frame_rate.is_finite() && frame_rate > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidFrameRate(frame_rate))
    }
}

pub(crate) fn validate_duration(phase: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidDuration { phase, value })
    }
}

fn rate(duration_ms: f64, frame_rate: f64) -> f64 {
    1000.0 / (duration_ms * frame_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = WorldConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.frame_rate, 30.0);
        assert!(config.bounds.is_none());
    }

    #[test]
    fn rates_follow_duration_and_frame_rate() {
        let config = WorldConfig {
            frame_rate: 50.0,
            creation_duration_ms: 2000.0,
            death_duration_ms: 100.0,
            ..WorldConfig::default()
        };
        assert_eq!(config.creation_rate(), 0.01);
        assert_eq!(config.death_rate(), 0.2);
    }

    #[test]
    fn rejects_non_positive_values() {
        let bad_rate = WorldConfig {
            frame_rate: 0.0,
            ..WorldConfig::default()
        };
        assert_eq!(bad_rate.validate(), Err(ConfigError::InvalidFrameRate(0.0)));

        let bad_duration = WorldConfig {
            death_duration_ms: -5.0,
            ..WorldConfig::default()
        };
        assert!(matches!(
            bad_duration.validate(),
            Err(ConfigError::InvalidDuration { phase: "death", .. })
        ));

        let nan = WorldConfig {
            creation_duration_ms: f64::NAN,
            ..WorldConfig::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: WorldConfig =
            serde_json::from_str(r#"{ "frame_rate": 60, "death_curve": "linear" }"#).unwrap();
        assert_eq!(config.frame_rate, 60.0);
        assert_eq!(config.creation_duration_ms, 1000.0);
        assert_eq!(config.death_curve.evaluate(0.5), 0.5);
    }
}
