//! Data-driven game balance
//!
//! Every physics and course-generation knob lives here so a balance pass can be
//! shipped as JSON. Missing fields fall back to the values in [`crate::consts`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors from loading or validating a tuning file
#[derive(Debug)]
pub enum TuningError {
    /// JSON could not be parsed
    Parse(serde_json::Error),
    /// A value is out of its physical range
    Invalid { field: &'static str, reason: String },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(e) => write!(f, "tuning parse error: {}", e),
            TuningError::Invalid { field, reason } => {
                write!(f, "invalid tuning value for `{}`: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(e) => Some(e),
            TuningError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

/// Balance parameters for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub gravity: f32,

    // === Power meter ===
    pub power_speed: f32,
    pub power_acceleration: f32,
    pub power_velocity_limit: f32,
    pub max_power: f32,
    pub min_launch_power: f32,

    // === Launch ===
    pub launch_angle: f32,
    pub launch_scale: f32,

    // === Ball ===
    pub ball_radius: f32,

    // === Course ===
    pub platform_width: f32,
    pub platform_height: f32,
    pub launch_pad_width_factor: f32,
    pub initial_platforms: u32,
    pub min_gap: f32,
    pub max_gap: f32,
    pub min_height_change: f32,
    pub max_height_change: f32,
    pub platform_min_y: f32,
    pub platform_bottom_margin: f32,
    pub generation_lookahead: f32,
    pub cull_margin: f32,

    // === Landing ===
    pub landing_tolerance: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,

            power_speed: POWER_SPEED,
            power_acceleration: POWER_ACCELERATION,
            power_velocity_limit: POWER_VELOCITY_LIMIT,
            max_power: MAX_POWER,
            min_launch_power: MIN_LAUNCH_POWER,

            launch_angle: LAUNCH_ANGLE,
            launch_scale: LAUNCH_SCALE,

            ball_radius: BALL_RADIUS,

            platform_width: PLATFORM_WIDTH,
            platform_height: PLATFORM_HEIGHT,
            launch_pad_width_factor: LAUNCH_PAD_WIDTH_FACTOR,
            initial_platforms: INITIAL_PLATFORMS,
            min_gap: MIN_PLATFORM_GAP,
            max_gap: MAX_PLATFORM_GAP,
            min_height_change: MIN_HEIGHT_CHANGE,
            max_height_change: MAX_HEIGHT_CHANGE,
            platform_min_y: PLATFORM_MIN_Y,
            platform_bottom_margin: PLATFORM_BOTTOM_MARGIN,
            generation_lookahead: GENERATION_LOOKAHEAD,
            cull_margin: CULL_MARGIN,

            landing_tolerance: LANDING_TOLERANCE,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Parse a tuning document, falling back to defaults on any error
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("{}; using default tuning", e);
                Self::default()
            }
        }
    }

    /// Reject values that would break the simulation's invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: format!("must be positive, got {}", value),
                })
            }
        }

        fn non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: format!("must be non-negative, got {}", value),
                })
            }
        }

        positive("gravity", self.gravity)?;
        positive("power_speed", self.power_speed)?;
        positive("power_velocity_limit", self.power_velocity_limit)?;
        positive("max_power", self.max_power)?;
        positive("launch_scale", self.launch_scale)?;
        positive("ball_radius", self.ball_radius)?;
        positive("platform_width", self.platform_width)?;
        positive("platform_height", self.platform_height)?;
        positive("landing_tolerance", self.landing_tolerance)?;
        positive("launch_pad_width_factor", self.launch_pad_width_factor)?;
        // Negative would cull the platform the ball just landed on
        non_negative("cull_margin", self.cull_margin)?;
        non_negative("generation_lookahead", self.generation_lookahead)?;
        non_negative("power_acceleration", self.power_acceleration)?;
        if !(0.0..self.max_power).contains(&self.min_launch_power) {
            return Err(TuningError::Invalid {
                field: "min_launch_power",
                reason: format!("must lie in [0, {})", self.max_power),
            });
        }
        if self.min_gap < 0.0 || self.max_gap < self.min_gap {
            return Err(TuningError::Invalid {
                field: "max_gap",
                reason: format!("gap range {}..{} is empty", self.min_gap, self.max_gap),
            });
        }
        if self.min_height_change < 0.0 || self.max_height_change < self.min_height_change {
            return Err(TuningError::Invalid {
                field: "max_height_change",
                reason: format!(
                    "height change range {}..{} is empty",
                    self.min_height_change, self.max_height_change
                ),
            });
        }
        Ok(())
    }

    /// Width of platform 0
    pub fn launch_pad_width(&self) -> f32 {
        self.platform_width * self.launch_pad_width_factor
    }

    /// Clamp a platform's y into the playable band for a viewport height.
    ///
    /// The upper bound wins when the viewport is too short for the band.
    pub fn clamp_platform_y(&self, y: f32, viewport_height: f32) -> f32 {
        y.min(viewport_height - self.platform_bottom_margin)
            .max(self.platform_min_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 0.5 }"#).unwrap();
        assert_eq!(tuning.gravity, 0.5);
        assert_eq!(tuning.platform_width, PLATFORM_WIDTH);
        assert_eq!(tuning.initial_platforms, INITIAL_PLATFORMS);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Tuning::from_json(r#"{ "gravity": -1.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "gravity", .. }));

        let err = Tuning::from_json(r#"{ "min_gap": 200.0, "max_gap": 100.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "max_gap", .. }));
    }

    #[test]
    fn test_course_margins_rejected() {
        let err = Tuning::from_json(r#"{ "cull_margin": -5000.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "cull_margin", .. }));

        let err = Tuning::from_json(r#"{ "generation_lookahead": -1.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "generation_lookahead",
                ..
            }
        ));

        let err = Tuning::from_json(r#"{ "launch_pad_width_factor": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "launch_pad_width_factor",
                ..
            }
        ));

        // Zero margins are fine: the landed-on platform is never left of -0
        let zero = r#"{ "cull_margin": 0.0, "generation_lookahead": 0.0 }"#;
        assert!(Tuning::from_json(zero).is_ok());
    }

    #[test]
    fn test_bad_json_falls_back() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
        assert_eq!(Tuning::from_json_or_default("{ not json"), Tuning::default());
    }

    #[test]
    fn test_clamp_platform_y() {
        let tuning = Tuning::default();
        assert_eq!(tuning.clamp_platform_y(300.0, 600.0), 300.0);
        assert_eq!(tuning.clamp_platform_y(100.0, 600.0), 150.0);
        assert_eq!(tuning.clamp_platform_y(550.0, 600.0), 500.0);
        // Short viewport: the top of the band wins
        assert_eq!(tuning.clamp_platform_y(120.0, 200.0), 150.0);
    }
}
