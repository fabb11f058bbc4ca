//! # Stepped Gesture Mapping
//!
//! Converts a continuous one-dimensional drag offset into discrete value steps.
//! A configured list of stop points (distance threshold → magnitude) decides
//! how much a value moves once the finger travels far enough from where the
//! gesture began.
//!
//! Each stop point fires at most once per gesture: a long drag yields exactly
//! one value change and one feedback pulse per distinct threshold, while still
//! escalating through larger thresholds as the finger keeps moving. The only
//! mutable state is the per-gesture [`GestureSession`], owned by the caller so
//! that two sliders on screen never share it.
//!
//! ```rust
//! use pocket_tally::stepped_gesture::{GestureSession, StepConfig, SteppedGestureMapper};
//!
//! let mapper = SteppedGestureMapper::new(StepConfig::default())?;
//! let mut session = GestureSession::new();
//!
//! let step = mapper.on_drag_update(&mut session, 45.0, 0).unwrap();
//! assert_eq!(step.new_value, 1);
//! assert!(mapper.on_drag_update(&mut session, 60.0, 1).is_none());
//!
//! mapper.on_drag_end(&mut session);
//! assert!(session.last_triggered_index().is_none());
//! # Ok::<(), pocket_tally::errors::AppError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};

use crate::errors::{error_logging, AppError, AppResult};

/// A drag distance that, once reached, moves the value by `magnitude`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StopPoint {
    /// Absolute distance from the gesture origin, in points
    pub threshold: f64,
    /// Unsigned step size; the drag direction supplies the sign
    pub magnitude: u32,
}

impl StopPoint {
    pub fn new(threshold: f64, magnitude: u32) -> Self {
        Self {
            threshold,
            magnitude,
        }
    }
}

/// Stop points plus optional bounds on the accumulated value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepConfig {
    /// Stop points sorted by strictly increasing threshold
    pub stops: Vec<StopPoint>,
    pub clamp_min: Option<i64>,
    pub clamp_max: Option<i64>,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            stops: vec![
                StopPoint::new(40.0, 1),
                StopPoint::new(100.0, 5),
                StopPoint::new(180.0, 10),
            ],
            clamp_min: None,
            clamp_max: None,
        }
    }
}

impl StepConfig {
    pub fn new(stops: Vec<StopPoint>) -> Self {
        Self {
            stops,
            clamp_min: None,
            clamp_max: None,
        }
    }

    pub fn with_clamp(mut self, clamp_min: Option<i64>, clamp_max: Option<i64>) -> Self {
        self.clamp_min = clamp_min;
        self.clamp_max = clamp_max;
        self
    }

    /// Build stop points as fractions of half a touch zone's width.
    ///
    /// A 300 point wide zone with fractions `[0.33, 0.66, 1.0]` places the
    /// stops at 49.5, 99 and 150 points from the centre.
    pub fn proportional(zone_width: f64, fractions: &[f64], magnitudes: &[u32]) -> AppResult<Self> {
        if !zone_width.is_finite() || zone_width <= 0.0 {
            return Err(AppError::Validation(format!(
                "zone width must be a positive number, got {}",
                zone_width
            )));
        }
        if fractions.len() != magnitudes.len() {
            return Err(AppError::Validation(format!(
                "{} fractions given for {} magnitudes",
                fractions.len(),
                magnitudes.len()
            )));
        }

        let half_width = zone_width / 2.0;
        let config = Self::new(
            fractions
                .iter()
                .zip(magnitudes)
                .map(|(&fraction, &magnitude)| StopPoint::new(fraction * half_width, magnitude))
                .collect(),
        );
        config.validate()?;
        Ok(config)
    }

    /// Validate stop points and clamp bounds
    pub fn validate(&self) -> AppResult<()> {
        if self.stops.is_empty() {
            return Err(AppError::Validation(
                "at least one stop point is required".to_string(),
            ));
        }

        for (i, stop) in self.stops.iter().enumerate() {
            if !stop.threshold.is_finite() || stop.threshold <= 0.0 {
                return Err(AppError::Validation(format!(
                    "stops[{}] threshold must be a positive number, got {}",
                    i, stop.threshold
                )));
            }
            if stop.magnitude == 0 {
                return Err(AppError::Validation(format!(
                    "stops[{}] magnitude must be greater than 0",
                    i
                )));
            }
        }

        if let Some(i) = self
            .stops
            .windows(2)
            .position(|pair| pair[1].threshold <= pair[0].threshold)
        {
            return Err(AppError::Validation(format!(
                "stop thresholds must be strictly increasing: stops[{}] = {} follows {}",
                i + 1,
                self.stops[i + 1].threshold,
                self.stops[i].threshold
            )));
        }

        if let (Some(min), Some(max)) = (self.clamp_min, self.clamp_max) {
            if min > max {
                return Err(AppError::Validation(format!(
                    "clamp_min {} is greater than clamp_max {}",
                    min, max
                )));
            }
        }

        Ok(())
    }

    fn clamp(&self, value: i64) -> i64 {
        let value = self.clamp_min.map_or(value, |min| value.max(min));
        self.clamp_max.map_or(value, |max| value.min(max))
    }
}

/// Tactile feedback strength, chosen from the index of the crossed stop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedbackIntensity {
    Light,
    Medium,
    Heavy,
}

impl FeedbackIntensity {
    /// Index 0 is light, 1 is medium, anything further out is heavy
    pub fn for_stop_index(index: usize) -> Self {
        match index {
            0 => FeedbackIntensity::Light,
            1 => FeedbackIntensity::Medium,
            _ => FeedbackIntensity::Heavy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackIntensity::Light => "light",
            FeedbackIntensity::Medium => "medium",
            FeedbackIntensity::Heavy => "heavy",
        }
    }
}

impl fmt::Display for FeedbackIntensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value change produced by crossing a new stop point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepChange {
    pub new_value: i64,
    pub triggered_index: usize,
    /// Signed change actually applied, after clamping
    pub applied_delta: i64,
}

impl StepChange {
    pub fn intensity(&self) -> FeedbackIntensity {
        FeedbackIntensity::for_stop_index(self.triggered_index)
    }
}

/// Per-gesture state: the furthest stop handled so far.
///
/// Callers must end the session exactly once per gesture, cancel paths
/// included; a session that is never ended compares the next gesture
/// against stale state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GestureSession {
    last_triggered: Option<usize>,
}

impl GestureSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the furthest stop crossed in this gesture, `None` before any
    pub fn last_triggered_index(&self) -> Option<usize> {
        self.last_triggered
    }

    pub fn reset(&mut self) {
        self.last_triggered = None;
    }
}

/// Maps drag offsets onto stepped value changes using a validated [`StepConfig`]
#[derive(Debug, Clone)]
pub struct SteppedGestureMapper {
    config: StepConfig,
}

impl SteppedGestureMapper {
    pub fn new(config: StepConfig) -> AppResult<Self> {
        config.validate().inspect_err(|e| {
            error_logging::log_validation_error(e, "create_mapper", "step_config", None)
        })?;
        debug!(
            stops = config.stops.len(),
            clamp_min = ?config.clamp_min,
            clamp_max = ?config.clamp_max,
            "Creating SteppedGestureMapper"
        );
        Ok(Self { config })
    }

    /// Replace the configuration; the current one is kept if validation fails
    pub fn configure(&mut self, config: StepConfig) -> AppResult<()> {
        config.validate().inspect_err(|e| {
            error_logging::log_validation_error(e, "configure_mapper", "step_config", None)
        })?;
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &StepConfig {
        &self.config
    }

    /// Highest stop whose threshold the absolute offset reaches
    pub fn stop_index_for(&self, offset: f64) -> Option<usize> {
        let distance = offset.abs();
        self.config
            .stops
            .iter()
            .rposition(|stop| distance >= stop.threshold)
    }

    /// Signed step of the stop `translation` currently reaches, zero short of
    /// the first threshold. Unlike [`on_drag_update`](Self::on_drag_update)
    /// this follows the finger back down when it retreats.
    pub fn delta_for(&self, translation: f64) -> i64 {
        self.stop_index_for(translation)
            .map_or(0, |index| self.signed_magnitude(index, translation))
    }

    /// Mark the stop reached by `translation` as handled, returning its index
    /// only when it lies beyond every stop already handled in this gesture
    pub fn advance(&self, session: &mut GestureSession, translation: f64) -> Option<usize> {
        let current_index = self.stop_index_for(translation)?;

        if session
            .last_triggered
            .is_some_and(|last| current_index <= last)
        {
            trace!(
                index = current_index,
                last_triggered = ?session.last_triggered,
                "Stop already handled in this gesture"
            );
            return None;
        }

        session.last_triggered = Some(current_index);
        Some(current_index)
    }

    fn signed_magnitude(&self, index: usize, translation: f64) -> i64 {
        let magnitude = i64::from(self.config.stops[index].magnitude);
        if translation > 0.0 {
            magnitude
        } else {
            -magnitude
        }
    }

    /// Clamp `value` to the configured bounds
    pub fn clamp(&self, value: i64) -> i64 {
        self.config.clamp(value)
    }

    /// Handle one drag sample.
    ///
    /// `translation` is the signed offset from the gesture origin along the
    /// slider axis; positive moves the value up. Returns the change to apply,
    /// or `None` when no new stop was crossed or the clamp absorbed it.
    pub fn on_drag_update(
        &self,
        session: &mut GestureSession,
        translation: f64,
        current_value: i64,
    ) -> Option<StepChange> {
        let current_index = self.advance(session, translation)?;
        let delta = self.signed_magnitude(current_index, translation);
        let new_value = self.config.clamp(current_value.saturating_add(delta));

        if new_value == current_value {
            debug!(
                index = current_index,
                value = current_value,
                "Stop crossed at clamp boundary, value unchanged"
            );
            crate::observability::record_gesture_step_metrics(None);
            return None;
        }

        let change = StepChange {
            new_value,
            triggered_index: current_index,
            applied_delta: new_value.saturating_sub(current_value),
        };

        debug!(
            index = change.triggered_index,
            delta = change.applied_delta,
            new_value = change.new_value,
            "Stop point crossed"
        );
        crate::observability::record_gesture_step_metrics(Some(change.intensity()));

        Some(change)
    }

    /// Finish the gesture, whatever the final offset
    pub fn on_drag_end(&self, session: &mut GestureSession) {
        trace!(last_triggered = ?session.last_triggered, "Gesture ended");
        session.reset();
    }
}
