//! Gesture lifecycle driver for an invisible number slider.
//!
//! A `NumberSlider` owns the displayed value, the mapper and one
//! [`GestureSession`], and forwards every value change and feedback pulse to a
//! [`SliderObserver`]. Rendering and haptics live behind that trait.
//!
//! In [`CommitMode::Immediate`] every newly crossed stop changes the value at
//! once. In [`CommitMode::OnRelease`] the drag only previews a pending change
//! (the step of the stop under the finger, feedback included) and the value
//! moves once, when the gesture ends. A cancelled gesture discards it.

use tracing::debug;

use crate::errors::AppResult;
use crate::stepped_gesture::{
    FeedbackIntensity, GestureSession, StepChange, StepConfig, SteppedGestureMapper,
};

/// Pointer lifecycle signals from the gesture recognizer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Began,
    /// Signed translation from the gesture origin along the slider axis
    Moved(f64),
    Ended,
    Cancelled,
}

/// When a crossed stop reaches the value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommitMode {
    /// Apply each step as its stop is crossed
    #[default]
    Immediate,
    /// Hold the step of the current stop and apply it when the gesture ends
    OnRelease,
}

/// Receives the slider's output
pub trait SliderObserver {
    fn on_value_changed(&mut self, new_value: i64);
    fn on_feedback(&mut self, intensity: FeedbackIntensity);
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SliderObserver for NoopObserver {
    fn on_value_changed(&mut self, _new_value: i64) {}
    fn on_feedback(&mut self, _intensity: FeedbackIntensity) {}
}

/// Observer that keeps every notification, in order
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordingObserver {
    pub values: Vec<i64>,
    pub feedback: Vec<FeedbackIntensity>,
}

impl SliderObserver for RecordingObserver {
    fn on_value_changed(&mut self, new_value: i64) {
        self.values.push(new_value);
    }

    fn on_feedback(&mut self, intensity: FeedbackIntensity) {
        self.feedback.push(intensity);
    }
}

pub struct NumberSlider<O: SliderObserver = NoopObserver> {
    mapper: SteppedGestureMapper,
    session: GestureSession,
    value: i64,
    observer: O,
    mode: CommitMode,
    /// Last offset seen in an on-release gesture
    pending_translation: f64,
}

impl NumberSlider<NoopObserver> {
    pub fn new(config: StepConfig, initial_value: i64) -> AppResult<Self> {
        Self::with_observer(config, initial_value, NoopObserver)
    }
}

impl<O: SliderObserver> NumberSlider<O> {
    pub fn with_observer(config: StepConfig, initial_value: i64, observer: O) -> AppResult<Self> {
        Ok(Self {
            mapper: SteppedGestureMapper::new(config)?,
            session: GestureSession::new(),
            value: initial_value,
            observer,
            mode: CommitMode::Immediate,
            pending_translation: 0.0,
        })
    }

    pub fn with_commit_mode(mut self, mode: CommitMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn commit_mode(&self) -> CommitMode {
        self.mode
    }

    /// Change the release would apply, before clamping; always zero in
    /// immediate mode
    pub fn pending_delta(&self) -> i64 {
        match self.mode {
            CommitMode::Immediate => 0,
            CommitMode::OnRelease => self.mapper.delta_for(self.pending_translation),
        }
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    /// Set the value from outside a gesture (e.g. a stored transaction amount)
    pub fn set_value(&mut self, value: i64) {
        self.value = value;
    }

    pub fn session(&self) -> &GestureSession {
        &self.session
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    /// Feed one lifecycle event, returning the change it produced
    pub fn handle(&mut self, event: GestureEvent) -> Option<StepChange> {
        match event {
            GestureEvent::Began => {
                if self.session.last_triggered_index().is_some() {
                    debug!("Gesture began over a session that was never ended, resetting");
                }
                self.session.reset();
                self.pending_translation = 0.0;
                None
            }
            GestureEvent::Moved(translation) => match self.mode {
                CommitMode::Immediate => {
                    let change =
                        self.mapper
                            .on_drag_update(&mut self.session, translation, self.value)?;
                    self.value = change.new_value;
                    self.observer.on_value_changed(change.new_value);
                    self.observer.on_feedback(change.intensity());
                    Some(change)
                }
                CommitMode::OnRelease => {
                    self.pending_translation = translation;
                    if let Some(index) = self.mapper.advance(&mut self.session, translation) {
                        let intensity = FeedbackIntensity::for_stop_index(index);
                        crate::observability::record_gesture_step_metrics(Some(intensity));
                        self.observer.on_feedback(intensity);
                    }
                    None
                }
            },
            GestureEvent::Ended => {
                let change = match self.mode {
                    CommitMode::Immediate => None,
                    CommitMode::OnRelease => self.commit_pending(),
                };
                self.finish();
                change
            }
            GestureEvent::Cancelled => {
                let pending = self.pending_delta();
                if pending != 0 {
                    debug!(pending, "Gesture cancelled, discarding pending change");
                }
                self.finish();
                None
            }
        }
    }

    fn commit_pending(&mut self) -> Option<StepChange> {
        let index = self.mapper.stop_index_for(self.pending_translation)?;
        let delta = self.mapper.delta_for(self.pending_translation);
        let new_value = self.mapper.clamp(self.value.saturating_add(delta));
        if new_value == self.value {
            return None;
        }

        let change = StepChange {
            new_value,
            triggered_index: index,
            applied_delta: new_value.saturating_sub(self.value),
        };
        debug!(
            delta = change.applied_delta,
            new_value = change.new_value,
            "Committed pending change on release"
        );
        self.value = new_value;
        self.observer.on_value_changed(new_value);
        Some(change)
    }

    fn finish(&mut self) {
        self.mapper.on_drag_end(&mut self.session);
        self.pending_translation = 0.0;
    }

    /// Feed a sequence of events and collect the changes
    pub fn replay<I>(&mut self, events: I) -> Vec<StepChange>
    where
        I: IntoIterator<Item = GestureEvent>,
    {
        events
            .into_iter()
            .filter_map(|event| self.handle(event))
            .collect()
    }
}
