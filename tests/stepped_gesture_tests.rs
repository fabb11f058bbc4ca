
#[cfg(test)]
mod tests {
    use super::test_helpers::{create_clamped_mapper, create_mapper, drag};
    use pocket_tally::stepped_gesture::{
        FeedbackIntensity, GestureSession, StepConfig, SteppedGestureMapper, StopPoint,
    };

    #[test]
    fn test_escalating_drag_fires_each_stop_once() {
        let mapper = create_mapper();
        let mut session = GestureSession::new();
        let mut value = 0;

        let changes = drag(
            &mapper,
            &mut session,
            &mut value,
            &[5.0, 20.0, 45.0, 50.0, 70.0, 99.9, 110.0, 130.0, 179.0, 190.0, 240.0, 400.0],
        );

        let deltas: Vec<i64> = changes.iter().map(|c| c.applied_delta).collect();
        assert_eq!(deltas, vec![1, 5, 10]);
        assert_eq!(value, 16);

        let intensities: Vec<FeedbackIntensity> = changes.iter().map(|c| c.intensity()).collect();
        assert_eq!(
            intensities,
            vec![
                FeedbackIntensity::Light,
                FeedbackIntensity::Medium,
                FeedbackIntensity::Heavy
            ]
        );
        assert_eq!(session.last_triggered_index(), Some(2));
    }

    #[test]
    fn test_oscillation_below_next_stop_does_not_retrigger() {
        let mapper = create_mapper();
        let mut session = GestureSession::new();
        let mut value = 0;

        let changes = drag(
            &mapper,
            &mut session,
            &mut value,
            &[50.0, 20.0, 50.0, 20.0, 45.0, 90.0, 30.0, 60.0],
        );

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].triggered_index, 0);
        assert_eq!(value, 1);
    }

    #[test]
    fn test_drag_end_resets_session() {
        let mapper = create_mapper();
        let mut session = GestureSession::new();
        let mut value = 0;

        drag(&mapper, &mut session, &mut value, &[45.0, 110.0]);
        assert_eq!(value, 6);

        mapper.on_drag_end(&mut session);
        assert_eq!(session.last_triggered_index(), None);

        let change = mapper.on_drag_update(&mut session, 45.0, value).unwrap();
        assert_eq!(change.triggered_index, 0);
        assert_eq!(change.new_value, 7);
    }

    #[test]
    fn test_leftward_drag_decrements() {
        let mapper = create_mapper();
        let mut session = GestureSession::new();
        let mut value = 20;

        let changes = drag(&mapper, &mut session, &mut value, &[-45.0, -110.0, -200.0]);

        let deltas: Vec<i64> = changes.iter().map(|c| c.applied_delta).collect();
        assert_eq!(deltas, vec![-1, -5, -10]);
        assert_eq!(value, 4);
    }

    #[test]
    fn test_single_sample_past_several_stops_fires_only_the_highest() {
        let mapper = create_mapper();
        let mut session = GestureSession::new();

        let change = mapper.on_drag_update(&mut session, 190.0, 0).unwrap();
        assert_eq!(change.triggered_index, 2);
        assert_eq!(change.applied_delta, 10);

        assert!(mapper.on_drag_update(&mut session, 45.0, 10).is_none());
        assert!(mapper.on_drag_update(&mut session, 110.0, 10).is_none());
    }

    #[test]
    fn test_direction_reversal_keeps_gesture_state() {
        let mapper = create_mapper();
        let mut session = GestureSession::new();
        let mut value = 0;

        // Right past +5, then back through the origin to the left
        let changes = drag(
            &mapper,
            &mut session,
            &mut value,
            &[45.0, 110.0, 0.0, -50.0, -110.0, -190.0],
        );

        let deltas: Vec<i64> = changes.iter().map(|c| c.applied_delta).collect();
        assert_eq!(deltas, vec![1, 5, -10]);
        assert_eq!(value, -4);
    }

    #[test]
    fn test_clamp_max_absorbs_delta_but_advances_session() {
        let mapper = create_clamped_mapper(None, Some(10));
        let mut session = GestureSession::new();

        assert!(mapper.on_drag_update(&mut session, 45.0, 10).is_none());
        assert_eq!(session.last_triggered_index(), Some(0));

        // Same stop does not fire again even though the value is unchanged
        assert!(mapper.on_drag_update(&mut session, 60.0, 10).is_none());
        assert_eq!(session.last_triggered_index(), Some(0));

        // Moving back down is still possible in a new gesture
        mapper.on_drag_end(&mut session);
        let change = mapper.on_drag_update(&mut session, -45.0, 10).unwrap();
        assert_eq!(change.new_value, 9);
    }

    #[test]
    fn test_clamp_min() {
        let mapper = create_clamped_mapper(Some(0), None);
        let mut session = GestureSession::new();
        let mut value = 3;

        let changes = drag(&mapper, &mut session, &mut value, &[-45.0, -110.0, -190.0]);

        let deltas: Vec<i64> = changes.iter().map(|c| c.applied_delta).collect();
        assert_eq!(deltas, vec![-1, -2]);
        assert_eq!(value, 0);
        assert_eq!(session.last_triggered_index(), Some(2));
    }

    #[test]
    fn test_sessions_are_independent() {
        let mapper = create_mapper();
        let mut left_slider = GestureSession::new();
        let mut right_slider = GestureSession::new();

        assert!(mapper.on_drag_update(&mut left_slider, 45.0, 0).is_some());
        assert!(mapper.on_drag_update(&mut right_slider, 45.0, 0).is_some());
        assert!(mapper.on_drag_update(&mut left_slider, 50.0, 1).is_none());
    }

    #[test]
    fn test_small_offsets_never_fire() {
        let mapper = create_mapper();
        let mut session = GestureSession::new();
        let mut value = 0;

        let changes = drag(
            &mapper,
            &mut session,
            &mut value,
            &[0.0, -0.0, 12.0, -39.99, f64::NAN],
        );
        assert!(changes.is_empty());
        assert_eq!(session.last_triggered_index(), None);
    }

    #[test]
    fn test_non_monotonic_configuration_is_rejected() {
        let config = StepConfig::new(vec![
            StopPoint::new(40.0, 1),
            StopPoint::new(180.0, 10),
            StopPoint::new(100.0, 5),
        ]);
        assert!(SteppedGestureMapper::new(config).is_err());

        let config = StepConfig::new(vec![StopPoint::new(40.0, 1), StopPoint::new(f64::INFINITY, 5)]);
        assert!(SteppedGestureMapper::new(config).is_err());
    }

    #[test]
    fn test_proportional_configuration() {
        let config = StepConfig::proportional(300.0, &[0.33, 0.66, 1.0], &[1, 5, 10]).unwrap();
        let thresholds: Vec<f64> = config.stops.iter().map(|s| s.threshold).collect();
        assert!((thresholds[0] - 49.5).abs() < 1e-9);
        assert!((thresholds[1] - 99.0).abs() < 1e-9);
        assert!((thresholds[2] - 150.0).abs() < 1e-9);

        assert!(StepConfig::proportional(0.0, &[0.5], &[1]).is_err());
        assert!(StepConfig::proportional(300.0, &[0.5, 1.0], &[1]).is_err());
        assert!(StepConfig::proportional(300.0, &[0.66, 0.33], &[1, 5]).is_err());
    }
}
