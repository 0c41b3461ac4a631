use bevy::prelude::*;

use super::session::{MeasurementSession, Point3D, SubmitOutcome};
use crate::surface::PlaneAlignment;
use crate::units::{Meters, ZERO_READOUT};

// =============================================================================
// Collaborators
// =============================================================================

/// Projects a screen tap onto a detected surface.
pub trait SurfaceHitTest {
    /// World-space point under `screen_point` on a plane of the given
    /// alignment, or `None` when the tap misses every such plane.
    fn hit_test(&self, screen_point: Vec2, alignment: PlaneAlignment) -> Option<Point3D>;
}

/// Places and removes measurement visuals in the 3D scene.
pub trait SceneDisplay {
    fn place_marker(&mut self, at: Point3D);
    fn place_connector(&mut self, from: Point3D, to: Point3D, length: f32);
    fn clear_all(&mut self);
}

/// Displays the measured distance to the user.
pub trait MeasurementReadout {
    fn set_text(&mut self, text: String);
}

// =============================================================================
// Router
// =============================================================================

/// Owns the measurement session and turns taps and resets into session
/// updates plus display requests.
#[derive(Resource, Debug, Default, Reflect)]
#[reflect(Resource)]
pub struct InputRouter {
    session: MeasurementSession,
}

impl InputRouter {
    pub fn session(&self) -> &MeasurementSession {
        &self.session
    }

    /// Handle one tap at `screen_point`.
    ///
    /// Returns `None` when the tap hit no horizontal plane; that is a normal
    /// outcome of imprecise tapping and leaves the session untouched.
    pub fn handle_tap(
        &mut self,
        screen_point: Vec2,
        surface: &impl SurfaceHitTest,
        display: &mut impl SceneDisplay,
        readout: &mut impl MeasurementReadout,
    ) -> Option<SubmitOutcome> {
        let Some(point) = surface.hit_test(screen_point, PlaneAlignment::Horizontal) else {
            debug!("Tap at {:?} hit no horizontal plane", screen_point);
            return None;
        };

        let outcome = self.session.submit(point);
        match outcome {
            SubmitOutcome::StartRecorded { start } => {
                info!("Measurement start: {:.3}, {:.3}, {:.3}", start.x, start.y, start.z);
                display.place_marker(start);
            }
            SubmitOutcome::Completed(result) => {
                info!(
                    "Measurement end: {:.3}, {:.3}, {:.3} ({})",
                    result.end.x,
                    result.end.y,
                    result.end.z,
                    Meters(result.distance)
                );
                display.place_marker(result.end);
                display.place_connector(result.start, result.end, result.distance);
                readout.set_text(Meters(result.distance).to_string());
            }
            SubmitOutcome::Ignored => {
                debug!("Measurement already complete, tap ignored until reset");
            }
        }
        Some(outcome)
    }

    /// Clear the session along with everything it put on screen.
    pub fn reset(&mut self, display: &mut impl SceneDisplay, readout: &mut impl MeasurementReadout) {
        self.session.reset();
        display.clear_all();
        readout.set_text(ZERO_READOUT.to_string());
        info!("Measurement reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::session::SessionState;

    /// Hit test that replays a scripted list of answers, one per tap.
    struct ScriptedSurface {
        hits: std::cell::RefCell<std::collections::VecDeque<Option<Vec3>>>,
        requested: std::cell::RefCell<Vec<PlaneAlignment>>,
    }

    impl ScriptedSurface {
        fn new(hits: impl IntoIterator<Item = Option<Vec3>>) -> Self {
            Self {
                hits: std::cell::RefCell::new(hits.into_iter().collect()),
                requested: std::cell::RefCell::new(Vec::new()),
            }
        }
    }

    impl SurfaceHitTest for ScriptedSurface {
        fn hit_test(&self, _screen_point: Vec2, alignment: PlaneAlignment) -> Option<Vec3> {
            self.requested.borrow_mut().push(alignment);
            self.hits.borrow_mut().pop_front().flatten()
        }
    }

    #[derive(Debug, PartialEq)]
    enum DisplayCall {
        Marker(Vec3),
        Connector(Vec3, Vec3, f32),
        Clear,
    }

    #[derive(Default)]
    struct RecordingDisplay {
        calls: Vec<DisplayCall>,
    }

    impl SceneDisplay for RecordingDisplay {
        fn place_marker(&mut self, at: Vec3) {
            self.calls.push(DisplayCall::Marker(at));
        }

        fn place_connector(&mut self, from: Vec3, to: Vec3, length: f32) {
            self.calls.push(DisplayCall::Connector(from, to, length));
        }

        fn clear_all(&mut self) {
            self.calls.push(DisplayCall::Clear);
        }
    }

    #[derive(Default)]
    struct RecordingReadout {
        texts: Vec<String>,
    }

    impl MeasurementReadout for RecordingReadout {
        fn set_text(&mut self, text: String) {
            self.texts.push(text);
        }
    }

    fn tap(
        router: &mut InputRouter,
        surface: &ScriptedSurface,
        display: &mut RecordingDisplay,
        readout: &mut RecordingReadout,
    ) -> Option<SubmitOutcome> {
        router.handle_tap(Vec2::new(320.0, 240.0), surface, display, readout)
    }

    #[test]
    fn two_hits_place_markers_connector_and_label() {
        let surface = ScriptedSurface::new([Some(Vec3::ZERO), Some(Vec3::new(3.0, 4.0, 0.0))]);
        let mut display = RecordingDisplay::default();
        let mut readout = RecordingReadout::default();
        let mut router = InputRouter::default();

        let first = tap(&mut router, &surface, &mut display, &mut readout);
        assert!(matches!(first, Some(SubmitOutcome::StartRecorded { .. })));
        assert_eq!(display.calls, vec![DisplayCall::Marker(Vec3::ZERO)]);
        assert!(readout.texts.is_empty());

        let second = tap(&mut router, &surface, &mut display, &mut readout);
        assert!(matches!(second, Some(SubmitOutcome::Completed(_))));
        assert_eq!(
            display.calls,
            vec![
                DisplayCall::Marker(Vec3::ZERO),
                DisplayCall::Marker(Vec3::new(3.0, 4.0, 0.0)),
                DisplayCall::Connector(Vec3::ZERO, Vec3::new(3.0, 4.0, 0.0), 5.0),
            ]
        );
        assert_eq!(readout.texts, vec!["5.00 meters".to_string()]);
        assert_eq!(router.session().state(), SessionState::Complete);
    }

    #[test]
    fn hit_test_only_asks_for_horizontal_planes() {
        let surface = ScriptedSurface::new([Some(Vec3::ZERO), None]);
        let mut display = RecordingDisplay::default();
        let mut readout = RecordingReadout::default();
        let mut router = InputRouter::default();

        tap(&mut router, &surface, &mut display, &mut readout);
        tap(&mut router, &surface, &mut display, &mut readout);

        assert_eq!(
            *surface.requested.borrow(),
            vec![PlaneAlignment::Horizontal, PlaneAlignment::Horizontal]
        );
    }

    #[test]
    fn miss_leaves_session_and_display_untouched() {
        let surface = ScriptedSurface::new([None, Some(Vec3::X), None]);
        let mut display = RecordingDisplay::default();
        let mut readout = RecordingReadout::default();
        let mut router = InputRouter::default();

        assert_eq!(tap(&mut router, &surface, &mut display, &mut readout), None);
        assert_eq!(*router.session(), MeasurementSession::Empty);
        assert!(display.calls.is_empty());

        tap(&mut router, &surface, &mut display, &mut readout);
        let before = *router.session();
        assert_eq!(tap(&mut router, &surface, &mut display, &mut readout), None);
        assert_eq!(*router.session(), before);
        assert_eq!(display.calls.len(), 1);
        assert!(readout.texts.is_empty());
    }

    #[test]
    fn tap_after_completion_is_ignored() {
        let surface = ScriptedSurface::new([
            Some(Vec3::ZERO),
            Some(Vec3::new(3.0, 4.0, 0.0)),
            Some(Vec3::new(7.0, 0.0, 7.0)),
        ]);
        let mut display = RecordingDisplay::default();
        let mut readout = RecordingReadout::default();
        let mut router = InputRouter::default();

        tap(&mut router, &surface, &mut display, &mut readout);
        tap(&mut router, &surface, &mut display, &mut readout);
        let calls_before = display.calls.len();

        let third = tap(&mut router, &surface, &mut display, &mut readout);
        assert_eq!(third, Some(SubmitOutcome::Ignored));
        assert_eq!(display.calls.len(), calls_before);
        assert_eq!(readout.texts, vec!["5.00 meters".to_string()]);
        assert_eq!(router.session().end(), Some(Vec3::new(3.0, 4.0, 0.0)));
    }

    #[test]
    fn reset_clears_scene_and_zeroes_label() {
        let surface = ScriptedSurface::new([Some(Vec3::ZERO), Some(Vec3::X), Some(Vec3::Z)]);
        let mut display = RecordingDisplay::default();
        let mut readout = RecordingReadout::default();
        let mut router = InputRouter::default();

        tap(&mut router, &surface, &mut display, &mut readout);
        tap(&mut router, &surface, &mut display, &mut readout);
        router.reset(&mut display, &mut readout);

        assert_eq!(*router.session(), MeasurementSession::Empty);
        assert_eq!(display.calls.last(), Some(&DisplayCall::Clear));
        assert_eq!(readout.texts.last().map(String::as_str), Some("0.00"));

        let next = tap(&mut router, &surface, &mut display, &mut readout);
        assert_eq!(next, Some(SubmitOutcome::StartRecorded { start: Vec3::Z }));
    }

    #[test]
    fn reset_on_empty_session_still_clears_display() {
        let mut display = RecordingDisplay::default();
        let mut readout = RecordingReadout::default();
        let mut router = InputRouter::default();

        router.reset(&mut display, &mut readout);

        assert_eq!(display.calls, vec![DisplayCall::Clear]);
        assert_eq!(readout.texts, vec!["0.00".to_string()]);
    }
}
