//! Two-point measurement state and the geometry derived from it.
//!
//! A session records at most one start and one end point, both world-space
//! positions in meters. The variant layout makes "end without start"
//! unrepresentable.

use bevy::prelude::*;

/// A world-space position in meters, as produced by a surface hit test.
pub type Point3D = Vec3;

/// Recorded points of the single measurement in progress.
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub enum MeasurementSession {
    #[default]
    Empty,
    HasStart { start: Point3D },
    Complete { start: Point3D, end: Point3D },
}

/// Fieldless view of [`MeasurementSession`], handy for logging and UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    HasStart,
    Complete,
}

/// What happened to a submitted point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SubmitOutcome {
    /// The point became the start of a new measurement.
    StartRecorded { start: Point3D },
    /// The point closed the measurement.
    Completed(MeasurementResult),
    /// Both points were already set; nothing changed.
    Ignored,
}

impl MeasurementSession {
    /// Forget both points.
    pub fn reset(&mut self) {
        *self = Self::Empty;
    }

    /// Feed the next hit point into the session.
    ///
    /// The result is computed exactly once, on the HasStart -> Complete
    /// transition. A point submitted to a complete session is dropped until
    /// the next [`reset`](Self::reset).
    pub fn submit(&mut self, point: Point3D) -> SubmitOutcome {
        match *self {
            Self::Empty => {
                *self = Self::HasStart { start: point };
                SubmitOutcome::StartRecorded { start: point }
            }
            Self::HasStart { start } => {
                *self = Self::Complete { start, end: point };
                SubmitOutcome::Completed(MeasurementResult::between(start, point))
            }
            Self::Complete { .. } => SubmitOutcome::Ignored,
        }
    }

    pub fn state(&self) -> SessionState {
        match self {
            Self::Empty => SessionState::Empty,
            Self::HasStart { .. } => SessionState::HasStart,
            Self::Complete { .. } => SessionState::Complete,
        }
    }

    pub fn start(&self) -> Option<Point3D> {
        match *self {
            Self::Empty => None,
            Self::HasStart { start } | Self::Complete { start, .. } => Some(start),
        }
    }

    pub fn end(&self) -> Option<Point3D> {
        match *self {
            Self::Complete { end, .. } => Some(end),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }
}

/// Distance and placement data for a finished measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementResult {
    pub start: Point3D,
    pub end: Point3D,
    /// Euclidean distance between `start` and `end`, never negative.
    pub distance: f32,
    pub midpoint: Point3D,
    /// Unit vector from `midpoint` toward `start`; zero when the points coincide.
    pub direction: Vec3,
}

impl MeasurementResult {
    pub fn between(start: Point3D, end: Point3D) -> Self {
        let midpoint = midpoint(start, end);
        Self {
            start,
            end,
            distance: distance(start, end),
            midpoint,
            direction: (start - midpoint).normalize_or_zero(),
        }
    }

    /// Placement for a unit cuboid so it spans `start` to `end`.
    ///
    /// The cuboid's local Z axis is its long axis; -Z faces `start`.
    /// `thickness` scales the two short axes.
    pub fn connector_transform(&self, thickness: f32) -> Transform {
        let rotation = if self.direction == Vec3::ZERO {
            Quat::IDENTITY
        } else {
            Quat::from_rotation_arc(Vec3::NEG_Z, self.direction)
        };

        Transform {
            translation: self.midpoint,
            rotation,
            scale: Vec3::new(thickness, thickness, self.distance),
        }
    }
}

/// Straight-line distance between two points.
pub fn distance(a: Point3D, b: Point3D) -> f32 {
    (b - a).length()
}

/// Component-wise average of two points.
pub fn midpoint(a: Point3D, b: Point3D) -> Point3D {
    (a + b) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn complete(start: Vec3, end: Vec3) -> (MeasurementSession, MeasurementResult) {
        let mut session = MeasurementSession::default();
        session.submit(start);
        match session.submit(end) {
            SubmitOutcome::Completed(result) => (session, result),
            other => panic!("expected Completed, got {:?}", other),
        }
    }

    #[test]
    fn distance_is_symmetric_and_zero_for_same_point() {
        let points = [
            Vec3::ZERO,
            Vec3::new(1.0, -2.0, 0.5),
            Vec3::new(-3.25, 0.0, 7.0),
            Vec3::new(100.0, 0.01, -42.0),
        ];
        for &p in &points {
            assert_eq!(distance(p, p), 0.0);
            for &q in &points {
                assert!((distance(p, q) - distance(q, p)).abs() < EPS);
            }
        }
    }

    #[test]
    fn first_submit_records_start_without_result() {
        let mut session = MeasurementSession::default();
        let outcome = session.submit(Vec3::new(0.2, 0.0, -1.0));

        assert_eq!(
            outcome,
            SubmitOutcome::StartRecorded { start: Vec3::new(0.2, 0.0, -1.0) }
        );
        assert_eq!(session.state(), SessionState::HasStart);
        assert!(!session.is_complete());
        assert_eq!(session.start(), Some(Vec3::new(0.2, 0.0, -1.0)));
        assert_eq!(session.end(), None);
    }

    #[test]
    fn second_submit_completes_with_euclidean_distance() {
        let start = Vec3::new(1.0, 2.0, 3.0);
        let end = Vec3::new(-1.0, 0.0, 4.0);
        let (session, result) = complete(start, end);

        let expected = ((2.0f32 * 2.0) + (2.0 * 2.0) + (1.0 * 1.0)).sqrt();
        assert!((result.distance - expected).abs() < EPS);
        assert_eq!(session.state(), SessionState::Complete);
        assert!(session.is_complete());
        assert_eq!(session.start(), Some(start));
        assert_eq!(session.end(), Some(end));
    }

    #[test]
    fn three_four_five_triangle() {
        let (_, result) = complete(Vec3::ZERO, Vec3::new(3.0, 4.0, 0.0));

        assert!((result.distance - 5.0).abs() < EPS);
        assert_eq!(format!("{:.2}", result.distance), "5.00");
        assert_eq!(result.midpoint, Vec3::new(1.5, 2.0, 0.0));
    }

    #[test]
    fn same_point_twice_measures_zero() {
        let p = Vec3::new(1.0, 1.0, 1.0);
        let (_, result) = complete(p, p);

        assert_eq!(result.distance, 0.0);
        assert_eq!(format!("{:.2}", result.distance), "0.00");
        assert_eq!(result.direction, Vec3::ZERO);
        assert_eq!(result.connector_transform(0.003).rotation, Quat::IDENTITY);
    }

    #[test]
    fn third_submit_is_ignored() {
        let (mut session, _) = complete(Vec3::ZERO, Vec3::new(3.0, 4.0, 0.0));
        let before = session;

        assert_eq!(session.submit(Vec3::new(9.0, 9.0, 9.0)), SubmitOutcome::Ignored);
        assert_eq!(session, before);
        assert_eq!(session.end(), Some(Vec3::new(3.0, 4.0, 0.0)));
    }

    #[test]
    fn reset_returns_to_empty_from_every_state() {
        let mut empty = MeasurementSession::default();
        empty.reset();
        assert_eq!(empty, MeasurementSession::Empty);

        let mut has_start = MeasurementSession::default();
        has_start.submit(Vec3::X);
        has_start.reset();
        assert_eq!(has_start.state(), SessionState::Empty);
        assert_eq!(has_start.start(), None);

        let (mut done, _) = complete(Vec3::X, Vec3::Y);
        done.reset();
        assert!(!done.is_complete());
        assert_eq!(done.start(), None);
        assert_eq!(done.end(), None);

        // A fresh measurement can begin right after a reset.
        assert!(matches!(done.submit(Vec3::Z), SubmitOutcome::StartRecorded { .. }));
    }

    #[test]
    fn connector_spans_start_to_end() {
        let start = Vec3::new(0.0, 0.0, 0.0);
        let end = Vec3::new(2.0, 0.0, -1.0);
        let (_, result) = complete(start, end);
        let transform = result.connector_transform(0.003);

        assert_eq!(transform.translation, result.midpoint);
        assert!((transform.scale.z - result.distance).abs() < EPS);
        assert!((transform.scale.x - 0.003).abs() < EPS);

        // The ends of a unit cuboid along local Z land on the two points.
        let toward_start = transform.transform_point(Vec3::new(0.0, 0.0, -0.5));
        let toward_end = transform.transform_point(Vec3::new(0.0, 0.0, 0.5));
        assert!(toward_start.distance(start) < 1e-4);
        assert!(toward_end.distance(end) < 1e-4);
    }

    #[test]
    fn direction_points_from_midpoint_to_start() {
        let (_, result) = complete(Vec3::new(0.0, 0.0, 4.0), Vec3::new(0.0, 0.0, -4.0));

        assert!((result.direction - Vec3::Z).length() < EPS);
    }

    #[test]
    fn vertical_connector_is_still_well_formed() {
        let (_, result) = complete(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, 0.0));
        let transform = result.connector_transform(0.01);

        assert!(transform.rotation.is_normalized());
        let toward_start = transform.transform_point(Vec3::new(0.0, 0.0, -0.5));
        assert!(toward_start.distance(Vec3::Y) < 1e-4);
    }
}
