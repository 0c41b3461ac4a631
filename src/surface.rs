//! Detected surfaces and tap-to-surface hit testing.
//!
//! On a phone the AR session discovers planes from camera frames. Here the
//! planes are seeded from `config.toml` at startup; each one is an entity
//! with a [`DetectedPlane`] component whose local +Y axis is the plane
//! normal. Alignment is read off that normal, not off the config tag. Hit testing is plain ray/plane math so it can be exercised
//! without a window or GPU.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{AppConfig, SurfaceConfig};
use crate::measurement::SurfaceHitTest;
use crate::theme::AppTheme;

/// Which way a plane faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaneAlignment {
    #[default]
    Horizontal,
    Vertical,
}

/// Maximum tilt, in degrees, between a plane normal and world up (for
/// horizontal) or the horizon (for vertical).
const ALIGNMENT_TOLERANCE_DEGREES: f32 = 10.0;

impl PlaneAlignment {
    /// Classify a plane by its normal. Planes tilted past the tolerance
    /// either way are neither and get `None`.
    pub fn from_normal(normal: Vec3) -> Option<Self> {
        let up = normal.normalize_or_zero().dot(Vec3::Y).abs();
        let tolerance = ALIGNMENT_TOLERANCE_DEGREES.to_radians();
        if normal == Vec3::ZERO {
            None
        } else if up >= tolerance.cos() {
            Some(Self::Horizontal)
        } else if up <= tolerance.sin() {
            Some(Self::Vertical)
        } else {
            None
        }
    }
}

/// How far a hit may land from a plane's known extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaneTarget {
    /// Only inside the detected extent.
    Existing,
    /// Inside an extent when one is hit, otherwise anywhere on a plane's
    /// infinite continuation.
    #[default]
    Estimated,
}

/// A flat surface the user can measure on.
#[derive(Component, Debug, Clone, Reflect)]
pub struct DetectedPlane {
    /// Half width (local X) and half depth (local Z) in meters.
    pub half_extents: Vec2,
}

/// A detected plane resolved to world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneSurface {
    pub center: Vec3,
    pub rotation: Quat,
    pub alignment: PlaneAlignment,
    pub half_extents: Vec2,
}

impl PlaneSurface {
    /// World-space surface for a plane entity, or `None` when the plane is
    /// too slanted to count as horizontal or vertical.
    pub fn from_entity(plane: &DetectedPlane, transform: &GlobalTransform) -> Option<Self> {
        let (_, rotation, center) = transform.to_scale_rotation_translation();
        let alignment = PlaneAlignment::from_normal(rotation * Vec3::Y)?;
        Some(Self {
            center,
            rotation,
            alignment,
            half_extents: plane.half_extents,
        })
    }

    pub fn normal(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Ray parameter of the intersection, if the ray hits this plane in
    /// front of its origin. `bounded` limits hits to the plane's extent.
    pub fn intersect(&self, ray: Ray3d, bounded: bool) -> Option<f32> {
        let plane = InfinitePlane3d::new(Dir3::new(self.normal()).ok()?);
        let t = ray.intersect_plane(self.center, plane)?;

        if bounded {
            let local = self.rotation.inverse() * (ray.get_point(t) - self.center);
            if local.x.abs() > self.half_extents.x || local.z.abs() > self.half_extents.y {
                return None;
            }
        }
        Some(t)
    }
}

/// Point where `ray` meets a plane of the requested alignment.
///
/// The nearest hit inside a plane's extent wins. With
/// [`PlaneTarget::Estimated`] the nearest hit on an infinite plane is used
/// only when no extent was hit, so a plane's continuation never shadows a
/// surface that is actually there.
pub fn raycast_planes(
    ray: Ray3d,
    planes: &[PlaneSurface],
    alignment: PlaneAlignment,
    target: PlaneTarget,
) -> Option<Vec3> {
    let nearest = |bounded: bool| {
        planes
            .iter()
            .filter(|plane| plane.alignment == alignment)
            .filter_map(|plane| plane.intersect(ray, bounded))
            .min_by(|a, b| a.total_cmp(b))
    };

    let t = match target {
        PlaneTarget::Existing => nearest(true),
        PlaneTarget::Estimated => nearest(true).or_else(|| nearest(false)),
    };
    t.map(|t| ray.get_point(t))
}

/// Marker for the camera taps are projected through.
#[derive(Component)]
pub struct MeasureCamera;

/// [`SurfaceHitTest`] over the planes currently in the world, seen through
/// one camera.
pub struct PlaneRaycaster<'a> {
    camera: &'a Camera,
    camera_transform: &'a GlobalTransform,
    planes: Vec<PlaneSurface>,
    target: PlaneTarget,
}

impl<'a> PlaneRaycaster<'a> {
    pub fn new(
        camera: &'a Camera,
        camera_transform: &'a GlobalTransform,
        planes: Vec<PlaneSurface>,
        target: PlaneTarget,
    ) -> Self {
        Self {
            camera,
            camera_transform,
            planes,
            target,
        }
    }
}

impl SurfaceHitTest for PlaneRaycaster<'_> {
    fn hit_test(&self, screen_point: Vec2, alignment: PlaneAlignment) -> Option<Vec3> {
        let ray = match self.camera.viewport_to_world(self.camera_transform, screen_point) {
            Ok(ray) => ray,
            Err(e) => {
                debug!("No world ray for {:?}: {:?}", screen_point, e);
                return None;
            }
        };
        raycast_planes(ray, &self.planes, alignment, self.target)
    }
}

// =============================================================================
// Plugin
// =============================================================================

pub struct SurfacePlugin;

impl Plugin for SurfacePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_detected_planes);
    }
}

/// Local rotation that turns +Y into the configured plane normal.
fn surface_rotation(surface: &SurfaceConfig) -> Quat {
    let yaw = Quat::from_rotation_y(surface.yaw_degrees.to_radians());
    match surface.alignment {
        PlaneAlignment::Horizontal => yaw,
        PlaneAlignment::Vertical => yaw * Quat::from_rotation_x(std::f32::consts::FRAC_PI_2),
    }
}

fn spawn_detected_planes(
    mut commands: Commands,
    config: Res<AppConfig>,
    theme: Res<AppTheme>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let horizontal = materials.add(StandardMaterial {
        base_color: theme.surface_color(PlaneAlignment::Horizontal),
        alpha_mode: AlphaMode::Blend,
        ..default()
    });
    let vertical = materials.add(StandardMaterial {
        base_color: theme.surface_color(PlaneAlignment::Vertical),
        alpha_mode: AlphaMode::Blend,
        ..default()
    });

    for surface in &config.surfaces {
        let half_extents = Vec2::new(surface.size[0], surface.size[1]) / 2.0;
        if half_extents.x <= 0.0 || half_extents.y <= 0.0 {
            warn!("Skipping surface '{}' with non-positive size {:?}", surface.name, surface.size);
            continue;
        }

        let material = match surface.alignment {
            PlaneAlignment::Horizontal => horizontal.clone(),
            PlaneAlignment::Vertical => vertical.clone(),
        };

        commands.spawn((
            Name::new(surface.name.clone()),
            DetectedPlane { half_extents },
            Mesh3d(meshes.add(Plane3d::new(Vec3::Y, half_extents))),
            MeshMaterial3d(material),
            Transform::from_translation(Vec3::from_array(surface.center))
                .with_rotation(surface_rotation(surface)),
        ));
        debug!("Seeded {:?} surface '{}'", surface.alignment, surface.name);
    }

    info!("Seeded {} detected surfaces", config.surfaces.len());
}
