use bevy::input::gestures::PinchGesture;
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::config::AppConfig;
use crate::surface::MeasureCamera;

const MIN_PITCH: f32 = 5.0;
const MAX_PITCH: f32 = 89.0;
const MIN_DISTANCE: f32 = 0.3;
const MAX_DISTANCE: f32 = 20.0;
const ORBIT_SENSITIVITY: f32 = 0.3;
const ZOOM_SENSITIVITY_LINE: f32 = 0.1;
const ZOOM_SENSITIVITY_PIXEL: f32 = 0.002;

// =============================================================================
// Resources
// =============================================================================

/// Orbit parameters for the viewing camera. Stands in for the handheld
/// device moving around the room.
#[derive(Resource, Debug, Clone, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct OrbitCameraState {
    /// Point the camera looks at.
    pub focus: Vec3,
    /// Distance from `focus` in meters.
    pub distance: f32,
    /// Degrees above the horizon.
    pub pitch: f32,
    /// Degrees around the vertical axis; 0 looks toward -Z.
    pub yaw: f32,
}

impl Default for OrbitCameraState {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl OrbitCameraState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            focus: Vec3::from_array(config.camera.focus),
            distance: config.camera.distance.clamp(MIN_DISTANCE, MAX_DISTANCE),
            pitch: config.camera.pitch_degrees.clamp(MIN_PITCH, MAX_PITCH),
            yaw: config.camera.yaw_degrees.rem_euclid(360.0),
        }
    }

    /// Camera transform for the current orbit, Y up.
    pub fn transform(&self) -> Transform {
        let pitch_rad = self.pitch.to_radians();
        let yaw_rad = self.yaw.to_radians();

        let horizontal_dist = self.distance * pitch_rad.cos();
        let vertical_dist = self.distance * pitch_rad.sin();

        // At yaw=0 the camera sits on +Z of the focus looking toward -Z.
        let position = Vec3::new(
            self.focus.x - horizontal_dist * yaw_rad.sin(),
            self.focus.y + vertical_dist,
            self.focus.z + horizontal_dist * yaw_rad.cos(),
        );

        Transform::from_translation(position).looking_at(self.focus, Vec3::Y)
    }

    pub fn orbit(&mut self, delta: Vec2) {
        self.yaw = (self.yaw + delta.x * ORBIT_SENSITIVITY).rem_euclid(360.0);
        self.pitch = (self.pitch + delta.y * ORBIT_SENSITIVITY).clamp(MIN_PITCH, MAX_PITCH);
    }

    /// Positive `amount` moves closer.
    pub fn zoom(&mut self, amount: f32) {
        self.distance = (self.distance * (1.0 - amount)).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }
}

// =============================================================================
// Plugin
// =============================================================================

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera)
            .add_systems(Update, (handle_camera_controls, apply_orbit_transform).chain());
    }
}

fn setup_camera(mut commands: Commands, config: Res<AppConfig>) {
    let state = OrbitCameraState::from_config(&config);

    commands.spawn((
        Name::new("Measure camera"),
        Camera3d::default(),
        state.transform(),
        MeasureCamera,
    ));
    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(2.0, 6.0, 3.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.insert_resource(GlobalAmbientLight {
        brightness: 400.0,
        ..default()
    });
    commands.insert_resource(state);
}

/// Right-drag orbits, scroll and pinch zoom. Left button is left alone for
/// measurement taps.
fn handle_camera_controls(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut scroll_events: MessageReader<MouseWheel>,
    mut pinch_events: MessageReader<PinchGesture>,
    state: Option<ResMut<OrbitCameraState>>,
    mut contexts: EguiContexts,
) {
    let Some(mut state) = state else {
        return;
    };

    if let Ok(ctx) = contexts.ctx_mut() {
        if ctx.is_pointer_over_area() {
            mouse_motion.clear();
            scroll_events.clear();
            pinch_events.clear();
            return;
        }
    }

    if mouse_button.pressed(MouseButton::Right) {
        for event in mouse_motion.read() {
            state.orbit(event.delta);
        }
    } else {
        mouse_motion.clear();
    }

    for event in scroll_events.read() {
        let amount = match event.unit {
            MouseScrollUnit::Line => event.y * ZOOM_SENSITIVITY_LINE,
            MouseScrollUnit::Pixel => event.y * ZOOM_SENSITIVITY_PIXEL,
        };
        state.zoom(amount);
    }

    for event in pinch_events.read() {
        state.zoom(event.0);
    }
}

fn apply_orbit_transform(
    state: Option<Res<OrbitCameraState>>,
    mut camera_query: Query<&mut Transform, With<MeasureCamera>>,
) {
    let Some(state) = state else {
        return;
    };
    if !state.is_changed() {
        return;
    }
    if let Ok(mut transform) = camera_query.single_mut() {
        *transform = state.transform();
    }
}
