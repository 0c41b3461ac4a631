use bevy::prelude::*;
use bevy_egui::EguiContexts;

use super::router::InputRouter;
use crate::config::AppConfig;
use crate::scene::{MeasurementAssets, MeasurementVisual, SceneCommands};
use crate::surface::{DetectedPlane, MeasureCamera, PlaneRaycaster, PlaneSurface};
use crate::ui::MeasurementLabel;

// =============================================================================
// Messages
// =============================================================================

/// A tap (click or touch start) at a viewport position.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct TapMessage {
    pub screen_point: Vec2,
}

/// Request to clear the current measurement.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct ResetMessage;

// =============================================================================
// Systems
// =============================================================================

/// Emit a [`TapMessage`] for each left click or new touch that is not
/// aimed at the UI.
pub fn emit_taps(
    mouse_button: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    window_query: Query<&Window>,
    mut contexts: EguiContexts,
    mut taps: MessageWriter<TapMessage>,
) {
    // Clicks on the measurement bar belong to egui
    if let Ok(ctx) = contexts.ctx_mut() {
        if ctx.wants_pointer_input() || ctx.is_pointer_over_area() {
            return;
        }
    }

    if mouse_button.just_pressed(MouseButton::Left) {
        if let Ok(window) = window_query.single() {
            if let Some(cursor) = window.cursor_position() {
                taps.write(TapMessage { screen_point: cursor });
            }
        }
    }

    for touch in touches.iter_just_pressed() {
        taps.write(TapMessage {
            screen_point: touch.position(),
        });
    }
}

/// Feed queued taps through the router in arrival order.
pub fn route_taps(
    mut taps: MessageReader<TapMessage>,
    mut router: ResMut<InputRouter>,
    mut label: ResMut<MeasurementLabel>,
    mut commands: Commands,
    config: Res<AppConfig>,
    assets: Option<Res<MeasurementAssets>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MeasureCamera>>,
    plane_query: Query<(&DetectedPlane, &GlobalTransform)>,
    visual_query: Query<Entity, With<MeasurementVisual>>,
) {
    if taps.is_empty() {
        return;
    }

    let Some(assets) = assets else {
        taps.clear();
        return;
    };

    let Ok((camera, camera_transform)) = camera_query.single() else {
        warn!("No measurement camera, dropping {} taps", taps.len());
        taps.clear();
        return;
    };

    let planes: Vec<PlaneSurface> = plane_query
        .iter()
        .filter_map(|(plane, transform)| PlaneSurface::from_entity(plane, transform))
        .collect();
    let surface = PlaneRaycaster::new(
        camera,
        camera_transform,
        planes,
        config.measurement.plane_target,
    );
    let mut display = SceneCommands::new(&mut commands, &assets, visual_query.iter().collect());

    for tap in taps.read() {
        router.handle_tap(tap.screen_point, &surface, &mut display, &mut *label);
    }
}

/// Apply pending [`ResetMessage`]s. Several in one frame collapse into one.
pub fn apply_resets(
    mut resets: MessageReader<ResetMessage>,
    mut router: ResMut<InputRouter>,
    mut label: ResMut<MeasurementLabel>,
    mut commands: Commands,
    assets: Option<Res<MeasurementAssets>>,
    visual_query: Query<Entity, With<MeasurementVisual>>,
) {
    if resets.is_empty() {
        return;
    }
    resets.clear();

    let existing = visual_query.iter().collect();
    let mut display = match assets.as_deref() {
        Some(assets) => SceneCommands::new(&mut commands, assets, existing),
        None => SceneCommands::clear_only(&mut commands, existing),
    };
    router.reset(&mut display, &mut *label);
}
