use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::measurement::ResetMessage;

/// System to handle keyboard shortcuts
pub fn handle_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut resets: MessageWriter<ResetMessage>,
    mut contexts: EguiContexts,
) {
    // Check if egui wants keyboard input (e.g., typing in an inspector field)
    if let Ok(ctx) = contexts.ctx_mut() {
        if ctx.wants_keyboard_input() {
            return;
        }
    }

    if reset_requested(&keyboard) {
        resets.write(ResetMessage);
    }
}

/// R or Escape - Reset measurement
pub fn reset_requested(keyboard: &ButtonInput<KeyCode>) -> bool {
    keyboard.any_just_pressed([KeyCode::KeyR, KeyCode::Escape])
}

/// F12 - Toggle the ECS inspector window
#[cfg(feature = "inspector")]
pub fn toggle_inspector(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut inspector: ResMut<crate::inspector::InspectorState>,
) {
    if keyboard.just_pressed(KeyCode::F12) {
        inspector.open = !inspector.open;
    }
}

pub struct KeyboardPlugin;

impl Plugin for KeyboardPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            handle_keyboard_shortcuts.before(crate::measurement::apply_resets),
        );
        #[cfg(feature = "inspector")]
        app.add_systems(Update, toggle_inspector);
    }
}
