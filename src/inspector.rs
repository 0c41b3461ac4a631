/// ECS Inspector window using bevy-inspector-egui.
///
/// Floating egui window with live views of the measurement resources,
/// every entity (markers, connector, detected planes) and all resources.
/// Rendered by an exclusive system that requires &mut World access.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContext};
use bevy_inspector_egui::bevy_inspector;

use crate::camera::OrbitCameraState;
use crate::measurement::InputRouter;
use crate::ui::MeasurementLabel;

/// Resource controlling inspector window visibility.
#[derive(Resource, Default)]
pub struct InspectorState {
    pub open: bool,
}

pub struct InspectorPlugin;

impl Plugin for InspectorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InspectorState>()
            .add_systems(bevy_egui::EguiPrimaryContextPass, render_inspector_window);
    }
}

/// Exclusive system that renders the inspector window.
///
/// Must be exclusive because `bevy_inspector` functions require `&mut World`.
pub fn render_inspector_window(world: &mut World) {
    let open = world
        .get_resource::<InspectorState>()
        .is_some_and(|state| state.open);

    if !open {
        return;
    }

    // Clone the egui context so we can release the world borrow
    let mut egui_context = match world
        .query_filtered::<&mut EguiContext, With<bevy_egui::PrimaryEguiContext>>()
        .single(world)
    {
        Ok(context) => context.clone(),
        Err(e) => {
            warn!("Inspector open but no primary egui context: {}", e);
            return;
        }
    };

    let ctx = egui_context.get_mut();

    egui::Window::new("Inspector")
        .default_size([360.0, 420.0])
        .resizable(true)
        .collapsible(true)
        .show(ctx, |ui: &mut egui::Ui| {
            egui::ScrollArea::both().show(ui, |ui: &mut egui::Ui| {
                egui::CollapsingHeader::new("Measurement")
                    .default_open(true)
                    .show(ui, |ui: &mut egui::Ui| {
                        ui.label("InputRouter");
                        bevy_inspector::ui_for_resource::<InputRouter>(world, ui);
                        ui.separator();

                        ui.label("MeasurementLabel");
                        bevy_inspector::ui_for_resource::<MeasurementLabel>(world, ui);
                        ui.separator();

                        ui.label("OrbitCameraState");
                        bevy_inspector::ui_for_resource::<OrbitCameraState>(world, ui);
                    });

                ui.separator();

                egui::CollapsingHeader::new("Entities")
                    .default_open(false)
                    .show(ui, |ui: &mut egui::Ui| {
                        bevy_inspector::ui_for_entities(world, ui);
                    });

                ui.separator();

                egui::CollapsingHeader::new("Resources")
                    .default_open(false)
                    .show(ui, |ui: &mut egui::Ui| {
                        bevy_inspector::ui_for_resources(world, ui);
                    });
            });
        });
}
