use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_egui::EguiPlugin;

mod camera;
mod config;
#[cfg(feature = "inspector")]
mod inspector;
mod keyboard;
mod measurement;
mod paths;
mod scene;
mod surface;
mod theme;
mod ui;
mod units;

use camera::CameraPlugin;
use config::ConfigPlugin;
use keyboard::KeyboardPlugin;
use measurement::MeasurementPlugin;
use surface::SurfacePlugin;

/// Default log filter; `RUST_LOG` overrides it.
const LOG_FILTER: &str = "info,wgpu=error,naga=warn";

fn main() {
    let mut app = App::new();
    app.add_plugins((
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Plane Measure".to_string(),
                    resolution: (1280, 720).into(),
                    ..default()
                }),
                ..default()
            })
            .set(LogPlugin {
                filter: LOG_FILTER.to_string(),
                ..default()
            }),
        EguiPlugin::default(),
        ConfigPlugin,
        SurfacePlugin,
        CameraPlugin,
        MeasurementPlugin,
        KeyboardPlugin,
    ));

    #[cfg(feature = "inspector")]
    app.add_plugins((
        bevy_inspector_egui::DefaultInspectorConfigPlugin,
        inspector::InspectorPlugin,
    ));

    app.run();
}
