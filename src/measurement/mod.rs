mod router;
mod session;
mod systems;

pub use router::*;
pub use session::*;
pub use systems::*;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::scene::setup_measurement_assets;
use crate::ui::{render_measurement_bar, MeasurementLabel};

pub struct MeasurementPlugin;

impl Plugin for MeasurementPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<TapMessage>()
            .add_message::<ResetMessage>()
            .init_resource::<InputRouter>()
            .init_resource::<MeasurementLabel>()
            .add_systems(Startup, setup_measurement_assets)
            .add_systems(Update, (emit_taps, apply_resets, route_taps).chain())
            .add_systems(EguiPrimaryContextPass, render_measurement_bar);
    }
}
