use bevy::prelude::*;

use crate::config::AppConfig;
use crate::measurement::{MeasurementResult, Point3D, SceneDisplay};
use crate::theme::AppTheme;

/// Marker for every entity spawned to visualise a measurement.
#[derive(Component)]
pub struct MeasurementVisual;

/// Shared meshes and materials for markers and the connector.
#[derive(Resource)]
pub struct MeasurementAssets {
    pub marker_mesh: Handle<Mesh>,
    pub marker_material: Handle<StandardMaterial>,
    /// Unit cube; scaled per connector by its transform.
    pub connector_mesh: Handle<Mesh>,
    pub connector_material: Handle<StandardMaterial>,
    pub connector_thickness: f32,
}

/// Startup system that builds [`MeasurementAssets`] from config and theme.
pub fn setup_measurement_assets(
    mut commands: Commands,
    config: Res<AppConfig>,
    theme: Res<AppTheme>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let marker_material = materials.add(StandardMaterial {
        base_color: theme.marker(),
        metallic: 0.0,
        ..default()
    });
    let connector_material = materials.add(StandardMaterial {
        base_color: theme.connector(),
        metallic: 0.0,
        ..default()
    });

    commands.insert_resource(MeasurementAssets {
        marker_mesh: meshes.add(Sphere::new(config.measurement.marker_radius)),
        marker_material,
        connector_mesh: meshes.add(Cuboid::new(1.0, 1.0, 1.0)),
        connector_material,
        connector_thickness: config.measurement.connector_thickness,
    });
}

/// [`SceneDisplay`] that spawns and despawns entities through `Commands`.
///
/// Built without assets it can still clear, but placing anything is
/// skipped with a warning.
pub struct SceneCommands<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    assets: Option<&'a MeasurementAssets>,
    /// Visuals that existed when this adapter was built.
    existing: Vec<Entity>,
}

impl<'a, 'w, 's> SceneCommands<'a, 'w, 's> {
    pub fn new(
        commands: &'a mut Commands<'w, 's>,
        assets: &'a MeasurementAssets,
        existing: Vec<Entity>,
    ) -> Self {
        Self {
            commands,
            assets: Some(assets),
            existing,
        }
    }

    /// Adapter that only knows how to remove `existing`.
    pub fn clear_only(commands: &'a mut Commands<'w, 's>, existing: Vec<Entity>) -> Self {
        Self {
            commands,
            assets: None,
            existing,
        }
    }
}

impl SceneDisplay for SceneCommands<'_, '_, '_> {
    fn place_marker(&mut self, at: Point3D) {
        let Some(assets) = self.assets else {
            warn!("Measurement assets missing, marker at {:?} not drawn", at);
            return;
        };
        let entity = self
            .commands
            .spawn((
                Name::new("Measurement marker"),
                Mesh3d(assets.marker_mesh.clone()),
                MeshMaterial3d(assets.marker_material.clone()),
                Transform::from_translation(at),
                MeasurementVisual,
            ))
            .id();
        self.existing.push(entity);
    }

    fn place_connector(&mut self, from: Point3D, to: Point3D, length: f32) {
        let Some(assets) = self.assets else {
            warn!("Measurement assets missing, connector not drawn");
            return;
        };
        let placement = MeasurementResult::between(from, to);
        if (placement.distance - length).abs() > 1e-3 {
            warn!("Connector length {} disagrees with endpoints ({})", length, placement.distance);
        }

        let entity = self
            .commands
            .spawn((
                Name::new("Measurement connector"),
                Mesh3d(assets.connector_mesh.clone()),
                MeshMaterial3d(assets.connector_material.clone()),
                placement.connector_transform(assets.connector_thickness),
                MeasurementVisual,
            ))
            .id();
        self.existing.push(entity);
    }

    fn clear_all(&mut self) {
        for entity in self.existing.drain(..) {
            if let Ok(mut ec) = self.commands.get_entity(entity) {
                ec.despawn();
            }
        }
    }
}
