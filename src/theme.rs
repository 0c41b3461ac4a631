use bevy::prelude::*;
use bevy_egui::egui;
use catppuccin::FlavorName;

use crate::surface::PlaneAlignment;

/// Convert a catppuccin color to a bevy Color via its RGB values.
fn cat_to_bevy(c: &catppuccin::Color) -> Color {
    Color::srgb(
        c.rgb.r as f32 / 255.0,
        c.rgb.g as f32 / 255.0,
        c.rgb.b as f32 / 255.0,
    )
}

/// Central theme resource for the application.
///
/// Wraps a catppuccin flavor and maps it onto the few roles the scene and
/// the measurement bar need.
#[derive(Resource, Debug, Clone, Copy)]
pub struct AppTheme {
    active_flavor: FlavorName,
}

impl Default for AppTheme {
    fn default() -> Self {
        Self {
            active_flavor: FlavorName::Mocha,
        }
    }
}

impl AppTheme {
    /// Theme for a flavor name from config; unknown names fall back to Mocha.
    pub fn from_name(name: &str) -> Self {
        match flavor_from_name(name) {
            Some(active_flavor) => Self { active_flavor },
            None => {
                warn!("Unknown theme flavor '{}', using mocha", name);
                Self::default()
            }
        }
    }

    fn colors(&self) -> &catppuccin::FlavorColors {
        &catppuccin::PALETTE.get_flavor(self.active_flavor).colors
    }

    pub fn mantle(&self) -> Color { cat_to_bevy(&self.colors().mantle) }
    pub fn text(&self) -> Color { cat_to_bevy(&self.colors().text) }
    pub fn subtext0(&self) -> Color { cat_to_bevy(&self.colors().subtext0) }

    /// Start/end point spheres.
    pub fn marker(&self) -> Color { cat_to_bevy(&self.colors().green) }

    /// Bar joining the two points.
    pub fn connector(&self) -> Color { cat_to_bevy(&self.colors().blue) }

    /// Translucent fill for a detected surface.
    pub fn surface_color(&self, alignment: PlaneAlignment) -> Color {
        let c = match alignment {
            PlaneAlignment::Horizontal => &self.colors().surface2,
            PlaneAlignment::Vertical => &self.colors().overlay0,
        };
        cat_to_bevy(c).with_alpha(0.35)
    }
}

pub fn flavor_from_name(name: &str) -> Option<FlavorName> {
    match name.to_ascii_lowercase().as_str() {
        "latte" => Some(FlavorName::Latte),
        "frappe" => Some(FlavorName::Frappe),
        "macchiato" => Some(FlavorName::Macchiato),
        "mocha" => Some(FlavorName::Mocha),
        _ => None,
    }
}

/// Convert a `bevy::color::Color` to `egui::Color32`.
pub fn to_egui_color32(color: Color) -> egui::Color32 {
    let srgba = color.to_srgba();
    egui::Color32::from_rgba_unmultiplied(
        (srgba.red * 255.0) as u8,
        (srgba.green * 255.0) as u8,
        (srgba.blue * 255.0) as u8,
        (srgba.alpha * 255.0) as u8,
    )
}

/// Convert a `bevy::color::Color` to `egui::Color32` with a custom alpha.
pub fn to_egui_color32_alpha(color: Color, alpha: u8) -> egui::Color32 {
    let srgba = color.to_srgba();
    egui::Color32::from_rgba_unmultiplied(
        (srgba.red * 255.0) as u8,
        (srgba.green * 255.0) as u8,
        (srgba.blue * 255.0) as u8,
        alpha,
    )
}
