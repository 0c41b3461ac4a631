/// Bottom measurement bar.
///
/// A read-only button showing the last measured distance next to a Reset
/// button, centred near the bottom edge of the window.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::measurement::{InputRouter, MeasurementReadout, MeasurementSession, ResetMessage};
use crate::theme::{to_egui_color32, to_egui_color32_alpha, AppTheme};
use crate::units::ZERO_READOUT;

/// Distance from the bottom of the window to the bar, in points.
const BAR_BOTTOM_OFFSET: f32 = 60.0;
const BAR_HEIGHT: f32 = 44.0;
const BUTTON_WIDTH: f32 = 140.0;
const BUTTON_SPACING: f32 = 8.0;

/// Text currently shown in the distance button.
#[derive(Resource, Debug, Clone, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct MeasurementLabel {
    pub text: String,
}

impl Default for MeasurementLabel {
    fn default() -> Self {
        Self {
            text: ZERO_READOUT.to_string(),
        }
    }
}

impl MeasurementReadout for MeasurementLabel {
    fn set_text(&mut self, text: String) {
        self.text = text;
    }
}

/// One-line prompt telling the user what the next tap does.
pub fn session_hint(session: &MeasurementSession) -> String {
    match *session {
        MeasurementSession::Empty => "Tap a surface to place the start point".to_string(),
        MeasurementSession::HasStart { start: p } => {
            format!("Start at ({:.2}, {:.2}, {:.2}), tap the end point", p.x, p.y, p.z)
        }
        MeasurementSession::Complete { end: p, .. } => {
            format!("End at ({:.2}, {:.2}, {:.2}), press Reset to measure again", p.x, p.y, p.z)
        }
    }
}

/// Draw the distance readout and Reset button. Returns `true` when Reset
/// was clicked this frame. `highlight_reset` makes Reset stand out once a
/// measurement is finished.
pub fn measurement_bar_ui(
    ui: &mut egui::Ui,
    label: &MeasurementLabel,
    theme: &AppTheme,
    highlight_reset: bool,
) -> bool {
    let mut reset_clicked = false;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = BUTTON_SPACING;
        let size = egui::vec2(BUTTON_WIDTH, BAR_HEIGHT);

        // The readout is a button for looks only; it never takes input.
        ui.add_enabled(
            false,
            egui::Button::new(
                egui::RichText::new(&label.text)
                    .color(to_egui_color32(theme.text()))
                    .strong(),
            )
            .fill(to_egui_color32(theme.connector()))
            .min_size(size),
        );

        let reset = ui.add(
            egui::Button::new(
                egui::RichText::new("Reset").color(to_egui_color32(theme.text())),
            )
            .fill(to_egui_color32_alpha(theme.subtext0(), if highlight_reset { 200 } else { 90 }))
            .min_size(size),
        );
        if reset.clicked() {
            reset_clicked = true;
        }
    });

    reset_clicked
}

/// Render the bar and turn a Reset click into a [`ResetMessage`].
pub fn render_measurement_bar(
    mut contexts: EguiContexts,
    label: Res<MeasurementLabel>,
    router: Res<InputRouter>,
    theme: Res<AppTheme>,
    mut resets: MessageWriter<ResetMessage>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let frame = egui::Frame::NONE
        .fill(to_egui_color32_alpha(theme.mantle(), 200))
        .corner_radius(6.0)
        .inner_margin(egui::Margin::same(6));

    egui::Area::new(egui::Id::new("measurement_bar"))
        .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -BAR_BOTTOM_OFFSET))
        .show(ctx, |ui| {
            frame.show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new(session_hint(router.session()))
                            .small()
                            .color(to_egui_color32(theme.subtext0())),
                    );
                    if measurement_bar_ui(ui, &label, &theme, router.session().is_complete()) {
                        resets.write(ResetMessage);
                    }
                });
            });
        });
}
