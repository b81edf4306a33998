//! Theme for the temperature monitor window
//!
//! A light, compact look close to a classic toolkit window: small body text,
//! solid coloured action buttons with white bold labels.

use egui::{Color32, FontFamily, FontId, Style, TextStyle, Visuals};

/// Colour palette
pub struct MonitorColors;

impl MonitorColors {
    /// Start button fill
    pub const BROWN: Color32 = Color32::from_rgb(165, 42, 42);
    /// Close button fill
    pub const RED: Color32 = Color32::from_rgb(255, 0, 0);
    pub const BUTTON_TEXT: Color32 = Color32::WHITE;

    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(20, 20, 20);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(110, 110, 110);
    pub const ERROR: Color32 = Color32::from_rgb(200, 30, 30);
    pub const DIVIDER: Color32 = Color32::from_rgb(60, 60, 60);
}

/// Apply the monitor theme to the egui context
pub fn apply_monitor_theme(ctx: &egui::Context) {
    let mut style = Style::default();

    let mut visuals = Visuals::light();
    visuals.override_text_color = Some(MonitorColors::TEXT_PRIMARY);
    visuals.widgets.noninteractive.fg_stroke.color = MonitorColors::DIVIDER;
    style.visuals = visuals;

    style.text_styles = [
        (
            TextStyle::Small,
            FontId::new(10.0, FontFamily::Proportional),
        ),
        (TextStyle::Body, FontId::new(13.0, FontFamily::Proportional)),
        (
            TextStyle::Button,
            FontId::new(12.0, FontFamily::Proportional),
        ),
        (
            TextStyle::Heading,
            FontId::new(16.0, FontFamily::Proportional),
        ),
        (
            TextStyle::Monospace,
            FontId::new(12.0, FontFamily::Monospace),
        ),
    ]
    .into();

    style.spacing.item_spacing = egui::vec2(6.0, 6.0);
    style.spacing.button_padding = egui::vec2(8.0, 3.0);

    ctx.set_style(style);
}
