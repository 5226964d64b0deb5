use eframe::egui;

pub const TITLE_COLOR: egui::Color32 = egui::Color32::from_rgb(0x2c, 0x3e, 0x50);
pub const EDIT_BUTTON_FILL: egui::Color32 = egui::Color32::from_rgb(0xff, 0xc1, 0x07);
pub const DELETE_BUTTON_FILL: egui::Color32 = egui::Color32::from_rgb(0xdc, 0x35, 0x45);
pub const ROW_BUTTON_TEXT: egui::Color32 = egui::Color32::WHITE;

/// Light visuals on a white background with a little more breathing room.
pub fn apply(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::light();
    visuals.panel_fill = egui::Color32::WHITE;
    visuals.window_fill = egui::Color32::WHITE;
    ctx.set_visuals(visuals);

    ctx.style_mut(|style| {
        style.spacing.item_spacing = egui::vec2(8.0, 10.0);
        style.spacing.button_padding = egui::vec2(8.0, 5.0);
    });
}
