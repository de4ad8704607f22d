//! Help view: how the app works, with support links

use crate::ui::app::TELEGRAM_URL;
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{OpenUrl, RichText, ScrollArea, Ui};

const STEPS: [(&str, &str, &str); 3] = [
    (
        "01",
        "Create and edit",
        "Paste your text on the main page. Characters are recognized \
         automatically; if the parser gets something wrong you can edit a \
         character name or a line right in the scene settings.",
    ),
    (
        "02",
        "Assign the roles",
        "For every line, choose WHO speaks it. Lines marked \"Me\" are \
         simply shown on screen. \"Partner\" lines should be recorded — the \
         prompter plays them back automatically.",
    ),
    (
        "03",
        "Your own pace",
        "During rehearsal you drive the pace. Press NEXT and the partner \
         line plays. Long monologue? Just scroll. No rush, only the work.",
    ),
];

pub fn show(state: &mut AppState, theme: &Theme, ui: &mut Ui) {
    let mut back = false;
    let mut donate = false;

    ui.horizontal(|ui| {
        if ui.button("← Back").clicked() {
            back = true;
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Support ☕").clicked() {
                donate = true;
            }
        });
    });

    ui.add_space(theme.spacing);
    ui.vertical_centered(|ui| {
        ui.heading("How it works 🎬");
    });
    ui.add_space(theme.spacing);

    ScrollArea::vertical().show(ui, |ui| {
        for (num, title, desc) in STEPS {
            egui::Frame::none()
                .fill(theme.bg_secondary)
                .rounding(theme.card_rounding)
                .inner_margin(theme.spacing)
                .show(ui, |ui| {
                    ui.label(RichText::new(num).strong().color(theme.primary));
                    ui.label(
                        RichText::new(title)
                            .size(18.0)
                            .strong()
                            .color(theme.text_primary),
                    );
                    ui.label(RichText::new(desc).color(theme.text_secondary));
                });
            ui.add_space(theme.spacing_sm);
        }

        ui.add_space(theme.spacing);
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new("\"Your voice is your best partner.\"")
                    .italics()
                    .color(theme.text_secondary),
            );
            ui.add_space(theme.spacing_sm);
            if ui.button("Telegram channel").clicked() {
                ui.ctx().open_url(OpenUrl::new_tab(TELEGRAM_URL));
            }
        });
    });

    if donate {
        state.open_donate();
    }
    if back {
        state.go_home();
    }
}
