//! Donation confirmation view
//!
//! Shows the voluntary-donation disclaimer before opening the outbound link.

use crate::ui::app::DONATION_URL;
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{OpenUrl, RichText, Ui};

pub fn show(state: &mut AppState, theme: &Theme, ui: &mut Ui) {
    let mut back = false;

    ui.add_space(theme.spacing_lg);
    ui.vertical_centered(|ui| {
        ui.label(RichText::new("☕").size(48.0));
        ui.heading("Support the project");
    });
    ui.add_space(theme.spacing);

    egui::Frame::none()
        .fill(theme.bg_secondary)
        .rounding(theme.card_rounding)
        .inner_margin(theme.spacing)
        .show(ui, |ui| {
            ui.label(
                RichText::new(
                    "Payments are a voluntary donation to the project's author.",
                )
                .color(theme.text_secondary),
            );
            ui.label(
                RichText::new(
                    "A donation is not a payment for services and creates no \
                     obligations.",
                )
                .color(theme.text_secondary),
            );
        });

    ui.add_space(theme.spacing_lg);
    ui.vertical_centered(|ui| {
        if ui
            .button(RichText::new("SUPPORT THE AUTHOR 🚀").size(18.0))
            .clicked()
        {
            ui.ctx().open_url(OpenUrl::new_tab(DONATION_URL));
            back = true;
        }
        ui.add_space(theme.spacing_sm);
        if ui.button("Go back").clicked() {
            back = true;
        }
    });

    if back {
        state.go_home();
    }
}
