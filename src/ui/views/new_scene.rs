//! New-scene view: paste a script and send it for segmentation

use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{RichText, ScrollArea, TextEdit, Ui};

pub fn show(state: &mut AppState, theme: &Theme, ui: &mut Ui) {
    if ui.button("← Back to menu").clicked() {
        state.go_home();
        return;
    }

    ui.add_space(theme.spacing);
    ui.heading("New script");
    ui.label(
        RichText::new(
            "Paste your scene text. The characters and their lines are \
             recognized automatically.",
        )
        .color(theme.text_muted),
    );
    ui.add_space(theme.spacing);

    ScrollArea::vertical()
        .max_height(ui.available_height() - 80.0)
        .show(ui, |ui| {
            ui.add_enabled(
                !state.is_segmenting(),
                TextEdit::multiline(&mut state.input_text)
                    .hint_text("HERO: Hello!\nPARTNER: Good to see you.")
                    .font(egui::TextStyle::Monospace)
                    .desired_width(f32::INFINITY)
                    .desired_rows(18),
            );
        });

    ui.add_space(theme.spacing);

    let can_submit = !state.is_segmenting() && !state.input_text.trim().is_empty();
    let label = if state.is_segmenting() {
        "Parsing script…"
    } else {
        "Create project 🎭"
    };

    if ui
        .add_enabled(can_submit, egui::Button::new(RichText::new(label).size(18.0)))
        .clicked()
    {
        state.submit_script();
    }
    if state.is_segmenting() {
        ui.spinner();
    }
}
