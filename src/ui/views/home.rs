//! Home view: app header, main actions, and the saved scene list

use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{RichText, ScrollArea, Ui};

pub fn show(state: &mut AppState, theme: &Theme, ui: &mut Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(theme.spacing_lg);
        ui.label(
            RichText::new("Cueline")
                .size(36.0)
                .strong()
                .color(theme.primary),
        );
        ui.label(
            RichText::new("Your personal rehearsal partner")
                .color(theme.text_muted),
        );
        ui.add_space(theme.spacing_lg);
    });

    ui.horizontal(|ui| {
        if ui
            .button(RichText::new("🎭 New scene").size(18.0))
            .clicked()
        {
            state.open_new_scene();
        }
        if ui.button(RichText::new("📖 How it works").size(18.0)).clicked() {
            state.open_help();
        }
        if ui.button(RichText::new("☕ Support").size(18.0)).clicked() {
            state.open_donate();
        }
    });

    ui.add_space(theme.spacing);
    ui.separator();

    ui.horizontal(|ui| {
        ui.label(
            RichText::new("Your scenes")
                .size(20.0)
                .strong()
                .color(theme.text_primary),
        );
        if !state.store.is_empty() {
            ui.label(
                RichText::new(format!("{} total", state.store.len()))
                    .small()
                    .color(theme.text_muted),
            );
        }
    });

    if state.store.is_empty() {
        ui.add_space(theme.spacing_lg);
        ui.vertical_centered(|ui| {
            ui.label(RichText::new("No scenes yet.").color(theme.text_muted));
            ui.label(
                RichText::new("Start by pasting a script under \"New scene\".")
                    .small()
                    .color(theme.text_muted),
            );
        });
        return;
    }

    // Collect card actions first; the scene list borrows the store
    let mut rehearse = None;
    let mut settings = None;
    let mut delete = None;

    ScrollArea::vertical().show(ui, |ui| {
        for scene in state.store.scenes() {
            egui::Frame::none()
                .fill(theme.bg_secondary)
                .rounding(theme.card_rounding)
                .inner_margin(theme.spacing)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.vertical(|ui| {
                            ui.label(
                                RichText::new(&scene.title)
                                    .size(18.0)
                                    .strong()
                                    .color(theme.text_primary),
                            );
                            ui.label(
                                RichText::new(format!(
                                    "{} lines · {}",
                                    scene.lines.len(),
                                    scene.created_at.format("%Y-%m-%d")
                                ))
                                .small()
                                .color(theme.text_muted),
                            );
                        });

                        ui.with_layout(
                            egui::Layout::right_to_left(egui::Align::Center),
                            |ui| {
                                if ui
                                    .button(RichText::new("🗑").color(theme.error))
                                    .on_hover_text("Delete scene")
                                    .clicked()
                                {
                                    delete = Some(scene.id);
                                }
                                if ui
                                    .button("⚙")
                                    .on_hover_text("Roles and recordings")
                                    .clicked()
                                {
                                    settings = Some(scene.id);
                                }
                                if ui
                                    .button(RichText::new("▶ Rehearse").color(theme.primary))
                                    .clicked()
                                {
                                    rehearse = Some(scene.id);
                                }
                            },
                        );
                    });
                });
            ui.add_space(theme.spacing_sm);
        }
    });

    if let Some(id) = rehearse {
        state.start_rehearsal(id);
    }
    if let Some(id) = settings {
        state.open_scene_settings(id);
    }
    if let Some(id) = delete {
        state.request_delete(id);
    }
}
