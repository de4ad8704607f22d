//! Rehearsal view: the prompter itself
//!
//! Displays the current line full-screen; navigation is entirely self-paced.

use crate::prompter::Cue;
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{ProgressBar, RichText, ScrollArea, Ui};

pub fn show(state: &mut AppState, theme: &Theme, ui: &mut Ui) {
    let Some(scene) = state.current_scene() else {
        state.go_home();
        return;
    };
    let scene = scene.clone();
    let Some(line) = scene.lines.get(state.prompter.cursor()) else {
        state.go_home();
        return;
    };

    let cue = state.prompter.cue(&scene);
    let is_me = line.role.is_me();
    let is_first = state.prompter.is_first();
    let is_last = state.prompter.is_last(&scene);

    let mut settings = false;
    let mut restart = false;
    let mut back = false;
    let mut next = false;

    ui.add(
        ProgressBar::new(state.prompter.progress(&scene))
            .desired_height(4.0)
            .fill(theme.primary),
    );

    ui.horizontal(|ui| {
        if ui.button("SETTINGS").clicked() {
            settings = true;
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("RESTART").clicked() {
                restart = true;
            }
        });
    });

    ui.vertical_centered(|ui| {
        ui.label(
            RichText::new(format!(
                "{} / {}",
                state.prompter.cursor() + 1,
                scene.lines.len()
            ))
            .color(theme.text_muted),
        );
    });

    ui.add_space(theme.spacing_lg);

    ScrollArea::vertical()
        .max_height(ui.available_height() - 80.0)
        .show(ui, |ui| {
            ui.vertical_centered(|ui| {
                let turn_hint = if is_me { "YOUR TURN" } else { "LISTEN" };
                ui.label(
                    RichText::new(format!("{} · {}", line.character, turn_hint))
                        .small()
                        .strong()
                        .color(if is_me { theme.primary } else { theme.text_muted }),
                );
                ui.add_space(theme.spacing);

                let text = RichText::new(&line.text).size(32.0);
                ui.label(if is_me {
                    text.strong().color(theme.text_primary)
                } else {
                    text.italics().color(theme.text_muted)
                });

                if matches!(cue, Some(Cue::Unrecorded)) {
                    ui.add_space(theme.spacing);
                    ui.label(
                        RichText::new("⚠ Partner audio not recorded")
                            .color(theme.warning),
                    );
                }
            });
        });

    ui.with_layout(egui::Layout::bottom_up(egui::Align::Center), |ui| {
        ui.add_space(theme.spacing);
        ui.horizontal(|ui| {
            let half = ui.available_width() / 2.0 - theme.spacing_sm;
            if ui
                .add_enabled(
                    !is_first,
                    egui::Button::new(RichText::new("← BACK").size(20.0))
                        .min_size(egui::vec2(half, 56.0)),
                )
                .clicked()
            {
                back = true;
            }
            let forward = if is_last { "FINISH" } else { "NEXT →" };
            if ui
                .add(
                    egui::Button::new(RichText::new(forward).size(20.0))
                        .fill(theme.primary)
                        .min_size(egui::vec2(half, 56.0)),
                )
                .clicked()
            {
                next = true;
            }
        });
    });

    if settings {
        state.rehearsal_settings();
    }
    if restart {
        state.rehearsal_restart();
    }
    if back {
        state.rehearsal_retreat();
    }
    if next {
        state.rehearsal_advance();
    }
}
