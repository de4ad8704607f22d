//! Role editor: assign each line to "me" or "partner" and record partner
//! lines

use crate::scene::LineId;
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{RichText, ScrollArea, TextEdit, Ui};

enum LineAction {
    AssignMe(LineId),
    AssignPartner(LineId),
    StartRecording(LineId),
    StopRecording,
    Play(LineId),
    BeginEdit(LineId),
    CommitEdit,
    CancelEdit,
}

pub fn show(state: &mut AppState, theme: &Theme, ui: &mut Ui) {
    let Some(scene) = state.current_scene() else {
        state.go_home();
        return;
    };
    let scene = scene.clone();
    let recording_line = state.recording_line();

    let mut go_home = false;
    let mut start = false;
    let mut begin_title = false;
    let mut commit_title = false;
    let mut action: Option<LineAction> = None;

    ui.horizontal(|ui| {
        if ui.button("← Menu").clicked() {
            go_home = true;
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .button(RichText::new("START 🎬").size(16.0).color(theme.primary))
                .clicked()
            {
                start = true;
            }
        });
    });

    ui.vertical_centered(|ui| {
        if state.editing_title {
            let response = ui.add(
                TextEdit::singleline(&mut state.title_buffer).desired_width(280.0),
            );
            if response.lost_focus() {
                commit_title = true;
            }
        } else if ui
            .label(
                RichText::new(&scene.title)
                    .size(20.0)
                    .strong()
                    .color(theme.text_primary),
            )
            .on_hover_text("Click to rename")
            .clicked()
        {
            begin_title = true;
        }
        ui.label(
            RichText::new("Assign the roles and record your partner's lines")
                .small()
                .color(theme.text_muted),
        );
    });

    ui.add_space(theme.spacing);

    ScrollArea::vertical().show(ui, |ui| {
        for line in &scene.lines {
            let is_me = line.role.is_me();
            let recorded = line.role.audio().is_some();
            let is_recording = recording_line == Some(line.id);

            egui::Frame::none()
                .fill(if is_me {
                    theme.bg_tertiary
                } else {
                    theme.bg_secondary
                })
                .rounding(theme.card_rounding)
                .inner_margin(theme.spacing)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(
                            RichText::new(&line.character)
                                .strong()
                                .color(if is_me { theme.primary } else { theme.text_secondary }),
                        );
                        if recorded && !is_me {
                            ui.label(
                                RichText::new("● recorded").small().color(theme.success),
                            );
                        }

                        ui.with_layout(
                            egui::Layout::right_to_left(egui::Align::Center),
                            |ui| {
                                if ui.button("✏").on_hover_text("Edit text").clicked() {
                                    action = Some(LineAction::BeginEdit(line.id));
                                }

                                if !is_me {
                                    if is_recording {
                                        if ui
                                            .button(
                                                RichText::new("■ STOP").color(theme.recording),
                                            )
                                            .clicked()
                                        {
                                            action = Some(LineAction::StopRecording);
                                        }
                                    } else {
                                        let label =
                                            if recorded { "RE-RECORD" } else { "RECORD" };
                                        if ui.button(label).clicked() {
                                            action =
                                                Some(LineAction::StartRecording(line.id));
                                        }
                                    }
                                    if recorded
                                        && ui.button("▶").on_hover_text("Listen").clicked()
                                    {
                                        action = Some(LineAction::Play(line.id));
                                    }
                                }
                            },
                        );
                    });

                    ui.horizontal(|ui| {
                        if ui.selectable_label(is_me, "Me").clicked() && !is_me {
                            action = Some(LineAction::AssignMe(line.id));
                        }
                        if ui.selectable_label(!is_me, "Partner").clicked() && is_me {
                            action = Some(LineAction::AssignPartner(line.id));
                        }
                    });

                    if state.editing_line == Some(line.id) {
                        ui.add(
                            TextEdit::multiline(&mut state.line_buffer)
                                .desired_width(f32::INFINITY)
                                .desired_rows(3),
                        );
                        ui.horizontal(|ui| {
                            if ui.button("Save").clicked() {
                                action = Some(LineAction::CommitEdit);
                            }
                            if ui.button("Cancel").clicked() {
                                action = Some(LineAction::CancelEdit);
                            }
                        });
                    } else {
                        ui.label(RichText::new(&line.text).color(theme.text_primary));
                    }
                });
            ui.add_space(theme.spacing_sm);
        }
    });

    if begin_title {
        state.begin_title_edit();
    }
    if commit_title {
        state.commit_title_edit();
    }
    if let Some(action) = action {
        match action {
            LineAction::AssignMe(id) => state.assign_line_to_me(id),
            LineAction::AssignPartner(id) => state.assign_line_to_partner(id),
            LineAction::StartRecording(id) => state.start_recording(id),
            LineAction::StopRecording => state.stop_recording(),
            LineAction::Play(id) => state.play_line(id),
            LineAction::BeginEdit(id) => state.begin_line_edit(id),
            LineAction::CommitEdit => state.commit_line_edit(),
            LineAction::CancelEdit => state.cancel_line_edit(),
        }
    }
    if start {
        if let Some(id) = state.current_scene_id() {
            state.start_rehearsal(id);
        }
    }
    if go_home {
        state.go_home();
    }
}
