//! Main application struct and eframe integration

use crate::ui::state::{AppState, AppView};
use crate::ui::theme::Theme;
use crate::ui::views;
use egui::{CentralPanel, RichText};

/// Outbound donation link, opened in a new context; no data is exchanged
pub const DONATION_URL: &str = "https://tbank.ru/cf/AhDR5Hn9ci3";
/// Author's channel
pub const TELEGRAM_URL: &str = "https://t.me/kisarov_1";

/// Main Cueline application
pub struct CuelineApp {
    /// Application state
    state: AppState,
    /// Visual theme
    theme: Theme,
}

impl CuelineApp {
    /// Create the application and apply the theme
    pub fn new(cc: &eframe::CreationContext<'_>, state: AppState) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        Self { state, theme }
    }

    /// Delete confirmation modal; nothing happens unless the user confirms
    fn show_delete_prompt(&mut self, ctx: &egui::Context) {
        let Some(id) = self.state.pending_delete else {
            return;
        };
        let title = self
            .state
            .store
            .get(id)
            .map(|s| s.title.clone())
            .unwrap_or_default();

        let mut confirmed = false;
        let mut cancelled = false;

        egui::Window::new("Delete scene?")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(format!(
                    "Permanently delete \"{}\"? This cannot be undone.",
                    title
                ));
                ui.add_space(self.theme.spacing_sm);
                ui.horizontal(|ui| {
                    if ui
                        .button(RichText::new("Delete").color(self.theme.error))
                        .clicked()
                    {
                        confirmed = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancelled = true;
                    }
                });
            });

        if confirmed {
            self.state.confirm_delete();
        } else if cancelled {
            self.state.cancel_delete();
        }
    }

    /// Error banner for the last recoverable failure
    fn show_error_banner(&mut self, ui: &mut egui::Ui) {
        let Some(error) = self.state.last_error.clone() else {
            return;
        };
        egui::Frame::none()
            .fill(self.theme.error.gamma_multiply(0.2))
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing_sm)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(error).color(self.theme.error));
                    ui.with_layout(
                        egui::Layout::right_to_left(egui::Align::Center),
                        |ui| {
                            if ui.button("✕").clicked() {
                                self.state.dismiss_error();
                            }
                        },
                    );
                });
            });
        ui.add_space(self.theme.spacing_sm);
    }
}

impl eframe::App for CuelineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Drain pipeline events before rendering
        self.state.poll_events();

        // Keep polling while a segmentation request is outstanding
        if self.state.is_segmenting() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        CentralPanel::default().show(ctx, |ui| {
            self.show_error_banner(ui);

            match self.state.view {
                AppView::Home => views::home::show(&mut self.state, &self.theme, ui),
                AppView::NewScene => views::new_scene::show(&mut self.state, &self.theme, ui),
                AppView::EditRoles => views::edit_roles::show(&mut self.state, &self.theme, ui),
                AppView::Rehearsal => views::rehearsal::show(&mut self.state, &self.theme, ui),
                AppView::Help => views::help::show(&mut self.state, &self.theme, ui),
                AppView::DonateConfirm => views::donate::show(&mut self.state, &self.theme, ui),
            }
        });

        self.show_delete_prompt(ctx);
    }
}
