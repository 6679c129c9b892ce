//! Login screen shown while no session exists.

use eframe::egui::{self, CornerRadius, Key, Margin, RichText, Ui};
use egui_phosphor::regular::SIGN_IN;

use super::app::App;
use super::components::{colors, primary_button_with_icon};

pub fn show(app: &mut App, ui: &mut Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(80.0);
        ui.label(RichText::new("BINGO Retail").size(32.0).strong());
        ui.add_space(5.0);
        ui.label(RichText::new("Bitte melden Sie sich an").size(14.0).weak());
        ui.add_space(30.0);

        egui::Frame::new()
            .fill(ui.style().visuals.extreme_bg_color)
            .inner_margin(Margin::same(25))
            .corner_radius(CornerRadius::same(8))
            .show(ui, |ui| {
                ui.set_max_width(320.0);

                let mut submit = false;
                egui::Grid::new("login_grid")
                    .num_columns(2)
                    .spacing([15.0, 12.0])
                    .show(ui, |ui| {
                        ui.label("Mitarbeiter-ID:");
                        ui.add(
                            egui::TextEdit::singleline(&mut app.login_form.employee_id)
                                .desired_width(180.0)
                                .hint_text("z.B. 1001"),
                        );
                        ui.end_row();

                        ui.label("Passwort:");
                        let response = ui.add(
                            egui::TextEdit::singleline(&mut app.login_form.password)
                                .password(true)
                                .desired_width(180.0),
                        );
                        if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
                            submit = true;
                        }
                        ui.end_row();
                    });

                ui.add_space(15.0);

                if let Some(error) = &app.login_error {
                    ui.colored_label(colors::ERROR, error);
                    ui.add_space(10.0);
                }

                ui.add_enabled_ui(!app.is_logging_in, |ui| {
                    if primary_button_with_icon(ui, SIGN_IN, "Anmelden").clicked() {
                        submit = true;
                    }
                });

                if app.is_logging_in {
                    ui.add_space(8.0);
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Anmeldung läuft...");
                    });
                }

                if submit && !app.is_logging_in {
                    app.login();
                }
            });

        ui.add_space(20.0);
        ui.label(RichText::new(format!("Server: {}", app.api.base_url())).small().weak());
    });
}
