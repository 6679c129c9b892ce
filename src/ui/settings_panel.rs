//! Settings panel for server, kassa and UI configuration, plus the
//! password change dialog.

use eframe::egui::{self, RichText};
use egui_phosphor::regular::{FLOPPY_DISK, KEY, PLUG};

use super::app::App;
use super::components::{back_button, colors, dialog_footer, panel_header, primary_button_with_icon, styled_button_with_icon};
use crate::config::AppConfig;

/// Show the settings panel.
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut egui::Ui) -> bool {
    let go_back = back_button(ui);
    panel_header(ui, "Einstellungen");

    egui::ScrollArea::vertical().show(ui, |ui| {
        // Server
        ui.group(|ui| {
            ui.heading("Server");
            ui.add_space(5.0);

            egui::Grid::new("server_settings_grid")
                .num_columns(2)
                .spacing([10.0, 8.0])
                .show(ui, |ui| {
                    ui.label("API-Adresse:");
                    if ui
                        .add(egui::TextEdit::singleline(&mut app.settings_draft.server.base_url).desired_width(320.0))
                        .changed()
                    {
                        app.server_test = None;
                    }
                    ui.end_row();

                    ui.label("Timeout (Sekunden):");
                    let mut timeout = app.settings_draft.server.timeout_secs.to_string();
                    if ui.text_edit_singleline(&mut timeout).changed()
                        && let Ok(secs) = timeout.trim().parse()
                    {
                        app.settings_draft.server.timeout_secs = secs;
                    }
                    ui.end_row();
                });

            ui.add_space(5.0);

            ui.horizontal(|ui| {
                ui.add_enabled_ui(!app.server_testing, |ui| {
                    if styled_button_with_icon(ui, PLUG, "Verbindung testen").clicked() {
                        app.test_server_connection();
                    }
                });

                if app.server_testing {
                    ui.spinner();
                }
                match &app.server_test {
                    Some(Ok(())) => {
                        ui.label(RichText::new("Verbunden").color(colors::SUCCESS));
                    }
                    Some(Err(e)) => {
                        ui.label(RichText::new(format!("Fehlgeschlagen: {e}")).color(colors::ERROR));
                    }
                    None => {}
                }
            });
        });

        ui.add_space(15.0);

        // Kassa
        ui.group(|ui| {
            ui.heading("Kasse");
            ui.add_space(5.0);

            let kassa = &mut app.settings_draft.kassa;
            ui.checkbox(&mut kassa.group_items, "Gleiche Artikel zusammenfassen");
            ui.checkbox(&mut kassa.show_numpad, "Numpad anzeigen");
            ui.horizontal(|ui| {
                ui.label("Währung:");
                ui.add(egui::TextEdit::singleline(&mut kassa.currency).desired_width(60.0));
            });
        });

        ui.add_space(15.0);

        // UI
        ui.group(|ui| {
            ui.heading("Oberfläche");
            ui.add_space(5.0);
            ui.checkbox(&mut app.settings_draft.ui.dark_mode, "Dunkles Design");
        });

        ui.add_space(15.0);

        // Account
        ui.group(|ui| {
            ui.heading("Konto");
            ui.add_space(5.0);
            if styled_button_with_icon(ui, KEY, "Passwort ändern").clicked() {
                app.password_form.reset();
                app.password_form.is_open = true;
                app.form_error = None;
            }
        });

        ui.add_space(20.0);

        if let Some(error) = &app.form_error
            && !app.password_form.is_open
        {
            ui.colored_label(colors::ERROR, error);
            ui.add_space(10.0);
        }

        // Action buttons
        ui.horizontal(|ui| {
            let modified = app.settings_draft != app.config;
            ui.add_enabled_ui(modified, |ui| {
                if primary_button_with_icon(ui, FLOPPY_DISK, "Speichern").clicked() {
                    app.save_settings();
                }
            });

            if modified {
                ui.label(RichText::new("(ungespeicherte Änderungen)").color(colors::WARNING).italics());
            }

            if ui.button("Standardwerte").clicked() {
                let session = app.settings_draft.session.clone();
                app.settings_draft = AppConfig {
                    session,
                    ..AppConfig::default()
                };
                app.server_test = None;
            }
        });

        ui.add_space(10.0);
        ui.label(
            RichText::new(format!("Konfigurationsdatei: {}", app.config_path.display()))
                .small()
                .weak(),
        );
    });

    go_back
}

/// Own password change, reachable from the menu bar and the settings panel.
pub fn show_password_dialog(app: &mut App, ctx: &egui::Context) {
    egui::Window::new("Passwort ändern")
        .collapsible(false)
        .resizable(false)
        .default_width(380.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);

            let form = &mut app.password_form;
            egui::Grid::new("password_form_grid")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .show(ui, |ui| {
                    ui.label("Altes Passwort:");
                    ui.add(egui::TextEdit::singleline(&mut form.old_password).password(true));
                    ui.end_row();

                    ui.label("Neues Passwort:");
                    ui.add(egui::TextEdit::singleline(&mut form.new_password).password(true));
                    ui.end_row();

                    ui.label("Wiederholen:");
                    ui.add(egui::TextEdit::singleline(&mut form.confirm_password).password(true));
                    ui.end_row();
                });

            ui.add_space(5.0);
            ui.weak("Mindestens 8 Zeichen mit Groß- und Kleinbuchstaben und einer Zahl");

            let error = app.form_error.clone();
            dialog_footer(ui, error.as_deref(), |save| {
                if save {
                    app.change_password();
                } else {
                    app.password_form.reset();
                    app.form_error = None;
                }
            });
        });
}
