//! First-run setup wizard for configuration.

use crate::config::AppConfig;
use eframe::egui::{self, RichText};
use std::path::PathBuf;
use std::sync::mpsc;

use super::app::test_server_connection;
use super::components::colors;

/// Connection test state.
#[derive(Default, Clone, Debug, PartialEq)]
pub enum ConnectionTestState {
    #[default]
    NotTested,
    Testing,
    Success,
    Failed(String),
}

/// Setup wizard state.
pub struct SetupWizard {
    /// Current step (0-3).
    pub current_step: usize,
    /// Configuration being built.
    pub config: AppConfig,
    /// Backend connection test state.
    pub server_test_state: ConnectionTestState,
    /// Wizard completed flag.
    pub completed: bool,
    /// Timeout input as string for text editing.
    timeout_input: String,
}

impl Default for SetupWizard {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl SetupWizard {
    /// Start from `config`, e.g. the defaults or a partly broken file.
    pub fn new(config: AppConfig) -> Self {
        Self {
            current_step: 0,
            timeout_input: config.server.timeout_secs.to_string(),
            config,
            server_test_state: ConnectionTestState::NotTested,
            completed: false,
        }
    }

    /// Check if user can proceed to next step.
    pub fn can_proceed(&self) -> bool {
        match self.current_step {
            0 => true,
            1 => matches!(self.server_test_state, ConnectionTestState::Success),
            2 => self.config.validate().is_ok(),
            3 => true,
            _ => false,
        }
    }

    /// Any edit of the server settings invalidates an earlier test.
    fn server_changed(&mut self) {
        self.server_test_state = ConnectionTestState::NotTested;
    }

    /// Get step title.
    fn step_title(&self) -> &'static str {
        match self.current_step {
            0 => "Willkommen",
            1 => "Server",
            2 => "Kasse",
            3 => "Zusammenfassung",
            _ => "Einrichtung",
        }
    }

    /// Total number of steps.
    const TOTAL_STEPS: usize = 4;
}

/// Setup wizard application.
pub struct SetupApp {
    pub wizard: SetupWizard,
    pub initial_error: Option<String>,
    pub rt: tokio::runtime::Runtime,
    config_path: PathBuf,
    server_test_rx: Option<mpsc::Receiver<Result<(), String>>>,
}

impl SetupApp {
    pub fn new(
        wizard: SetupWizard,
        initial_error: Option<String>,
        config_path: PathBuf,
        rt: tokio::runtime::Runtime,
    ) -> Self {
        Self {
            wizard,
            initial_error,
            rt,
            config_path,
            server_test_rx: None,
        }
    }

    /// Test the backend connection asynchronously.
    fn start_server_test(&mut self) {
        let server = self.wizard.config.server.clone();
        let (tx, rx) = mpsc::channel();
        self.server_test_rx = Some(rx);
        self.wizard.server_test_state = ConnectionTestState::Testing;

        self.rt.spawn(async move {
            let result = test_server_connection(&server).await;
            let _ = tx.send(result);
        });
    }

    /// Check for async test results.
    fn poll_test_results(&mut self) {
        if let Some(rx) = &self.server_test_rx
            && let Ok(result) = rx.try_recv()
        {
            self.wizard.server_test_state = match result {
                Ok(()) => ConnectionTestState::Success,
                Err(e) => ConnectionTestState::Failed(e),
            };
            self.server_test_rx = None;
        }
    }
}

impl eframe::App for SetupApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_test_results();

        if matches!(self.wizard.server_test_state, ConnectionTestState::Testing) {
            ctx.request_repaint();
        }

        // Show initial error dialog
        if let Some(err) = self.initial_error.clone() {
            egui::Window::new("Konfigurationsfehler")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::ERROR, &err);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.initial_error = None;
                    }
                });
            return;
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);

                ui.horizontal(|ui| {
                    ui.heading(RichText::new("BINGO Retail Einrichtung").size(24.0).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(format!(
                            "Schritt {} von {}",
                            self.wizard.current_step + 1,
                            SetupWizard::TOTAL_STEPS
                        ));
                    });
                });

                ui.separator();
                ui.add_space(10.0);

                ui.heading(self.wizard.step_title());
                ui.add_space(20.0);

                let needs_server_test = match self.wizard.current_step {
                    0 => {
                        show_welcome_step(ui);
                        false
                    }
                    1 => show_server_step(ui, &mut self.wizard),
                    2 => {
                        show_kassa_step(ui, &mut self.wizard);
                        false
                    }
                    3 => {
                        show_confirmation_step(ui, &self.wizard, &self.config_path);
                        false
                    }
                    _ => false,
                };

                if needs_server_test {
                    self.start_server_test();
                }

                ui.add_space(30.0);
                ui.separator();

                ui.horizontal(|ui| {
                    if self.wizard.current_step > 0 && ui.button("< Zurück").clicked() {
                        self.wizard.current_step -= 1;
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if self.wizard.current_step < SetupWizard::TOTAL_STEPS - 1 {
                            let btn_text = if self.wizard.current_step == 0 {
                                "Los geht's >"
                            } else {
                                "Weiter >"
                            };
                            let enabled = self.wizard.can_proceed();
                            if ui.add_enabled(enabled, egui::Button::new(btn_text)).clicked() {
                                self.wizard.current_step += 1;
                            }
                        } else if ui.button("Speichern & Beenden").clicked() {
                            self.wizard.completed = true;
                        }
                    });
                });
            });
        });

        if self.wizard.completed {
            match self.wizard.config.save(&self.config_path) {
                Ok(()) => {
                    tracing::info!("Configuration saved to {}", self.config_path.display());
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
                Err(e) => {
                    tracing::error!("Failed to save config: {}", e);
                    self.initial_error = Some(format!("Konfiguration konnte nicht gespeichert werden: {e}"));
                    self.wizard.completed = false;
                }
            }
        }
    }
}

fn show_welcome_step(ui: &mut egui::Ui) {
    ui.label("Willkommen bei BINGO Retail!");
    ui.add_space(10.0);
    ui.label("Dieser Assistent hilft bei der Einrichtung der Anwendung.");
    ui.add_space(20.0);
    ui.label("Sie benötigen:");
    ui.add_space(5.0);
    ui.label("  - die Adresse des BINGO-Servers (z.B. http://localhost:8080/api)");
    ui.label("  - die Währung der Kasse");
}

fn show_server_step(ui: &mut egui::Ui, wizard: &mut SetupWizard) -> bool {
    let mut needs_test = false;

    egui::Grid::new("server_grid")
        .num_columns(2)
        .spacing([20.0, 8.0])
        .striped(true)
        .show(ui, |ui| {
            ui.label("API-Adresse:");
            if ui
                .add(egui::TextEdit::singleline(&mut wizard.config.server.base_url).desired_width(320.0))
                .changed()
            {
                wizard.server_changed();
            }
            ui.end_row();

            ui.label("Timeout (Sekunden):");
            if ui.text_edit_singleline(&mut wizard.timeout_input).changed() {
                if let Ok(t) = wizard.timeout_input.trim().parse() {
                    wizard.config.server.timeout_secs = t;
                }
                wizard.server_changed();
            }
            ui.end_row();
        });

    ui.add_space(20.0);

    let valid = wizard.config.validate();
    if let Err(e) = &valid {
        ui.colored_label(colors::ERROR, e.to_string());
        ui.add_space(10.0);
    }

    ui.horizontal(|ui| {
        let testing = matches!(wizard.server_test_state, ConnectionTestState::Testing);
        if ui
            .add_enabled(!testing && valid.is_ok(), egui::Button::new("Verbindung testen"))
            .clicked()
        {
            needs_test = true;
        }

        ui.add_space(10.0);

        match &wizard.server_test_state {
            ConnectionTestState::NotTested => {
                ui.label("Nicht getestet");
            }
            ConnectionTestState::Testing => {
                ui.spinner();
                ui.label("Teste...");
            }
            ConnectionTestState::Success => {
                ui.colored_label(colors::SUCCESS, "Server erreichbar!");
            }
            ConnectionTestState::Failed(e) => {
                ui.colored_label(colors::ERROR, format!("Fehlgeschlagen: {e}"));
            }
        }
    });

    needs_test
}

fn show_kassa_step(ui: &mut egui::Ui, wizard: &mut SetupWizard) {
    ui.label("Einstellungen der Kasse. Sie können später geändert werden.");
    ui.add_space(10.0);

    egui::Grid::new("kassa_grid")
        .num_columns(2)
        .spacing([20.0, 8.0])
        .striped(true)
        .show(ui, |ui| {
            ui.label("Währung:");
            ui.add(egui::TextEdit::singleline(&mut wizard.config.kassa.currency).desired_width(60.0));
            ui.end_row();

            ui.label("Artikel zusammenfassen:");
            ui.checkbox(&mut wizard.config.kassa.group_items, "Erneutes Scannen erhöht die Menge");
            ui.end_row();

            ui.label("Numpad:");
            ui.checkbox(&mut wizard.config.kassa.show_numpad, "Numpad anzeigen");
            ui.end_row();

            ui.label("Design:");
            ui.checkbox(&mut wizard.config.ui.dark_mode, "Dunkles Design");
            ui.end_row();
        });

    if let Err(e) = wizard.config.validate() {
        ui.add_space(10.0);
        ui.colored_label(colors::ERROR, e.to_string());
    }
}

fn show_confirmation_step(ui: &mut egui::Ui, wizard: &SetupWizard, path: &std::path::Path) {
    ui.label("Bitte prüfen Sie die Konfiguration:");
    ui.add_space(10.0);

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.heading("Server");
        ui.label(format!("  {}", wizard.config.server.api_root()));
        ui.label(format!("  Timeout: {} s", wizard.config.server.timeout_secs));
    });

    ui.add_space(10.0);

    egui::Frame::group(ui.style()).show(ui, |ui| {
        let yes_no = |b: bool| if b { "Ja" } else { "Nein" };
        ui.heading("Kasse");
        ui.label(format!("  Währung: {}", wizard.config.kassa.currency));
        ui.label(format!("  Artikel zusammenfassen: {}", yes_no(wizard.config.kassa.group_items)));
        ui.label(format!("  Numpad: {}", yes_no(wizard.config.kassa.show_numpad)));
    });

    ui.add_space(20.0);
    ui.label(format!("Die Datei wird gespeichert unter {}", path.display()));
    ui.label("Danach muss die Anwendung neu gestartet werden.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_step_requires_successful_test() {
        let mut wizard = SetupWizard::default();
        assert!(wizard.can_proceed());

        wizard.current_step = 1;
        assert!(!wizard.can_proceed());
        wizard.server_test_state = ConnectionTestState::Success;
        assert!(wizard.can_proceed());

        wizard.server_changed();
        assert_eq!(wizard.server_test_state, ConnectionTestState::NotTested);
        assert!(!wizard.can_proceed());
    }

    #[test]
    fn test_kassa_step_validates_currency() {
        let mut wizard = SetupWizard::default();
        wizard.current_step = 2;
        assert!(wizard.can_proceed());

        wizard.config.kassa.currency = "euro".to_string();
        assert!(!wizard.can_proceed());
    }

    #[test]
    fn test_step_titles() {
        let mut wizard = SetupWizard::default();
        let titles: Vec<_> = (0..SetupWizard::TOTAL_STEPS)
            .map(|step| {
                wizard.current_step = step;
                wizard.step_title()
            })
            .collect();
        assert_eq!(titles, ["Willkommen", "Server", "Kasse", "Zusammenfassung"]);
    }
}
