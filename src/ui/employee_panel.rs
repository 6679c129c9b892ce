//! Employee management panel: list, search, edit, register and delete.

use eframe::egui::{self, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, PENCIL, TRASH, USER_PLUS};

use super::app::{App, DeleteTarget};
use super::components::{
    action_button, back_button, danger_action_button, dialog_footer, panel_header, primary_button_with_icon,
    styled_button, styled_button_with_icon,
};
use crate::forms::{EmployeeForm, SignupForm};
use crate::models::permission::{USER_CREATE, USER_DELETE, USER_UPDATE};
use crate::models::{Employee, Role};

/// Show the employee panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);

    panel_header(ui, "Mitarbeiter");

    ui.horizontal(|ui| {
        if app.allows(USER_CREATE) && primary_button_with_icon(ui, USER_PLUS, "Registrieren").clicked() {
            app.signup_form = SignupForm {
                is_open: true,
                ..Default::default()
            };
            app.form_error = None;
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Aktualisieren").clicked() {
            app.load_employees();
            app.load_roles();
        }

        ui.add_space(20.0);

        ui.label("Suche:");
        ui.add(
            egui::TextEdit::singleline(&mut app.employee_search)
                .desired_width(200.0)
                .hint_text("ID oder Name..."),
        );
        if !app.employee_search.is_empty() && styled_button(ui, "Leeren").clicked() {
            app.employee_search.clear();
        }
    });

    ui.add_space(15.0);

    show_table(app, ui);

    if app.employee_form.is_open {
        show_edit_dialog(app, ui.ctx());
    }
    if app.signup_form.is_open {
        show_signup_dialog(app, ui.ctx());
    }

    go_back
}

/// Case-insensitive match on ID, first name or last name.
pub fn matches_search(employee: &Employee, search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    needle.is_empty()
        || employee.employee_id.to_string().contains(&needle)
        || employee.first_name.to_lowercase().contains(&needle)
        || employee.last_name.to_lowercase().contains(&needle)
}

fn show_table(app: &mut App, ui: &mut Ui) {
    let filtered: Vec<Employee> = app
        .employees
        .iter()
        .filter(|e| matches_search(e, &app.employee_search))
        .cloned()
        .collect();

    let can_update = app.allows(USER_UPDATE);
    let can_delete = app.allows(USER_DELETE);
    let own_id = app.employee_id();

    ui.label(format!("{} von {} Mitarbeitern", filtered.len(), app.employees.len()));
    ui.add_space(10.0);

    ScrollArea::vertical().id_salt("employee_scroll").show(ui, |ui| {
        egui::Grid::new("employees_grid")
            .num_columns(5)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("ID");
                ui.strong("Vorname");
                ui.strong("Nachname");
                ui.strong("Rolle");
                ui.strong("Aktionen");
                ui.end_row();

                for emp in &filtered {
                    ui.label(emp.employee_id.to_string());
                    ui.label(&emp.first_name);
                    ui.label(&emp.last_name);
                    ui.label(emp.role_name());

                    ui.horizontal(|ui| {
                        ui.add_space(8.0);
                        if can_update && action_button(ui, PENCIL, "Bearbeiten").clicked() {
                            app.employee_form = EmployeeForm::edit(emp);
                            app.form_error = None;
                        }
                        ui.add_space(4.0);
                        if can_delete
                            && own_id != Some(emp.employee_id)
                            && danger_action_button(ui, TRASH, "Löschen").clicked()
                        {
                            app.delete_target = Some(DeleteTarget::Employee(emp.clone()));
                            app.show_delete_confirm = true;
                        }
                    });

                    ui.end_row();
                }
            });
    });
}

/// Role picker shared by both dialogs.
fn role_combo(ui: &mut Ui, id: &str, roles: &[Role], selected: &mut Option<i32>) {
    let current = selected
        .and_then(|id| roles.iter().find(|r| r.role_id == Some(id)))
        .map(|r| r.role_name.as_str())
        .unwrap_or("Keine");

    egui::ComboBox::from_id_salt(id)
        .width(220.0)
        .selected_text(current)
        .show_ui(ui, |ui| {
            if ui.selectable_label(selected.is_none(), "Keine").clicked() {
                *selected = None;
            }
            for role in roles {
                if ui
                    .selectable_label(role.role_id.is_some() && *selected == role.role_id, &role.role_name)
                    .clicked()
                {
                    *selected = role.role_id;
                }
            }
        });
}

fn show_edit_dialog(app: &mut App, ctx: &egui::Context) {
    egui::Window::new("Mitarbeiter bearbeiten")
        .collapsible(false)
        .resizable(false)
        .default_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);

            egui::Grid::new("employee_form_grid")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .show(ui, |ui| {
                    ui.label("ID:");
                    ui.label(app.employee_form.employee_id.to_string());
                    ui.end_row();

                    ui.label("Vorname:");
                    ui.add(egui::TextEdit::singleline(&mut app.employee_form.first_name).desired_width(220.0));
                    ui.end_row();

                    ui.label("Nachname:");
                    ui.add(egui::TextEdit::singleline(&mut app.employee_form.last_name).desired_width(220.0));
                    ui.end_row();

                    ui.label("Neues Passwort:");
                    ui.add(
                        egui::TextEdit::singleline(&mut app.employee_form.password)
                            .password(true)
                            .desired_width(220.0)
                            .hint_text("Leer lassen zum Beibehalten"),
                    );
                    ui.end_row();

                    ui.label("Rolle:");
                    role_combo(ui, "employee_form_role", &app.roles, &mut app.employee_form.role_id);
                    ui.end_row();
                });

            let error = app.form_error.clone();
            dialog_footer(ui, error.as_deref(), |save| {
                if save {
                    app.save_employee();
                } else {
                    app.employee_form.reset();
                    app.form_error = None;
                }
            });
        });
}

fn show_signup_dialog(app: &mut App, ctx: &egui::Context) {
    egui::Window::new("Mitarbeiter registrieren")
        .collapsible(false)
        .resizable(false)
        .default_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);

            egui::Grid::new("signup_form_grid")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .show(ui, |ui| {
                    ui.label("Mitarbeiter-ID:");
                    ui.add(egui::TextEdit::singleline(&mut app.signup_form.employee_id).desired_width(120.0));
                    ui.end_row();

                    ui.label("Vorname:");
                    ui.add(egui::TextEdit::singleline(&mut app.signup_form.first_name).desired_width(220.0));
                    ui.end_row();

                    ui.label("Nachname:");
                    ui.add(egui::TextEdit::singleline(&mut app.signup_form.last_name).desired_width(220.0));
                    ui.end_row();

                    ui.label("Passwort:");
                    ui.add(
                        egui::TextEdit::singleline(&mut app.signup_form.password)
                            .password(true)
                            .desired_width(220.0),
                    );
                    ui.end_row();

                    ui.label("Passwort wiederholen:");
                    ui.add(
                        egui::TextEdit::singleline(&mut app.signup_form.repeat_password)
                            .password(true)
                            .desired_width(220.0),
                    );
                    ui.end_row();

                    ui.label("Rolle:");
                    role_combo(ui, "signup_form_role", &app.roles, &mut app.signup_form.role_id);
                    ui.end_row();
                });

            let error = app.form_error.clone();
            dialog_footer(ui, error.as_deref(), |save| {
                if save {
                    app.register_employee();
                } else {
                    app.signup_form.reset();
                    app.form_error = None;
                }
            });
        });
}
