//! Role management with grouped permission checkboxes.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, PENCIL, PLUS, TRASH};

use super::app::{App, DeleteTarget};
use super::components::{
    action_button, back_button, danger_action_button, dialog_footer, panel_header, primary_button_with_icon,
    styled_button_with_icon,
};
use crate::forms::RoleForm;
use crate::models::Role;
use crate::models::permission::{GROUPS, ROLE_CREATE, ROLE_DELETE, ROLE_UPDATE};

/// Show the role panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);

    panel_header(ui, "Rollen");

    ui.horizontal(|ui| {
        if app.allows(ROLE_CREATE) && primary_button_with_icon(ui, PLUS, "Neue Rolle").clicked() {
            app.role_form = RoleForm::create();
            app.form_error = None;
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Aktualisieren").clicked() {
            app.load_roles();
        }
    });

    ui.add_space(15.0);

    show_table(app, ui);

    if app.role_form.is_open {
        show_form_dialog(app, ui.ctx());
    }

    go_back
}

fn show_table(app: &mut App, ui: &mut Ui) {
    let roles: Vec<Role> = app.roles.clone();
    let can_update = app.allows(ROLE_UPDATE);
    let can_delete = app.allows(ROLE_DELETE);

    ui.label(format!("{} Rollen", roles.len()));
    ui.add_space(10.0);

    ScrollArea::vertical().id_salt("role_scroll").show(ui, |ui| {
        egui::Grid::new("roles_grid")
            .num_columns(5)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Name");
                ui.strong("Beschreibung");
                ui.strong("Berechtigungen");
                ui.strong("Mitarbeiter");
                ui.strong("Aktionen");
                ui.end_row();

                for role in &roles {
                    ui.label(&role.role_name);
                    ui.label(&role.description);
                    ui.label(role.permissions_label());
                    ui.label(role.employees.len().to_string());

                    ui.horizontal(|ui| {
                        ui.add_space(8.0);
                        if can_update && action_button(ui, PENCIL, "Bearbeiten").clicked() {
                            app.role_form = RoleForm::edit(role);
                            app.form_error = None;
                        }
                        ui.add_space(4.0);
                        if can_delete
                            && let Some(id) = role.role_id
                            && danger_action_button(ui, TRASH, "Löschen").clicked()
                        {
                            app.delete_target = Some(DeleteTarget::Role(id, role.role_name.clone()));
                            app.show_delete_confirm = true;
                        }
                    });

                    ui.end_row();
                }
            });
    });
}

fn show_form_dialog(app: &mut App, ctx: &egui::Context) {
    let title = if app.role_form.is_editing() {
        "Rolle bearbeiten"
    } else {
        "Neue Rolle"
    };

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .default_width(480.0)
        .max_height(600.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);

            egui::Grid::new("role_form_grid")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .show(ui, |ui| {
                    ui.label("Name:");
                    ui.add(egui::TextEdit::singleline(&mut app.role_form.name).desired_width(260.0));
                    ui.end_row();

                    ui.label("Beschreibung:");
                    ui.add(
                        egui::TextEdit::multiline(&mut app.role_form.description)
                            .desired_rows(2)
                            .desired_width(260.0),
                    );
                    ui.end_row();
                });

            ui.add_space(10.0);
            ui.label(RichText::new("Berechtigungen").strong());
            ui.add_space(5.0);

            ScrollArea::vertical().max_height(320.0).show(ui, |ui| {
                for group in GROUPS {
                    ui.label(RichText::new(group.label).small().weak());
                    ui.horizontal_wrapped(|ui| {
                        for (permission, label) in group.permissions {
                            let mut checked = app.role_form.has(permission);
                            if ui.checkbox(&mut checked, *label).changed() {
                                app.role_form.toggle(permission);
                            }
                        }
                    });
                    ui.add_space(6.0);
                }
            });

            let error = app.form_error.clone();
            dialog_footer(ui, error.as_deref(), |save| {
                if save {
                    app.save_role();
                } else {
                    app.role_form.reset();
                    app.form_error = None;
                }
            });
        });
}
