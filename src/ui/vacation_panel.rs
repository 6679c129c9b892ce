//! Vacation requests: own requests, manager table and review dialog.

use chrono::{Local, NaiveDate};
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;
use egui_phosphor::regular::{ARROWS_CLOCKWISE, CHECK_CIRCLE, FILE_XLS, PENCIL, PLUS, TRASH};

use super::app::{App, DeleteTarget, ReviewDialog, VacationTab};
use super::components::{
    action_button, back_button, danger_action_button, dialog_footer, panel_header, primary_button_with_icon, colors,
    section, status_chip, styled_button, styled_button_with_icon,
};
use crate::models::employee::name_for_id;
use crate::models::permission::{URLAUB_READ, URLAUB_REVIEW};
use crate::models::{VacationRequest, VacationStatus};
use crate::vacation::{ReviewDecision, SortKey, SortOrder, VACATION_TYPES, count_by_status};

pub fn status_color(status: VacationStatus) -> Color32 {
    match status {
        VacationStatus::Pending => colors::WARNING,
        VacationStatus::Approved => colors::SUCCESS,
        VacationStatus::Rejected => colors::ERROR,
    }
}

/// Show the vacation panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);

    panel_header(ui, "Urlaub");

    let can_manage = app.allows(URLAUB_READ);
    if !can_manage {
        app.vacation_tab = VacationTab::Mine;
    }

    ui.horizontal(|ui| {
        ui.selectable_value(&mut app.vacation_tab, VacationTab::Mine, "Meine Anträge");
        if can_manage {
            ui.selectable_value(&mut app.vacation_tab, VacationTab::Manage, "Verwalten");
        }

        ui.add_space(20.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Aktualisieren").clicked() {
            app.load_vacation();
        }
    });

    ui.add_space(15.0);

    match app.vacation_tab {
        VacationTab::Mine => show_own_requests(app, ui),
        VacationTab::Manage => show_manage_table(app, ui),
    }

    if app.vacation_form_open {
        show_form_dialog(app, ui.ctx());
    }
    if app.review_dialog.is_some() {
        show_review_dialog(app, ui.ctx());
    }

    go_back
}

fn show_own_requests(app: &mut App, ui: &mut Ui) {
    if primary_button_with_icon(ui, PLUS, "Neuer Antrag").clicked() {
        app.vacation_form.reset();
        app.vacation_form_open = true;
        app.form_error = None;
    }

    ui.add_space(10.0);

    let mut requests = app.my_vacation_requests.clone();
    requests.sort_by(|a, b| b.start_datum.cmp(&a.start_datum));

    if requests.is_empty() {
        ui.label(RichText::new("Noch keine Anträge gestellt").weak());
        return;
    }

    ScrollArea::vertical().id_salt("own_vacation_scroll").show(ui, |ui| {
        egui::Grid::new("own_vacation_grid")
            .num_columns(7)
            .striped(true)
            .min_col_width(50.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Art");
                ui.strong("Von");
                ui.strong("Bis");
                ui.strong("Tage");
                ui.strong("Status");
                ui.strong("Kommentar");
                ui.strong("Aktionen");
                ui.end_row();

                for request in &requests {
                    ui.label(&request.kind);
                    ui.label(request.start_datum.format("%d.%m.%Y").to_string());
                    ui.label(request.end_datum.format("%d.%m.%Y").to_string());
                    ui.label(request.day_count().to_string());
                    status_chip(ui, request.status.label(), status_color(request.status));
                    ui.label(request.comment.as_deref().unwrap_or("-"));

                    ui.horizontal(|ui| {
                        if request.is_editable() {
                            if action_button(ui, PENCIL, "Bearbeiten").clicked() {
                                app.vacation_form.edit(request);
                                app.vacation_form_open = true;
                                app.form_error = None;
                            }
                            ui.add_space(4.0);
                            if let Some(id) = request.antrags_id
                                && danger_action_button(ui, TRASH, "Löschen").clicked()
                            {
                                app.delete_target = Some(DeleteTarget::VacationRequest(id));
                                app.show_delete_confirm = true;
                            }
                        }
                    });

                    ui.end_row();
                }
            });
    });
}

fn show_filters(app: &mut App, ui: &mut Ui) {
    let filter = &mut app.vacation_filter;
    ui.horizontal_wrapped(|ui| {
        ui.label("Status:");
        egui::ComboBox::from_id_salt("vacation_status_filter")
            .width(120.0)
            .selected_text(filter.status.map(|s| s.label()).unwrap_or("Alle"))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut filter.status, None, "Alle");
                for status in VacationStatus::ALL {
                    ui.selectable_value(&mut filter.status, Some(status), status.label());
                }
            });

        ui.add_space(10.0);

        ui.label("Mitarbeiter:");
        let selected = filter
            .employee_id
            .map(|id| name_for_id(&app.employees, id))
            .unwrap_or_else(|| "Alle".to_string());
        egui::ComboBox::from_id_salt("vacation_employee_filter")
            .width(160.0)
            .selected_text(selected)
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut filter.employee_id, None, "Alle");
                for employee in &app.employees {
                    ui.selectable_value(&mut filter.employee_id, Some(employee.employee_id), employee.full_name());
                }
            });

        ui.add_space(10.0);

        let mut by_date = filter.date.is_some();
        if ui.checkbox(&mut by_date, "Am Tag:").changed() {
            filter.date = by_date.then(|| Local::now().date_naive());
        }
        if let Some(date) = filter.date.as_mut() {
            ui.add(DatePickerButton::new(date).id_salt("vacation_date_filter"));
        }

        ui.add_space(10.0);

        ui.label("Sortierung:");
        egui::ComboBox::from_id_salt("vacation_sort")
            .width(130.0)
            .selected_text(filter.sort.label())
            .show_ui(ui, |ui| {
                for key in SortKey::ALL {
                    ui.selectable_value(&mut filter.sort, key, key.label());
                }
            });
        let order_label = match filter.order {
            SortOrder::Asc => "Aufsteigend",
            SortOrder::Desc => "Absteigend",
        };
        if ui.button(order_label).clicked() {
            filter.order = match filter.order {
                SortOrder::Asc => SortOrder::Desc,
                SortOrder::Desc => SortOrder::Asc,
            };
        }

        if styled_button(ui, "Zurücksetzen").clicked() {
            filter.reset();
        }
    });
}

fn show_manage_table(app: &mut App, ui: &mut Ui) {
    show_filters(app, ui);

    ui.add_space(10.0);

    let employees = app.employees.clone();
    let requests = app
        .vacation_filter
        .apply(&app.vacation_requests, |id| name_for_id(&employees, id));
    let can_review = app.allows(URLAUB_REVIEW);

    ui.horizontal(|ui| {
        for status in VacationStatus::ALL {
            status_chip(
                ui,
                &format!("{}: {}", status.label(), count_by_status(&app.vacation_requests, status)),
                status_color(status),
            );
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if styled_button_with_icon(ui, FILE_XLS, "Excel-Export").clicked() {
                app.export_vacation(requests.clone());
            }
        });
    });

    ui.add_space(10.0);
    ui.label(format!("{} von {} Anträgen", requests.len(), app.vacation_requests.len()));
    ui.add_space(6.0);

    ScrollArea::vertical().id_salt("manage_vacation_scroll").show(ui, |ui| {
        egui::Grid::new("manage_vacation_grid")
            .num_columns(8)
            .striped(true)
            .min_col_width(50.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Nr.");
                ui.strong("Mitarbeiter");
                ui.strong("Art");
                ui.strong("Zeitraum");
                ui.strong("Tage");
                ui.strong("Grund");
                ui.strong("Status");
                ui.strong("Aktionen");
                ui.end_row();

                for request in &requests {
                    ui.label(request.antrags_id.map(|id| id.to_string()).unwrap_or_default());
                    ui.label(name_for_id(&employees, request.employee_id));
                    ui.label(&request.kind);
                    ui.label(format!(
                        "{} - {}",
                        request.start_datum.format("%d.%m.%Y"),
                        request.end_datum.format("%d.%m.%Y")
                    ));
                    ui.label(request.day_count().to_string());
                    ui.label(&request.grund);
                    status_chip(ui, request.status.label(), status_color(request.status));

                    ui.horizontal(|ui| {
                        if can_review
                            && request.is_editable()
                            && action_button(ui, CHECK_CIRCLE, "Prüfen").clicked()
                        {
                            app.review_dialog = Some(ReviewDialog {
                                request: request.clone(),
                                decision: ReviewDecision::Approve,
                                comment: String::new(),
                            });
                        }
                    });

                    ui.end_row();
                }
            });
    });
}

/// Date picker bound to an optional date; unset dates start at `fallback`.
fn optional_date(ui: &mut Ui, id: &str, value: &mut Option<NaiveDate>, fallback: NaiveDate) {
    let mut date = value.unwrap_or(fallback);
    let response = ui.add(DatePickerButton::new(&mut date).id_salt(id));
    if response.changed() || value.is_some() {
        *value = Some(date);
    } else {
        ui.weak("nicht gewählt");
    }
}

fn show_form_dialog(app: &mut App, ctx: &egui::Context) {
    let title = if app.vacation_form.is_edit() {
        "Antrag bearbeiten"
    } else {
        "Neuer Urlaubsantrag"
    };
    let today = Local::now().date_naive();

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .default_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);

            let form = &mut app.vacation_form;
            egui::Grid::new("vacation_form_grid")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .show(ui, |ui| {
                    ui.label("Von:");
                    ui.horizontal(|ui| optional_date(ui, "vacation_start", &mut form.start, today));
                    ui.end_row();

                    ui.label("Bis:");
                    let end_fallback = form.start.unwrap_or(today);
                    ui.horizontal(|ui| optional_date(ui, "vacation_end", &mut form.end, end_fallback));
                    ui.end_row();

                    ui.label("Art:");
                    egui::ComboBox::from_id_salt("vacation_kind")
                        .width(220.0)
                        .selected_text(form.kind.as_deref().unwrap_or("Bitte wählen"))
                        .show_ui(ui, |ui| {
                            for kind in VACATION_TYPES {
                                ui.selectable_value(&mut form.kind, Some(kind.to_string()), kind);
                            }
                        });
                    ui.end_row();

                    ui.label("Grund:");
                    ui.add(
                        egui::TextEdit::multiline(&mut form.grund)
                            .desired_rows(2)
                            .desired_width(220.0),
                    );
                    ui.end_row();

                    ui.label("Kommentar:");
                    ui.add(
                        egui::TextEdit::singleline(&mut form.comment)
                            .desired_width(220.0)
                            .hint_text("Optional"),
                    );
                    ui.end_row();
                });

            if let Some(days) = form.day_count() {
                ui.add_space(5.0);
                ui.label(RichText::new(format!("{days} Tage")).weak());
            }

            let error = app.form_error.clone();
            dialog_footer(ui, error.as_deref(), |save| {
                if save {
                    app.submit_vacation_request();
                } else {
                    app.vacation_form.reset();
                    app.vacation_form_open = false;
                    app.form_error = None;
                }
            });
        });
}

fn show_review_dialog(app: &mut App, ctx: &egui::Context) {
    let mut submit = false;
    let mut cancel = false;
    let employees = app.employees.clone();

    let Some(dialog) = app.review_dialog.as_mut() else {
        return;
    };

    egui::Window::new("Antrag prüfen")
        .collapsible(false)
        .resizable(false)
        .default_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            let request: &VacationRequest = &dialog.request;
            section(ui, &name_for_id(&employees, request.employee_id), |ui| {
                ui.label(format!(
                    "{}: {} - {} ({} Tage)",
                    request.kind,
                    request.start_datum.format("%d.%m.%Y"),
                    request.end_datum.format("%d.%m.%Y"),
                    request.day_count()
                ));
                ui.label(RichText::new(&request.grund).weak());
            });

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                ui.radio_value(&mut dialog.decision, ReviewDecision::Approve, "Genehmigen");
                ui.radio_value(&mut dialog.decision, ReviewDecision::Reject, "Ablehnen");
            });

            ui.add_space(6.0);
            ui.label("Kommentar:");
            ui.add(
                egui::TextEdit::multiline(&mut dialog.comment)
                    .desired_rows(2)
                    .desired_width(360.0)
                    .hint_text("Leer lassen, um den bisherigen Kommentar zu behalten"),
            );

            ui.add_space(10.0);
            ui.separator();
            ui.horizontal(|ui| {
                if styled_button(ui, "Abbrechen").clicked() {
                    cancel = true;
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if primary_button_with_icon(ui, "", "Bestätigen").clicked() {
                        submit = true;
                    }
                });
            });
        });

    if cancel {
        app.review_dialog = None;
    } else if submit {
        app.submit_review();
    }
}
