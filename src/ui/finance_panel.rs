//! Finance overview: KPIs with period comparison, revenue chart and export.

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;
use egui_phosphor::regular::{ARROWS_CLOCKWISE, FILE_XLS};

use super::app::App;
use super::components::{
    back_button, bar_chart, colors, panel_header, primary_button_with_icon, section, stat_card,
    styled_button_with_icon,
};
use crate::finance::{Kpi, TimeRange};
use crate::models::employee::name_for_id;

const PRESETS: [TimeRange; 3] = [TimeRange::Today, TimeRange::Week, TimeRange::Month];

/// Show the finance panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);

    panel_header(ui, "Finanzen");

    show_controls(app, ui);

    if let Some(error) = &app.form_error {
        ui.add_space(5.0);
        ui.colored_label(colors::ERROR, error);
    }

    ui.add_space(15.0);

    let Some(report) = app.finance_report.clone() else {
        if app.is_loading {
            ui.spinner();
        } else {
            ui.label(RichText::new("Keine Daten geladen").weak());
        }
        return go_back;
    };

    ui.label(RichText::new(format!("Zeitraum: {}", report.period.label())).weak());
    ui.add_space(10.0);

    ui.horizontal(|ui| {
        kpi_card(ui, "Umsatz", &format!("{:.2}", report.revenue().value), &report.revenue());
        let transactions = report.transactions();
        kpi_card(ui, "Transaktionen", &format!("{:.0}", transactions.value), &transactions);
        kpi_card(ui, "Ø Verkauf", &format!("{:.2}", report.average().value), &report.average());
    });

    ui.add_space(15.0);

    section(ui, "Umsatz pro Tag", |ui| {
        let bars: Vec<(String, f64)> = report
            .revenue_per_day()
            .into_iter()
            .map(|(day, total)| (day.format("%d.%m.").to_string(), total))
            .collect();
        bar_chart(ui, &bars, 180.0);
    });

    ui.add_space(15.0);

    section(ui, "Umsatz pro Mitarbeiter", |ui| {
        ScrollArea::vertical().id_salt("finance_employee_scroll").max_height(200.0).show(ui, |ui| {
            egui::Grid::new("finance_employee_grid")
                .num_columns(3)
                .striped(true)
                .min_col_width(80.0)
                .spacing([20.0, 6.0])
                .show(ui, |ui| {
                    ui.strong("Mitarbeiter");
                    ui.strong("Verkäufe");
                    ui.strong("Umsatz");
                    ui.end_row();

                    for (employee_id, total, count) in report.revenue_per_employee() {
                        let name = employee_id
                            .map(|id| name_for_id(&app.employees, id))
                            .unwrap_or_else(|| "Unbekannt".to_string());
                        ui.label(name);
                        ui.label(count.to_string());
                        ui.label(format!("{total:.2}"));
                        ui.end_row();
                    }
                });
        });
    });

    go_back
}

fn show_controls(app: &mut App, ui: &mut Ui) {
    ui.horizontal(|ui| {
        ui.label("Zeitraum:");
        for preset in PRESETS {
            if ui
                .selectable_label(app.finance_range == preset, preset.label())
                .clicked()
            {
                app.finance_range = preset;
                app.load_finance();
            }
        }

        let is_custom = matches!(app.finance_range, TimeRange::Custom { .. });
        if ui.selectable_label(is_custom, "Benutzerdefiniert").clicked() && !is_custom {
            app.finance_range = TimeRange::Custom {
                start: app.finance_custom_start,
                end: app.finance_custom_end,
            };
        }

        ui.add_space(20.0);

        if !app.employees.is_empty() {
            ui.label("Mitarbeiter:");
            let before = app.finance_employee;
            let selected = app
                .finance_employee
                .map(|id| name_for_id(&app.employees, id))
                .unwrap_or_else(|| "Alle".to_string());
            egui::ComboBox::from_id_salt("finance_employee")
                .width(180.0)
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut app.finance_employee, None, "Alle");
                    for employee in &app.employees {
                        ui.selectable_value(
                            &mut app.finance_employee,
                            Some(employee.employee_id),
                            employee.full_name(),
                        );
                    }
                });
            if app.finance_employee != before {
                app.load_finance();
            }
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.add_enabled_ui(app.finance_report.is_some(), |ui| {
                if styled_button_with_icon(ui, FILE_XLS, "Excel-Export").clicked() {
                    app.export_orders();
                }
            });
            if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Aktualisieren").clicked() {
                app.load_finance();
            }
        });
    });

    if matches!(app.finance_range, TimeRange::Custom { .. }) {
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.label("Von:");
            ui.add(DatePickerButton::new(&mut app.finance_custom_start).id_salt("finance_start"));
            ui.label("Bis:");
            ui.add(DatePickerButton::new(&mut app.finance_custom_end).id_salt("finance_end"));
            ui.add_space(10.0);
            if primary_button_with_icon(ui, "", "Anwenden").clicked() {
                app.load_finance();
            }
        });
    }
}

fn kpi_card(ui: &mut Ui, title: &str, value: &str, kpi: &Kpi) {
    let color: Option<Color32> = if kpi.label.is_empty() || kpi.percent == 0.0 {
        None
    } else if kpi.percent > 0.0 {
        Some(colors::SUCCESS)
    } else {
        Some(colors::ERROR)
    };
    stat_card(ui, title, value, &kpi.label, color);
}
