//! Coupon list with create and delete.

use eframe::egui::{self, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, PLUS, TRASH};

use super::app::{App, DeleteTarget};
use super::components::{
    back_button, danger_action_button, dialog_footer, panel_header, primary_button_with_icon, styled_button_with_icon,
};
use crate::forms::CouponForm;
use crate::models::CouponDuration;
use crate::models::permission::{COUPONS_CREATE, COUPONS_DELETE};

/// Show the coupon panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);

    panel_header(ui, "Coupons");

    ui.horizontal(|ui| {
        if app.allows(COUPONS_CREATE) && primary_button_with_icon(ui, PLUS, "Neuer Coupon").clicked() {
            app.coupon_form = CouponForm {
                is_open: true,
                ..Default::default()
            };
            app.form_error = None;
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Aktualisieren").clicked() {
            app.load_coupons();
        }
    });

    ui.add_space(15.0);

    let coupons = app.coupons.clone();
    let can_delete = app.allows(COUPONS_DELETE);

    ui.label(format!("{} Coupons", coupons.len()));
    ui.add_space(10.0);

    ScrollArea::vertical().id_salt("coupon_scroll").show(ui, |ui| {
        egui::Grid::new("coupons_grid")
            .num_columns(5)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Name");
                ui.strong("Rabatt");
                ui.strong("Dauer");
                ui.strong("ID");
                ui.strong("Aktionen");
                ui.end_row();

                for coupon in &coupons {
                    ui.label(&coupon.name);
                    ui.label(coupon.discount_label());
                    ui.label(coupon.duration.label());
                    ui.weak(&coupon.id);

                    ui.horizontal(|ui| {
                        ui.add_space(8.0);
                        if can_delete && danger_action_button(ui, TRASH, "Löschen").clicked() {
                            app.delete_target = Some(DeleteTarget::Coupon(coupon.name.clone()));
                            app.show_delete_confirm = true;
                        }
                    });

                    ui.end_row();
                }
            });
    });

    if app.coupon_form.is_open {
        show_form_dialog(app, ui.ctx());
    }

    go_back
}

fn show_form_dialog(app: &mut App, ctx: &egui::Context) {
    egui::Window::new("Neuer Coupon")
        .collapsible(false)
        .resizable(false)
        .default_width(400.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);

            let form = &mut app.coupon_form;
            egui::Grid::new("coupon_form_grid")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .show(ui, |ui| {
                    ui.label("Name:");
                    ui.add(egui::TextEdit::singleline(&mut form.name).desired_width(220.0));
                    ui.end_row();

                    ui.label("Betrag (Cent):");
                    ui.add(egui::TextEdit::singleline(&mut form.amount_off).desired_width(100.0));
                    ui.end_row();

                    ui.label("Prozent:");
                    ui.add(egui::TextEdit::singleline(&mut form.percent_off).desired_width(100.0));
                    ui.end_row();

                    ui.label("Währung:");
                    egui::ComboBox::from_id_salt("coupon_currency")
                        .width(100.0)
                        .selected_text(form.currency.as_str())
                        .show_ui(ui, |ui| {
                            for currency in CouponForm::CURRENCIES {
                                ui.selectable_value(&mut form.currency, currency.to_string(), currency);
                            }
                        });
                    ui.end_row();

                    ui.label("Dauer:");
                    egui::ComboBox::from_id_salt("coupon_duration")
                        .width(160.0)
                        .selected_text(form.duration.label())
                        .show_ui(ui, |ui| {
                            for duration in CouponDuration::ALL {
                                ui.selectable_value(&mut form.duration, duration, duration.label());
                            }
                        });
                    ui.end_row();
                });

            ui.add_space(5.0);
            ui.weak("Entweder Betrag oder Prozent angeben");

            let error = app.form_error.clone();
            dialog_footer(ui, error.as_deref(), |save| {
                if save {
                    app.save_coupon();
                } else {
                    app.coupon_form.reset();
                    app.form_error = None;
                }
            });
        });
}
