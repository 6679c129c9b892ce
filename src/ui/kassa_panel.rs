//! Point-of-sale screen: EAN input, cart, numpad and checkout.

use eframe::egui::{self, Key, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{BACKSPACE, CREDIT_CARD, ROWS, TRASH, X};

use super::app::App;
use super::components::{
    back_button, colors, danger_action_button, panel_header, primary_button_with_icon, section,
    styled_button_with_icon,
};
use crate::kassa::{CartItem, EditField, InputAction, InputTarget, NumpadKey};

/// Show the kassa panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);

    panel_header(ui, "Kasse");

    let side_width = 280.0;
    let cart_width = (ui.available_width() - side_width - 20.0).max(360.0);

    ui.horizontal_top(|ui| {
        let pending = app.kassa.is_pending();
        ui.vertical(|ui| {
            ui.set_width(cart_width);
            ui.add_enabled_ui(!pending, |ui| {
                show_ean_input(app, ui);
                ui.add_space(10.0);
                show_cart(app, ui);
            });
        });

        ui.add_space(20.0);

        ui.vertical(|ui| {
            ui.set_width(side_width);
            show_totals(app, ui);
            if app.kassa.show_numpad {
                ui.add_space(15.0);
                ui.add_enabled_ui(!pending, |ui| show_numpad(app, ui));
            }
        });
    });

    if app.last_payment.is_some() {
        show_payment_dialog(app, ui.ctx());
    }

    go_back
}

/// Forward a key to the kassa state and start a lookup when requested.
fn press(app: &mut App, key: NumpadKey) {
    if let InputAction::LookupEan(ean) = app.kassa.press(key) {
        app.lookup_ean(ean);
    }
}

fn show_ean_input(app: &mut App, ui: &mut Ui) {
    ui.horizontal(|ui| {
        ui.label(RichText::new("EAN:").strong());
        let editing = app.kassa.input.is_editing();
        let response = ui.add_enabled(
            !editing,
            egui::TextEdit::singleline(&mut app.kassa.input.ean)
                .desired_width(260.0)
                .hint_text("Scannen oder eingeben"),
        );
        if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
            press(app, NumpadKey::Enter);
            response.request_focus();
        }

        let mut grouped = app.kassa.cart.group_items();
        if ui
            .checkbox(&mut grouped, "Gleiche Artikel zusammenfassen")
            .on_hover_text("Erneutes Scannen erhöht die Menge")
            .changed()
        {
            app.kassa.cart.toggle_grouping();
        }
    });

    if let Some(error) = app.kassa.input.error().map(str::to_string) {
        ui.horizontal(|ui| {
            ui.colored_label(colors::ERROR, error);
            if ui.small_button(X).on_hover_text("Ausblenden").clicked() {
                app.kassa.input.clear_error();
            }
        });
    }
}

fn show_cart(app: &mut App, ui: &mut Ui) {
    let items: Vec<CartItem> = app.kassa.cart.items().to_vec();

    if items.is_empty() {
        ui.add_space(20.0);
        ui.label(RichText::new("Der Warenkorb ist leer").weak());
        return;
    }

    ScrollArea::vertical().id_salt("cart_scroll").show(ui, |ui| {
        egui::Grid::new("cart_grid")
            .num_columns(7)
            .striped(true)
            .min_col_width(50.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Artikel");
                ui.strong("Menge");
                ui.strong("Statt-Preis");
                ui.strong("Rabatt %");
                ui.strong("Ist-Preis");
                ui.strong("Summe");
                ui.strong("");
                ui.end_row();

                for (index, item) in items.iter().enumerate() {
                    let selected = app.kassa.input.selected() == Some(index);
                    if ui.selectable_label(selected, &item.name).clicked() {
                        app.kassa.input.select(if selected { None } else { Some(index) });
                    }

                    edit_cell(app, ui, index, EditField::Quantity, item.quantity.to_string());

                    if item.is_reduced() {
                        ui.label(RichText::new(format!("{:.2}", item.list_price)).strikethrough().weak());
                    } else {
                        ui.label(format!("{:.2}", item.list_price));
                    }

                    edit_cell(app, ui, index, EditField::Discount, format!("{:.0}", item.discount_percent));
                    edit_cell(app, ui, index, EditField::Price, format!("{:.2}", item.price));

                    ui.label(RichText::new(format!("{:.2}", item.line_total())).strong());

                    if danger_action_button(ui, TRASH, "Entfernen").clicked() {
                        app.kassa.input.select(Some(index));
                        app.kassa.input.cancel_edit();
                        press(app, NumpadKey::Delete);
                    }

                    ui.end_row();
                }
            });
    });
}

/// Cell that turns into a text field while it is the edit target.
fn edit_cell(app: &mut App, ui: &mut Ui, index: usize, field: EditField, value: String) {
    if app.kassa.input.target() == InputTarget::Edit(field, index) {
        let mut buffer = app.kassa.input.buffer().to_string();
        let response = ui.add(
            egui::TextEdit::singleline(&mut buffer)
                .desired_width(60.0)
                .hint_text(value),
        );
        if response.changed() {
            app.kassa.input.set_buffer(buffer);
        }
        if response.lost_focus() {
            if ui.input(|i| i.key_pressed(Key::Enter)) {
                press(app, NumpadKey::Enter);
            } else if ui.input(|i| i.key_pressed(Key::Escape)) {
                app.kassa.input.cancel_edit();
            }
        } else if !response.has_focus() {
            response.request_focus();
        }
    } else if ui
        .button(value)
        .on_hover_text(format!("{} ändern", field.label()))
        .clicked()
    {
        app.kassa.input.begin_edit(field, index);
    }
}

fn show_totals(app: &mut App, ui: &mut Ui) {
    let currency = app.config.kassa.currency.to_uppercase();
    section(ui, "Summe", |ui| {
        let cart = &app.kassa.cart;
        ui.label(
            RichText::new(format!("{:.2} {currency}", cart.total()))
                .size(28.0)
                .strong(),
        );
        ui.label(format!("{} Artikel, {} Positionen", cart.unit_count(), cart.len()));
        if cart.savings() > 0.0 {
            ui.colored_label(colors::SUCCESS, format!("Ersparnis: {:.2} {currency}", cart.savings()));
        }

        ui.add_space(12.0);

        let pending = app.kassa.is_pending();
        let can_checkout = !cart.is_empty() && !pending;
        ui.add_enabled_ui(can_checkout, |ui| {
            if primary_button_with_icon(ui, CREDIT_CARD, "Bezahlen").clicked() {
                app.checkout();
            }
        });
        if pending {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Zahlung wird vorbereitet...");
            });
        }

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.add_enabled_ui(!pending, |ui| {
                if styled_button_with_icon(ui, X, "Leeren").clicked() {
                    app.kassa.finish_checkout();
                }
            });
            let numpad_label = if app.kassa.show_numpad { "Numpad aus" } else { "Numpad an" };
            if styled_button_with_icon(ui, ROWS, numpad_label).clicked() {
                app.kassa.show_numpad = !app.kassa.show_numpad;
            }
        });
    });
}

fn show_numpad(app: &mut App, ui: &mut Ui) {
    let target = match app.kassa.input.target() {
        InputTarget::Ean => "EAN".to_string(),
        InputTarget::Edit(field, index) => format!("{} (Zeile {})", field.label(), index + 1),
    };

    section(ui, "Numpad", |ui| {
        ui.label(RichText::new(format!("Eingabe: {target}")).small().weak());
        ui.add_space(6.0);

        let size = egui::vec2(70.0, 48.0);
        egui::Grid::new("numpad_grid").spacing([6.0, 6.0]).show(ui, |ui| {
            for row in NumpadKey::LAYOUT {
                for key in row {
                    let label = RichText::new(key.label()).size(18.0);
                    if ui.add(egui::Button::new(label).min_size(size)).clicked() {
                        press(app, key);
                    }
                }
                ui.end_row();
            }
        });

        ui.add_space(6.0);
        let delete = RichText::new(format!("{BACKSPACE} {}", NumpadKey::Delete.label())).size(16.0);
        if ui
            .add(egui::Button::new(delete).min_size(egui::vec2(222.0, 40.0)))
            .clicked()
        {
            press(app, NumpadKey::Delete);
        }
    });
}

fn show_payment_dialog(app: &mut App, ctx: &egui::Context) {
    let Some((total, secret)) = app.last_payment.clone() else {
        return;
    };
    let currency = app.config.kassa.currency.to_uppercase();

    egui::Window::new("Zahlung")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(RichText::new(format!("{total:.2} {currency}")).size(24.0).strong());
            ui.add_space(8.0);
            ui.label("Verkauf gespeichert. Zahlungssitzung erstellt:");
            ui.add(
                egui::TextEdit::singleline(&mut secret.as_str())
                    .desired_width(360.0)
                    .font(egui::TextStyle::Monospace),
            );
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                if ui.button("Kopieren").clicked() {
                    ui.ctx().copy_text(secret.clone());
                }
                if primary_button_with_icon(ui, "", "Fertig").clicked() {
                    app.last_payment = None;
                }
            });
        });
}
