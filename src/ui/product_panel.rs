//! Product catalogue: table, stock levels, edit dialog and sales analytics.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, CHART_LINE, FILE_XLS, PENCIL, PLUS, TRASH};

use super::app::{App, DeleteTarget};
use super::components::{
    action_button, back_button, bar_chart, colors, danger_action_button, dialog_footer, panel_header,
    primary_button_with_icon, section, styled_button, styled_button_with_icon,
};
use crate::analytics::{BestSellerWindow, current_price, sales_per_day};
use crate::forms::ProductForm;
use crate::models::Product;
use crate::models::permission::{PRODUCT_CREATE, PRODUCT_DELETE, PRODUCT_UPDATE};
use crate::models::product::format_money;

/// Show the product panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);

    panel_header(ui, "Produkte");

    ui.horizontal(|ui| {
        if app.allows(PRODUCT_CREATE) && primary_button_with_icon(ui, PLUS, "Neues Produkt").clicked() {
            app.product_form = ProductForm::create(&app.config.kassa.currency);
            app.form_error = None;
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Aktualisieren").clicked() {
            app.load_products();
            app.load_best_seller();
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, FILE_XLS, "Excel-Export").clicked() {
            app.export_products();
        }

        ui.add_space(20.0);

        ui.label("Suche:");
        ui.add(
            egui::TextEdit::singleline(&mut app.product_search)
                .desired_width(200.0)
                .hint_text("Name oder EAN..."),
        );
        ui.checkbox(&mut app.product_show_inactive, "Inaktive anzeigen");
        if !app.product_search.is_empty() && styled_button(ui, "Leeren").clicked() {
            app.product_search.clear();
        }
    });

    ui.add_space(15.0);

    let table_width = (ui.available_width() * 0.62).max(400.0);
    ui.horizontal_top(|ui| {
        ui.vertical(|ui| {
            ui.set_width(table_width);
            show_table(app, ui);
        });

        ui.add_space(15.0);

        ui.vertical(|ui| {
            show_best_seller(app, ui);
            ui.add_space(15.0);
            show_price_history(app, ui);
        });
    });

    if app.product_form.is_open {
        show_form_dialog(app, ui.ctx());
    }

    go_back
}

/// Case-insensitive match on name or EAN, optionally hiding inactive products.
pub fn matches_filter(product: &Product, search: &str, show_inactive: bool) -> bool {
    if !show_inactive && !product.active {
        return false;
    }
    let needle = search.trim().to_lowercase();
    needle.is_empty() || product.product_name.to_lowercase().contains(&needle) || product.upc_code.contains(&needle)
}

fn show_table(app: &mut App, ui: &mut Ui) {
    let filtered: Vec<Product> = app
        .products
        .iter()
        .filter(|p| matches_filter(p, &app.product_search, app.product_show_inactive))
        .cloned()
        .collect();

    let can_update = app.allows(PRODUCT_UPDATE);
    let can_delete = app.allows(PRODUCT_DELETE);

    ui.label(format!("{} von {} Produkten", filtered.len(), app.products.len()));
    ui.add_space(10.0);

    ScrollArea::vertical().id_salt("product_scroll").show(ui, |ui| {
        egui::Grid::new("products_grid")
            .num_columns(7)
            .striped(true)
            .min_col_width(50.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Name");
                ui.strong("EAN");
                ui.strong("Preis");
                ui.strong("Marge");
                ui.strong("Bestand");
                ui.strong("Status");
                ui.strong("Aktionen");
                ui.end_row();

                for product in &filtered {
                    let selected = app.selected_product.as_deref() == Some(product.product_id.as_str());
                    if ui.selectable_label(selected, &product.product_name).clicked() {
                        app.select_product(&product.product_id);
                    }
                    ui.label(&product.upc_code);
                    ui.label(format_money(product.list_price, &product.currency));
                    ui.label(format!("{:.1} %", product.margin_percent()));

                    match app.stocks.iter().find(|s| s.product_id == product.product_id) {
                        Some(stock) if stock.needs_reorder() && stock.quantity <= 0 => {
                            ui.colored_label(colors::ERROR, stock.quantity.to_string())
                                .on_hover_text("Nachbestellen");
                        }
                        Some(stock) => {
                            ui.label(stock.quantity.to_string());
                        }
                        None => {
                            ui.weak("-");
                        }
                    }

                    let color = if product.active { colors::SUCCESS } else { colors::NEUTRAL };
                    ui.colored_label(color, product.status_label());

                    ui.horizontal(|ui| {
                        ui.add_space(8.0);
                        if action_button(ui, CHART_LINE, "Preisverlauf").clicked() {
                            app.select_product(&product.product_id);
                        }
                        if can_update && action_button(ui, PENCIL, "Bearbeiten").clicked() {
                            let stock = app.stocks.iter().find(|s| s.product_id == product.product_id);
                            app.product_form = ProductForm::edit(product, stock);
                            app.form_error = None;
                        }
                        ui.add_space(4.0);
                        if can_delete && danger_action_button(ui, TRASH, "Löschen").clicked() {
                            app.delete_target = Some(DeleteTarget::Product(
                                product.product_id.clone(),
                                product.product_name.clone(),
                            ));
                            app.show_delete_confirm = true;
                        }
                    });

                    ui.end_row();
                }
            });
    });
}

fn show_best_seller(app: &mut App, ui: &mut Ui) {
    section(ui, "Bestseller", |ui| {
        let before = app.best_seller_window;
        egui::ComboBox::from_id_salt("best_seller_window")
            .width(200.0)
            .selected_text(app.best_seller_window.label())
            .show_ui(ui, |ui| {
                for window in BestSellerWindow::ALL {
                    ui.selectable_value(&mut app.best_seller_window, window, window.label());
                }
            });
        if app.best_seller_window != before {
            app.load_best_seller();
        }

        ui.add_space(10.0);

        match &app.best_seller {
            Some(best) => {
                ui.label(RichText::new(&best.product_name).heading().strong());
                ui.label(RichText::new(format!("{} verkauft", best.total_quantity)).weak());
                ui.add_space(8.0);

                let bars: Vec<(String, f64)> = sales_per_day(best)
                    .into_iter()
                    .map(|(day, count)| (day.format("%d.%m.").to_string(), f64::from(count)))
                    .collect();
                bar_chart(ui, &bars, 160.0);
            }
            None => {
                ui.label(RichText::new("Keine Verkäufe im Zeitraum").weak());
            }
        }
    });
}

fn show_price_history(app: &mut App, ui: &mut Ui) {
    section(ui, "Preisverlauf", |ui| {
        let Some(product) = app
            .selected_product
            .as_ref()
            .and_then(|id| app.products.iter().find(|p| &p.product_id == id))
        else {
            ui.label(RichText::new("Produkt in der Tabelle auswählen").weak());
            return;
        };

        ui.label(RichText::new(&product.product_name).strong());
        if let Some(current) = current_price(&app.price_history) {
            ui.label(format!(
                "Aktuell: {}",
                format_money(current.list_price, &current.currency)
            ));
        }
        ui.add_space(8.0);

        if app.price_history.is_empty() {
            ui.label(RichText::new("Keine Preisänderungen").weak());
            return;
        }

        let bars: Vec<(String, f64)> = app
            .price_history
            .iter()
            .map(|entry| (entry.changed_date.format("%d.%m.%y").to_string(), entry.list_price))
            .collect();
        bar_chart(ui, &bars, 120.0);

        ui.add_space(8.0);
        ScrollArea::vertical().id_salt("price_history_scroll").max_height(160.0).show(ui, |ui| {
            egui::Grid::new("price_history_grid")
                .num_columns(4)
                .striped(true)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    ui.strong("Datum");
                    ui.strong("Verkauf");
                    ui.strong("Einkauf");
                    ui.strong("Aktiv");
                    ui.end_row();

                    for entry in app.price_history.iter().rev() {
                        ui.label(entry.changed_date.format("%Y-%m-%d").to_string());
                        ui.label(format_money(entry.list_price, &entry.currency));
                        ui.label(format_money(entry.cost_price, &entry.currency));
                        ui.label(if entry.active { "Ja" } else { "Nein" });
                        ui.end_row();
                    }
                });
        });
    });
}

fn show_form_dialog(app: &mut App, ctx: &egui::Context) {
    let title = if app.product_form.is_editing() {
        "Produkt bearbeiten"
    } else {
        "Neues Produkt"
    };

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .default_width(460.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);

            let form = &mut app.product_form;
            egui::Grid::new("product_form_grid")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .show(ui, |ui| {
                    ui.label("Name:");
                    ui.add(egui::TextEdit::singleline(&mut form.name).desired_width(260.0));
                    ui.end_row();

                    ui.label("Beschreibung:");
                    ui.add(
                        egui::TextEdit::multiline(&mut form.description)
                            .desired_rows(2)
                            .desired_width(260.0),
                    );
                    ui.end_row();

                    ui.label("EAN:");
                    ui.add(egui::TextEdit::singleline(&mut form.ean).desired_width(180.0));
                    ui.end_row();

                    ui.label("Verkaufspreis:");
                    ui.add(egui::TextEdit::singleline(&mut form.list_price).desired_width(100.0));
                    ui.end_row();

                    ui.label("Einkaufspreis:");
                    ui.add(egui::TextEdit::singleline(&mut form.cost_price).desired_width(100.0));
                    ui.end_row();

                    ui.label("Währung:");
                    ui.add(egui::TextEdit::singleline(&mut form.currency).desired_width(60.0));
                    ui.end_row();

                    ui.label("Lagerbestand:");
                    ui.add(egui::TextEdit::singleline(&mut form.stock).desired_width(100.0));
                    ui.end_row();

                    ui.label("Steuer inkl.:");
                    ui.checkbox(&mut form.tax_included, "");
                    ui.end_row();

                    ui.label("Aktiv:");
                    ui.checkbox(&mut form.active, "");
                    ui.end_row();
                });

            let error = app.form_error.clone();
            dialog_footer(ui, error.as_deref(), |save| {
                if save {
                    app.save_product();
                } else {
                    app.product_form.reset();
                    app.form_error = None;
                }
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_filter() {
        let product = Product {
            product_name: "Vollkornbrot".into(),
            upc_code: "4006381333931".into(),
            active: false,
            ..Default::default()
        };
        assert!(matches_filter(&product, "", true));
        assert!(!matches_filter(&product, "", false));
        assert!(matches_filter(&product, "KORN", true));
        assert!(matches_filter(&product, "40063", true));
        assert!(!matches_filter(&product, "Milch", true));
    }
}
