//! Main menu with navigation cards and activity log.

use chrono::{Datelike, Local};
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{
    CALENDAR_BLANK, CASH_REGISTER, CHART_LINE, GEAR, PACKAGE, SHIELD_CHECK, TICKET, USERS,
};

use super::app::{App, LogLevel, Panel};
use super::components::{colors, dashboard_card, section, stat_card};
use crate::vacation::approved_days;

/// Navigation cards: panel, title, description, icon.
const CARDS: [(Panel, &str, &str, &str); 8] = [
    (Panel::Kassa, "Kasse", "Artikel scannen und kassieren", CASH_REGISTER),
    (Panel::Products, "Produkte", "Sortiment und Lager", PACKAGE),
    (Panel::Employees, "Mitarbeiter", "Accounts verwalten", USERS),
    (Panel::Roles, "Rollen", "Berechtigungen vergeben", SHIELD_CHECK),
    (Panel::Coupons, "Coupons", "Rabattcodes anlegen", TICKET),
    (Panel::Finance, "Finanzen", "Umsätze und Kennzahlen", CHART_LINE),
    (Panel::Vacation, "Urlaub", "Anträge stellen und prüfen", CALENDAR_BLANK),
    (Panel::Settings, "Einstellungen", "Server und Kasse", GEAR),
];

const CARDS_PER_ROW: usize = 4;

/// Show the dashboard panel.
///
/// Returns `Some(panel)` if navigation is requested. Only cards the employee
/// may open are rendered.
pub fn show(app: &mut App, ui: &mut Ui) -> Option<Panel> {
    let mut next_panel = None;
    let Some(session) = app.session.clone() else {
        return None;
    };

    ui.vertical_centered(|ui| {
        ui.add_space(30.0);
        ui.label(RichText::new("BINGO Retail").size(32.0).strong());
        ui.add_space(5.0);
        ui.label(
            RichText::new(format!("Willkommen, {}", session.employee.first_name))
                .size(14.0)
                .weak(),
        );
        ui.add_space(30.0);

        let visible: Vec<_> = CARDS.iter().filter(|(panel, ..)| session.can_open(*panel)).collect();

        let available = ui.available_width();
        let spacing = 30.0;
        let per_row = visible.len().clamp(1, CARDS_PER_ROW) as f32;
        let total_spacing = spacing * (per_row - 1.0);
        let card_width = ((available - total_spacing) / per_row).clamp(150.0, 220.0);
        let card_size = egui::vec2(card_width, card_width * 0.75);
        let total_width = card_width * per_row + total_spacing;
        let start_offset = ((available - total_width) / 2.0).max(0.0);

        for row in visible.chunks(CARDS_PER_ROW) {
            ui.horizontal(|ui| {
                ui.add_space(start_offset);
                for (i, (panel, title, description, icon)) in row.iter().enumerate() {
                    if i > 0 {
                        ui.add_space(spacing);
                    }
                    if dashboard_card(ui, title, description, icon, card_size).clicked() {
                        next_panel = Some(*panel);
                    }
                }
            });
            ui.add_space(spacing);
        }
    });

    ui.horizontal(|ui| {
        ui.add_space(10.0);
        let year = Local::now().year();
        let pending = app
            .my_vacation_requests
            .iter()
            .filter(|r| r.is_editable())
            .count();
        stat_card(
            ui,
            "Urlaubstage genehmigt",
            &approved_days(&app.my_vacation_requests, year).to_string(),
            &format!("im Jahr {year}"),
            None,
        );
        stat_card(
            ui,
            "Offene Anträge",
            &pending.to_string(),
            "warten auf Prüfung",
            (pending > 0).then_some(colors::WARNING),
        );
        stat_card(
            ui,
            "Rolle",
            session.employee.role_name(),
            &format!("{} Berechtigungen", session.rights.access_rights.len()),
            None,
        );
    });

    ui.add_space(20.0);

    ui.horizontal(|ui| {
        ui.add_space(10.0);
        ui.vertical(|ui| {
            section(ui, "Letzte Aktivitäten", |ui| {
                ScrollArea::vertical().max_height(180.0).show(ui, |ui| {
                    if app.log_messages.is_empty() {
                        ui.label(RichText::new("Keine Aktivitäten").weak());
                    }
                    for entry in app.log_messages.iter().rev().take(15) {
                        let color = match entry.level {
                            LogLevel::Info => Color32::GRAY,
                            LogLevel::Success => colors::SUCCESS,
                            LogLevel::Warning => colors::WARNING,
                            LogLevel::Error => colors::ERROR,
                        };

                        ui.horizontal(|ui| {
                            ui.label(
                                RichText::new(entry.timestamp.format("%H:%M:%S").to_string())
                                    .small()
                                    .color(Color32::DARK_GRAY),
                            );
                            ui.label(RichText::new(&entry.message).color(color));
                        });
                    }
                });

                if !app.log_messages.is_empty() {
                    ui.add_space(5.0);
                    if ui.small_button("Leeren").clicked() {
                        app.clear_log();
                    }
                }
            });
        });
    });

    next_panel
}
