//! Excel export functionality.

use crate::finance::FinanceReport;
use crate::models::employee::name_for_id;
use crate::models::{Employee, Order, Product, Stock, VacationRequest};
use chrono::Local;
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, Worksheet, XlsxError};
use std::path::{Path, PathBuf};

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x4472C4))
        .set_font_color(Color::White)
        .set_border(FormatBorder::Thin)
}

/// Write the header row and set column widths.
fn write_header(worksheet: &mut Worksheet, columns: &[(&str, f64)]) -> Result<(), XlsxError> {
    let format = header_format();
    for (col, (header, width)) in columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &format)?;
        worksheet.set_column_width(col as u16, *width)?;
    }
    Ok(())
}

/// Autofilter over the data and freeze the header row.
fn finish_sheet(worksheet: &mut Worksheet, rows: usize, columns: usize) -> Result<(), XlsxError> {
    if rows > 0 && columns > 0 {
        worksheet.autofilter(0, 0, rows as u32, (columns - 1) as u16)?;
    }
    worksheet.set_freeze_panes(1, 0)?;
    Ok(())
}

fn products_workbook(products: &[Product], stocks: &[Stock]) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Produkte")?;

    let money = Format::new().set_num_format("0.00");
    let columns = [
        ("Produktname", 30.0),
        ("Beschreibung", 40.0),
        ("EAN", 16.0),
        ("Verkaufspreis", 14.0),
        ("Einkaufspreis", 14.0),
        ("Marge %", 10.0),
        ("Währung", 9.0),
        ("Bestand", 10.0),
        ("Status", 10.0),
    ];
    write_header(worksheet, &columns)?;

    for (idx, product) in products.iter().enumerate() {
        let row = (idx + 1) as u32;
        worksheet.write_string(row, 0, &product.product_name)?;
        worksheet.write_string(row, 1, &product.product_description)?;
        worksheet.write_string(row, 2, &product.upc_code)?;
        worksheet.write_number_with_format(row, 3, product.list_price, &money)?;
        worksheet.write_number_with_format(row, 4, product.cost_price, &money)?;
        worksheet.write_number_with_format(row, 5, product.margin_percent(), &money)?;
        worksheet.write_string(row, 6, product.currency.to_uppercase())?;

        // Products without a stock record leave the cell empty
        if let Some(stock) = stocks.iter().find(|s| s.product_id == product.product_id) {
            worksheet.write_number(row, 7, stock.quantity)?;
        }
        worksheet.write_string(row, 8, product.status_label())?;
    }

    finish_sheet(worksheet, products.len(), columns.len())?;
    Ok(workbook)
}

/// Export the product catalogue with stock levels to Excel file.
pub fn export_products_to_excel(products: &[Product], stocks: &[Stock], path: &Path) -> Result<(), XlsxError> {
    products_workbook(products, stocks)?.save(path)
}

/// KPI rows of the finance summary: name, current, previous, change label.
fn summary_rows(report: &FinanceReport) -> Vec<(&'static str, f64, f64, String)> {
    [
        ("Umsatz", report.revenue(), report.previous.total),
        ("Transaktionen", report.transactions(), report.previous.count as f64),
        ("Ø Verkauf", report.average(), report.previous.average),
    ]
    .into_iter()
    .map(|(name, kpi, previous)| (name, kpi.value, previous, kpi.label))
    .collect()
}

fn write_summary(worksheet: &mut Worksheet, report: &FinanceReport) -> Result<(), XlsxError> {
    worksheet.set_name("Zusammenfassung")?;
    let bold = Format::new().set_bold();
    let money = Format::new().set_num_format("0.00");

    worksheet.write_string_with_format(0, 0, "Zeitraum", &bold)?;
    worksheet.write_string(0, 1, report.range.label())?;
    worksheet.write_string(0, 2, report.period.label())?;

    let columns = [("Kennzahl", 18.0), ("Aktuell", 14.0), ("Vorperiode", 14.0), ("Veränderung", 26.0)];
    let format = header_format();
    for (col, (header, width)) in columns.iter().enumerate() {
        worksheet.write_string_with_format(2, col as u16, *header, &format)?;
        worksheet.set_column_width(col as u16, *width)?;
    }

    for (idx, (name, current, previous, label)) in summary_rows(report).into_iter().enumerate() {
        let row = (idx + 3) as u32;
        worksheet.write_string(row, 0, name)?;
        worksheet.write_number_with_format(row, 1, current, &money)?;
        worksheet.write_number_with_format(row, 2, previous, &money)?;
        worksheet.write_string(row, 3, label)?;
    }
    Ok(())
}

fn orders_workbook(report: &FinanceReport, employees: &[Employee]) -> Result<Workbook, XlsxError> {
    let orders: &[Order] = &report.orders;
    let mut workbook = Workbook::new();
    write_summary(workbook.add_worksheet(), report)?;

    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Verkäufe")?;

    let money = Format::new().set_num_format("0.00");
    let columns = [
        ("Bestellung", 24.0),
        ("Datum", 12.0),
        ("Uhrzeit", 10.0),
        ("Mitarbeiter", 25.0),
        ("Artikel", 9.0),
        ("Produkte", 50.0),
        ("Summe", 12.0),
    ];
    write_header(worksheet, &columns)?;

    for (idx, order) in orders.iter().enumerate() {
        let row = (idx + 1) as u32;
        let local = order.date.with_timezone(&Local);

        worksheet.write_string(row, 0, order.order_id.as_deref().unwrap_or(""))?;
        worksheet.write_string(row, 1, local.format("%Y-%m-%d").to_string())?;
        worksheet.write_string(row, 2, local.format("%H:%M:%S").to_string())?;
        let cashier = order
            .employee_id
            .map(|id| name_for_id(employees, id))
            .unwrap_or_default();
        worksheet.write_string(row, 3, cashier)?;
        worksheet.write_number(row, 4, order.item_count() as u32)?;
        worksheet.write_string(row, 5, order.product_names.join(", "))?;
        worksheet.write_number_with_format(row, 6, order.total_price, &money)?;
    }

    finish_sheet(worksheet, orders.len(), columns.len())?;
    Ok(workbook)
}

/// Export the finance summary and the orders of the period to Excel file.
pub fn export_orders_to_excel(report: &FinanceReport, employees: &[Employee], path: &Path) -> Result<(), XlsxError> {
    orders_workbook(report, employees)?.save(path)
}

fn vacation_workbook(requests: &[VacationRequest], employees: &[Employee]) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Urlaubsanträge")?;

    let columns = [
        ("Antrag", 8.0),
        ("Mitarbeiter", 25.0),
        ("Art", 20.0),
        ("Von", 12.0),
        ("Bis", 12.0),
        ("Tage", 6.0),
        ("Status", 12.0),
        ("Grund", 35.0),
        ("Geprüft am", 12.0),
        ("Geprüft von", 25.0),
        ("Kommentar", 35.0),
    ];
    write_header(worksheet, &columns)?;

    for (idx, request) in requests.iter().enumerate() {
        let row = (idx + 1) as u32;
        if let Some(id) = request.antrags_id {
            worksheet.write_number(row, 0, id)?;
        }
        worksheet.write_string(row, 1, name_for_id(employees, request.employee_id))?;
        worksheet.write_string(row, 2, &request.kind)?;
        worksheet.write_string(row, 3, request.start_datum.to_string())?;
        worksheet.write_string(row, 4, request.end_datum.to_string())?;
        worksheet.write_number(row, 5, request.day_count() as f64)?;
        worksheet.write_string(row, 6, request.status.label())?;
        worksheet.write_string(row, 7, &request.grund)?;
        worksheet.write_string(row, 8, request.review_date.map(|d| d.to_string()).unwrap_or_default())?;
        let reviewer = request
            .reviewer_id
            .map(|id| name_for_id(employees, id))
            .unwrap_or_default();
        worksheet.write_string(row, 9, reviewer)?;
        worksheet.write_string(row, 10, request.comment.as_deref().unwrap_or(""))?;
    }

    finish_sheet(worksheet, requests.len(), columns.len())?;
    Ok(workbook)
}

/// Export vacation requests to Excel file.
pub fn export_vacation_to_excel(
    requests: &[VacationRequest],
    employees: &[Employee],
    path: &Path,
) -> Result<(), XlsxError> {
    vacation_workbook(requests, employees)?.save(path)
}

/// Open save file dialog and return selected path.
pub fn show_save_dialog(default_name: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_file_name(default_name)
        .add_filter("Excel-Dateien", &["xlsx"])
        .save_file()
}

/// Generate default filename for export.
pub fn generate_export_filename(prefix: &str) -> String {
    let now = Local::now();
    format!("{prefix}_{ts}.xlsx", ts = now.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::{DayRange, TimeRange};
    use crate::models::VacationStatus;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn test_generate_export_filename() {
        let name = generate_export_filename("produkte");
        assert!(name.starts_with("produkte_"));
        assert!(name.ends_with(".xlsx"));
        // prefix + '_' + YYYYmmdd_HHMMSS + .xlsx
        assert_eq!(name.len(), "produkte_".len() + 15 + 5);
    }

    #[test]
    fn test_products_workbook() {
        let products = vec![Product {
            product_name: "Kaffee".into(),
            product_id: "prod_1".into(),
            list_price: 8.0,
            cost_price: 4.0,
            currency: "eur".into(),
            ..Default::default()
        }];
        let stocks = vec![Stock::initial("prod_1", 4)];
        let mut workbook = products_workbook(&products, &stocks).unwrap();
        assert!(!workbook.save_to_buffer().unwrap().is_empty());

        let mut empty = products_workbook(&[], &[]).unwrap();
        assert!(!empty.save_to_buffer().unwrap().is_empty());
    }

    fn order(id: &str, total: f64) -> Order {
        Order {
            order_id: Some(id.into()),
            product_names: vec!["Brot".into(), "Milch".into()],
            total_price: total,
            date: Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap(),
            employee_id: Some(1001),
        }
    }

    fn report() -> FinanceReport {
        let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        FinanceReport::new(
            TimeRange::Today,
            DayRange::new(day, day),
            vec![order("o1", 3.5), order("o2", 6.5)],
            &[order("o0", 5.0)],
        )
    }

    #[test]
    fn test_summary_rows_compare_with_previous_period() {
        let rows = summary_rows(&report());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], ("Umsatz", 10.0, 5.0, "+100.0% seit gestern".to_string()));
        assert_eq!(rows[1], ("Transaktionen", 2.0, 1.0, "+100.0% seit gestern".to_string()));
        assert_eq!(rows[2], ("Ø Verkauf", 5.0, 5.0, "+0.0% seit gestern".to_string()));
    }

    #[test]
    fn test_orders_and_vacation_workbooks() {
        let mut workbook = orders_workbook(&report(), &[]).unwrap();
        assert!(workbook.worksheet_from_name("Zusammenfassung").is_ok());
        assert!(workbook.worksheet_from_name("Verkäufe").is_ok());
        assert!(!workbook.save_to_buffer().unwrap().is_empty());

        let requests = vec![VacationRequest {
            antrags_id: Some(1),
            employee_id: 1001,
            start_datum: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            end_datum: NaiveDate::from_ymd_opt(2025, 7, 3).unwrap(),
            status: VacationStatus::Approved,
            kind: "Erholungsurlaub".into(),
            grund: "Urlaub".into(),
            review_date: NaiveDate::from_ymd_opt(2025, 6, 1),
            reviewer_id: Some(1),
            comment: None,
        }];
        let mut workbook = vacation_workbook(&requests, &[]).unwrap();
        assert!(!workbook.save_to_buffer().unwrap().is_empty());
    }
}
