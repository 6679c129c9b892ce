//! Product analytics: best-seller windows, sales per day and price history.

use chrono::{DateTime, Datelike, Days, Local, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use std::collections::BTreeMap;

use crate::models::{BestSellingProduct, PriceHistory};

/// Time windows offered for the best-seller card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BestSellerWindow {
    #[default]
    LastWeek,
    LastMonth,
    LastYear,
    /// Jan 1 to Dec 31 of the previous calendar year.
    LastFiscalYear,
    AllTime,
}

impl BestSellerWindow {
    pub const ALL: [BestSellerWindow; 5] = [
        Self::LastWeek,
        Self::LastMonth,
        Self::LastYear,
        Self::LastFiscalYear,
        Self::AllTime,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::LastWeek => "Letzte Woche",
            Self::LastMonth => "Letzter Monat",
            Self::LastYear => "Letztes Jahr",
            Self::LastFiscalYear => "Letztes Geschäftsjahr",
            Self::AllTime => "Gesamter Zeitraum",
        }
    }

    /// Query bounds for this window as seen at `now` (local time).
    pub fn bounds(self, now: DateTime<Local>) -> (DateTime<Utc>, DateTime<Utc>) {
        let today = now.date_naive();
        let (start, end) = match self {
            Self::LastWeek => (local_midnight(today - Days::new(7)), now),
            Self::LastMonth => (
                local_midnight(today.checked_sub_months(Months::new(1)).unwrap_or(today)),
                now,
            ),
            Self::LastYear => (
                local_midnight(today.checked_sub_months(Months::new(12)).unwrap_or(today)),
                now,
            ),
            Self::LastFiscalYear => {
                let year = today.year() - 1;
                let first = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(today);
                let last = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(today);
                (local_midnight(first), local_end_of_day(last))
            }
            Self::AllTime => (
                local_midnight(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(today)),
                now,
            ),
        };
        (start.with_timezone(&Utc), end.with_timezone(&Utc))
    }
}

fn local_midnight(date: NaiveDate) -> DateTime<Local> {
    let naive = date.and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| Local.from_utc_datetime(&naive))
}

fn local_end_of_day(date: NaiveDate) -> DateTime<Local> {
    let naive = date.and_time(NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN));
    Local
        .from_local_datetime(&naive)
        .latest()
        .unwrap_or_else(|| Local.from_utc_datetime(&naive))
}

/// Number of sales per UTC calendar day, date-sorted.
///
/// When all sales fall on one day and the reported total is higher than the
/// number of timestamps, the total is used for that day.
pub fn sales_per_day(product: &BestSellingProduct) -> Vec<(NaiveDate, u32)> {
    let mut days: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for date in &product.dates {
        *days.entry(date.date_naive()).or_default() += 1;
    }

    let mut out: Vec<(NaiveDate, u32)> = days.into_iter().collect();
    if let [(_, count)] = out.as_mut_slice() {
        let total = u32::try_from(product.total_quantity).unwrap_or(0);
        if total > *count {
            *count = total;
        }
    }
    out
}

/// Price history ordered by change date, oldest first.
pub fn sorted_price_history(mut history: Vec<PriceHistory>) -> Vec<PriceHistory> {
    history.sort_by_key(|entry| entry.changed_date);
    history
}

/// The entry marked active, or the most recent one.
pub fn current_price(history: &[PriceHistory]) -> Option<&PriceHistory> {
    history
        .iter()
        .find(|entry| entry.active)
        .or_else(|| history.iter().max_by_key(|entry| entry.changed_date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn best(dates: Vec<DateTime<Utc>>, total: i32) -> BestSellingProduct {
        BestSellingProduct {
            product_name: "Kaffee".into(),
            product_id: "prod_1".into(),
            dates,
            total_quantity: total,
        }
    }

    #[test]
    fn test_fiscal_year_is_previous_calendar_year() {
        let now = Local.with_ymd_and_hms(2025, 6, 15, 10, 0, 0).unwrap();
        let (start, end) = BestSellerWindow::LastFiscalYear.bounds(now);
        let start_local = start.with_timezone(&Local);
        let end_local = end.with_timezone(&Local);
        assert_eq!(start_local.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(end_local.date_naive(), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn test_rolling_windows_end_now() {
        let now = Local.with_ymd_and_hms(2025, 3, 31, 10, 0, 0).unwrap();

        let (start, end) = BestSellerWindow::LastWeek.bounds(now);
        assert_eq!(end, now.with_timezone(&Utc));
        assert_eq!(start.with_timezone(&Local).date_naive(), NaiveDate::from_ymd_opt(2025, 3, 24).unwrap());

        let (start, _) = BestSellerWindow::LastMonth.bounds(now);
        assert_eq!(start.with_timezone(&Local).date_naive(), NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());

        let (start, _) = BestSellerWindow::AllTime.bounds(now);
        assert_eq!(start.with_timezone(&Local).date_naive(), NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
    }

    #[test]
    fn test_sales_per_day_sorted() {
        let product = best(vec![ts(2025, 1, 3, 9), ts(2025, 1, 1, 8), ts(2025, 1, 3, 17)], 3);
        let days = sales_per_day(&product);
        assert_eq!(
            days,
            vec![
                (NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), 1),
                (NaiveDate::from_ymd_opt(2025, 1, 3).unwrap(), 2),
            ]
        );
    }

    #[test]
    fn test_single_day_uses_total_quantity() {
        let product = best(vec![ts(2025, 1, 3, 9)], 5);
        assert_eq!(sales_per_day(&product), vec![(NaiveDate::from_ymd_opt(2025, 1, 3).unwrap(), 5)]);

        assert!(sales_per_day(&best(vec![], 0)).is_empty());
    }

    #[test]
    fn test_price_history_order() {
        let entry = |day: u32, active: bool, price: f64| PriceHistory {
            list_price: price,
            cost_price: price / 2.0,
            changed_date: ts(2025, 1, day, 0),
            active,
            currency: "eur".into(),
        };
        let sorted = sorted_price_history(vec![entry(5, true, 3.0), entry(1, false, 2.0)]);
        assert_eq!(sorted[0].list_price, 2.0);
        assert_eq!(current_price(&sorted).map(|e| e.list_price), Some(3.0));

        let none_active = vec![entry(1, false, 2.0), entry(9, false, 4.0)];
        assert_eq!(current_price(&none_active).map(|e| e.list_price), Some(4.0));
    }
}
