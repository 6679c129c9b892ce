//! Finance overview: revenue, transaction count and average sale for a
//! period, compared with the period right before it.

use chrono::{DateTime, Days, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use std::collections::BTreeMap;

use crate::error::{AppError, Result};
use crate::models::Order;

/// Period selectable on the finance screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeRange {
    #[default]
    Today,
    /// Today and the six days before.
    Week,
    /// Today and the 29 days before.
    Month,
    Custom { start: NaiveDate, end: NaiveDate },
}

impl TimeRange {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Today => "Heute",
            Self::Week => "Letzte 7 Tage",
            Self::Month => "Letzte 30 Tage",
            Self::Custom { .. } => "Benutzerdefiniert",
        }
    }

    /// Inclusive day range relative to `today`.
    pub fn period(&self, today: NaiveDate) -> Result<DayRange> {
        match *self {
            Self::Today => Ok(DayRange::new(today, today)),
            Self::Week => Ok(DayRange::ending(today, 7)),
            Self::Month => Ok(DayRange::ending(today, 30)),
            Self::Custom { start, end } => {
                if end < start {
                    return Err(AppError::validation("Das Enddatum muss nach dem Startdatum liegen"));
                }
                Ok(DayRange::new(start, end))
            }
        }
    }

    /// Suffix for change labels; custom ranges show none.
    fn comparison_suffix(&self) -> Option<&'static str> {
        match self {
            Self::Today => Some("seit gestern"),
            Self::Week => Some("seit letzter Woche"),
            Self::Month => Some("seit letztem Monat"),
            Self::Custom { .. } => None,
        }
    }
}

/// Inclusive range of local calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DayRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `days` days ending with `end`.
    fn ending(end: NaiveDate, days: u64) -> Self {
        let start = end.checked_sub_days(Days::new(days.saturating_sub(1))).unwrap_or(end);
        Self { start, end }
    }

    pub fn days(&self) -> u64 {
        ((self.end - self.start).num_days() + 1).max(0) as u64
    }

    /// The equally long range ending the day before `start`.
    pub fn previous(&self) -> Self {
        let end = self.start.pred_opt().unwrap_or(self.start);
        Self::ending(end, self.days())
    }

    /// First instant of `start` in local time.
    pub fn start_instant(&self) -> DateTime<Utc> {
        local_to_utc(self.start.and_time(NaiveTime::MIN))
    }

    /// Last millisecond of `end` in local time.
    pub fn end_instant(&self) -> DateTime<Utc> {
        let last = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
        local_to_utc(self.end.and_time(last))
    }

    pub fn label(&self) -> String {
        if self.start == self.end {
            self.start.format("%d.%m.%Y").to_string()
        } else {
            format!("{} – {}", self.start.format("%d.%m.%Y"), self.end.format("%d.%m.%Y"))
        }
    }
}

fn local_to_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

/// Totals over a set of orders.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FinanceSummary {
    pub total: f64,
    pub count: usize,
    pub average: f64,
}

impl FinanceSummary {
    pub fn from_orders(orders: &[Order]) -> Self {
        let total: f64 = orders.iter().map(|o| o.total_price).sum();
        let count = orders.len();
        let average = if count > 0 { total / count as f64 } else { 0.0 };
        Self { total, count, average }
    }
}

/// Relative change in percent; 0 when there is nothing to compare with.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous * 100.0
    }
}

/// Change label such as "+12.5% seit gestern".
pub fn change_label(range: &TimeRange, current: f64, previous: f64) -> String {
    let Some(suffix) = range.comparison_suffix() else {
        return String::new();
    };
    if previous == 0.0 {
        return "-".to_string();
    }
    let percent = percent_change(current, previous);
    let sign = if percent >= 0.0 { "+" } else { "" };
    format!("{sign}{percent:.1}% {suffix}")
}

/// Loaded finance data for one period and its predecessor.
#[derive(Debug, Clone)]
pub struct FinanceReport {
    pub range: TimeRange,
    pub period: DayRange,
    pub orders: Vec<Order>,
    pub current: FinanceSummary,
    pub previous: FinanceSummary,
}

/// One KPI with its comparison label.
#[derive(Debug, Clone, PartialEq)]
pub struct Kpi {
    pub value: f64,
    pub percent: f64,
    pub label: String,
}

impl FinanceReport {
    pub fn new(range: TimeRange, period: DayRange, orders: Vec<Order>, previous_orders: &[Order]) -> Self {
        let current = FinanceSummary::from_orders(&orders);
        let previous = FinanceSummary::from_orders(previous_orders);
        Self {
            range,
            period,
            orders,
            current,
            previous,
        }
    }

    fn kpi(&self, current: f64, previous: f64) -> Kpi {
        Kpi {
            value: current,
            percent: percent_change(current, previous),
            label: change_label(&self.range, current, previous),
        }
    }

    pub fn revenue(&self) -> Kpi {
        self.kpi(self.current.total, self.previous.total)
    }

    pub fn transactions(&self) -> Kpi {
        self.kpi(self.current.count as f64, self.previous.count as f64)
    }

    pub fn average(&self) -> Kpi {
        self.kpi(self.current.average, self.previous.average)
    }

    /// Revenue per local calendar day, date-sorted.
    pub fn revenue_per_day(&self) -> Vec<(NaiveDate, f64)> {
        let mut days: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for order in &self.orders {
            let day = order.date.with_timezone(&Local).date_naive();
            *days.entry(day).or_default() += order.total_price;
        }
        days.into_iter().collect()
    }

    /// Revenue and sale count per cashier, highest revenue first.
    pub fn revenue_per_employee(&self) -> Vec<(Option<i32>, f64, usize)> {
        let mut by_employee: BTreeMap<Option<i32>, (f64, usize)> = BTreeMap::new();
        for order in &self.orders {
            let entry = by_employee.entry(order.employee_id).or_default();
            entry.0 += order.total_price;
            entry.1 += 1;
        }
        let mut rows: Vec<_> = by_employee
            .into_iter()
            .map(|(id, (total, count))| (id, total, count))
            .collect();
        rows.sort_by(|a, b| b.1.total_cmp(&a.1));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn order(total: f64, employee: Option<i32>, day: u32) -> Order {
        Order {
            order_id: None,
            product_names: vec!["x".into()],
            total_price: total,
            date: local_to_utc(date(2025, 3, day).and_hms_opt(12, 0, 0).unwrap()),
            employee_id: employee,
        }
    }

    #[test]
    fn test_periods() {
        let today = date(2025, 3, 15);
        assert_eq!(TimeRange::Today.period(today).unwrap(), DayRange::new(today, today));
        assert_eq!(TimeRange::Week.period(today).unwrap(), DayRange::new(date(2025, 3, 9), today));
        assert_eq!(TimeRange::Month.period(today).unwrap(), DayRange::new(date(2025, 2, 14), today));

        let custom = TimeRange::Custom {
            start: date(2025, 1, 1),
            end: date(2025, 1, 10),
        };
        assert_eq!(custom.period(today).unwrap().days(), 10);

        let reversed = TimeRange::Custom {
            start: date(2025, 1, 10),
            end: date(2025, 1, 1),
        };
        assert!(reversed.period(today).is_err());
    }

    #[test]
    fn test_previous_periods() {
        let today = date(2025, 3, 15);
        let day = TimeRange::Today.period(today).unwrap();
        assert_eq!(day.previous(), DayRange::new(date(2025, 3, 14), date(2025, 3, 14)));

        let week = TimeRange::Week.period(today).unwrap();
        assert_eq!(week.previous(), DayRange::new(date(2025, 3, 2), date(2025, 3, 8)));

        let month = TimeRange::Month.period(today).unwrap();
        assert_eq!(month.previous(), DayRange::new(date(2025, 1, 15), date(2025, 2, 13)));

        let custom = DayRange::new(date(2025, 1, 1), date(2025, 1, 10));
        assert_eq!(custom.previous(), DayRange::new(date(2024, 12, 22), date(2024, 12, 31)));
    }

    #[test]
    fn test_instants_cover_whole_days() {
        let range = DayRange::new(date(2025, 3, 10), date(2025, 3, 10));
        assert!(range.start_instant() < range.end_instant());
        let span = range.end_instant() - range.start_instant();
        assert!(span.num_hours() >= 22 && span.num_hours() <= 24);
    }

    #[test]
    fn test_summary() {
        let orders = vec![order(10.0, Some(1), 1), order(30.0, Some(2), 1)];
        let s = FinanceSummary::from_orders(&orders);
        assert_eq!(s.total, 40.0);
        assert_eq!(s.count, 2);
        assert_eq!(s.average, 20.0);

        assert_eq!(FinanceSummary::from_orders(&[]), FinanceSummary::default());
    }

    #[test]
    fn test_percent_and_labels() {
        assert_eq!(percent_change(150.0, 100.0), 50.0);
        assert_eq!(percent_change(50.0, 100.0), -50.0);
        assert_eq!(percent_change(50.0, 0.0), 0.0);

        assert_eq!(change_label(&TimeRange::Today, 112.5, 100.0), "+12.5% seit gestern");
        assert_eq!(change_label(&TimeRange::Week, 90.0, 100.0), "-10.0% seit letzter Woche");
        assert_eq!(change_label(&TimeRange::Month, 100.0, 100.0), "+0.0% seit letztem Monat");
        assert_eq!(change_label(&TimeRange::Today, 10.0, 0.0), "-");

        let custom = TimeRange::Custom {
            start: date(2025, 1, 1),
            end: date(2025, 1, 2),
        };
        assert_eq!(change_label(&custom, 10.0, 5.0), "");
    }

    #[test]
    fn test_report() {
        let period = DayRange::new(date(2025, 3, 1), date(2025, 3, 2));
        let current = vec![order(10.0, Some(1), 1), order(5.0, Some(2), 2), order(20.0, Some(2), 2)];
        let previous = vec![order(20.0, Some(1), 1)];
        let report = FinanceReport::new(TimeRange::Week, period, current, &previous);

        assert_eq!(report.revenue().value, 35.0);
        assert_eq!(report.revenue().label, "+75.0% seit letzter Woche");
        assert_eq!(report.transactions().percent, 200.0);
        assert!((report.average().value - 35.0 / 3.0).abs() < 1e-9);

        let per_day = report.revenue_per_day();
        assert_eq!(per_day, vec![(date(2025, 3, 1), 10.0), (date(2025, 3, 2), 25.0)]);

        let per_employee = report.revenue_per_employee();
        assert_eq!(per_employee[0], (Some(2), 25.0, 2));
        assert_eq!(per_employee[1], (Some(1), 10.0, 1));
    }
}
