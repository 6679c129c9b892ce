//! Vacation request ("Urlaubsantrag") DTO.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Review state of a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VacationStatus {
    #[default]
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "genehmigt")]
    Approved,
    #[serde(rename = "abgelehnt")]
    Rejected,
}

impl VacationStatus {
    pub const ALL: [VacationStatus; 3] = [Self::Pending, Self::Approved, Self::Rejected];

    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Ausstehend",
            Self::Approved => "Genehmigt",
            Self::Rejected => "Abgelehnt",
        }
    }

    /// Ordering used when sorting by status: open requests first.
    pub fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Approved => 1,
            Self::Rejected => 2,
        }
    }
}

impl fmt::Display for VacationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Vacation request as exchanged with `/urlaubsantrag/*`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VacationRequest {
    #[serde(default)]
    pub antrags_id: Option<i32>,
    /// Set by the server from the session on create.
    pub employee_id: i32,
    pub start_datum: NaiveDate,
    pub end_datum: NaiveDate,
    pub status: VacationStatus,
    #[serde(rename = "type")]
    pub kind: String,
    pub grund: String,
    #[serde(default)]
    pub review_date: Option<NaiveDate>,
    #[serde(default)]
    pub reviewer_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl VacationRequest {
    /// Number of calendar days covered, both ends inclusive.
    pub fn day_count(&self) -> i64 {
        (self.end_datum - self.start_datum).num_days() + 1
    }

    /// Only open requests may be edited, deleted or reviewed.
    pub fn is_editable(&self) -> bool {
        self.status == VacationStatus::Pending
    }

    /// Whether `date` falls inside the requested period.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_datum <= date && date <= self.end_datum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request() -> VacationRequest {
        VacationRequest {
            antrags_id: Some(4),
            employee_id: 1001,
            start_datum: date(2025, 7, 1),
            end_datum: date(2025, 7, 14),
            status: VacationStatus::Pending,
            kind: "Erholungsurlaub".into(),
            grund: "Sommer".into(),
            review_date: None,
            reviewer_id: None,
            comment: None,
        }
    }

    #[test]
    fn test_day_count_and_cover() {
        let r = request();
        assert_eq!(r.day_count(), 14);
        assert!(r.covers(date(2025, 7, 1)));
        assert!(r.covers(date(2025, 7, 14)));
        assert!(!r.covers(date(2025, 7, 15)));

        let single = VacationRequest {
            end_datum: r.start_datum,
            ..r
        };
        assert_eq!(single.day_count(), 1);
    }

    #[test]
    fn test_editable_only_when_pending() {
        let mut r = request();
        assert!(r.is_editable());
        r.status = VacationStatus::Approved;
        assert!(!r.is_editable());
        r.status = VacationStatus::Rejected;
        assert!(!r.is_editable());
    }

    #[test]
    fn test_json_shape() {
        let v = serde_json::to_value(request()).unwrap();
        assert_eq!(v["startDatum"], "2025-07-01");
        assert_eq!(v["type"], "Erholungsurlaub");
        assert_eq!(v["status"], "pending");
        assert!(v["reviewDate"].is_null());

        let json = r#"{"antragsId":9,"employeeId":3,"startDatum":"2025-08-01","endDatum":"2025-08-02",
            "status":"genehmigt","type":"Krankheit","grund":"Grippe","reviewDate":"2025-07-30","reviewerId":1,"comment":"ok"}"#;
        let r: VacationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(r.status, VacationStatus::Approved);
        assert_eq!(r.review_date, Some(date(2025, 7, 30)));
    }
}
