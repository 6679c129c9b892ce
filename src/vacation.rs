//! Vacation request workflow: form validation, review and the manager table.
//!
//! Requests move from `pending` to `genehmigt` or `abgelehnt` exactly once.
//! Everything here is pure; the client module sends the results.

use chrono::NaiveDate;
use std::cmp::Ordering;
use thiserror::Error;

use crate::models::{VacationRequest, VacationStatus};

/// Request types accepted by the backend.
pub const VACATION_TYPES: [&str; 9] = [
    "Erholungsurlaub",
    "Krankheit",
    "Bildungsurlaub",
    "Mutterschutz",
    "Elternzeit",
    "Pflegezeit",
    "Unbezahlter Urlaub",
    "Sonderurlaub",
    "Sonstiges",
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VacationError {
    #[error("Bitte wählen Sie ein Startdatum")]
    MissingStart,

    #[error("Bitte wählen Sie ein Enddatum")]
    MissingEnd,

    #[error("Bitte wählen Sie eine Art des Urlaubsantrags")]
    MissingType,

    #[error("Bitte geben Sie einen Grund für den Urlaubsantrag an")]
    MissingReason,

    #[error("Das Enddatum muss nach dem Startdatum liegen")]
    EndBeforeStart,

    #[error("Das Startdatum darf nicht in der Vergangenheit liegen")]
    StartInPast,

    #[error("Antrag ID ist ungültig - kann nicht bearbeitet werden")]
    MissingId,

    #[error("Nur ausstehende Anträge können geändert werden")]
    NotPending,
}

/// State of the new/edit request dialog.
#[derive(Debug, Clone, Default)]
pub struct VacationForm {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub kind: Option<String>,
    pub grund: String,
    pub comment: String,
    /// Request being edited; `None` for a new request.
    pub original: Option<VacationRequest>,
}

impl VacationForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn edit(&mut self, request: &VacationRequest) {
        self.start = Some(request.start_datum);
        self.end = Some(request.end_datum);
        self.kind = Some(request.kind.clone());
        self.grund = request.grund.clone();
        self.comment = request.comment.clone().unwrap_or_default();
        self.original = Some(request.clone());
    }

    pub fn is_edit(&self) -> bool {
        self.original.is_some()
    }

    /// Days covered by the current selection, if both dates are set and ordered.
    pub fn day_count(&self) -> Option<i64> {
        match (self.start, self.end) {
            (Some(s), Some(e)) if e >= s => Some((e - s).num_days() + 1),
            _ => None,
        }
    }

    /// Validate and build the request to send.
    ///
    /// New requests carry employee ID 0; the server takes the ID from the
    /// session. Edits keep the original ID, owner and review fields.
    pub fn validate(&self, today: NaiveDate) -> Result<VacationRequest, VacationError> {
        let start = self.start.ok_or(VacationError::MissingStart)?;
        let end = self.end.ok_or(VacationError::MissingEnd)?;
        let kind = self
            .kind
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(VacationError::MissingType)?;
        let grund = self.grund.trim();
        if grund.is_empty() {
            return Err(VacationError::MissingReason);
        }
        if end < start {
            return Err(VacationError::EndBeforeStart);
        }
        if start < today {
            return Err(VacationError::StartInPast);
        }

        let comment = Some(self.comment.trim().to_string()).filter(|c| !c.is_empty());

        match &self.original {
            Some(original) => {
                if !original.is_editable() {
                    return Err(VacationError::NotPending);
                }
                Ok(VacationRequest {
                    start_datum: start,
                    end_datum: end,
                    kind: kind.to_string(),
                    grund: grund.to_string(),
                    comment,
                    ..original.clone()
                })
            }
            None => Ok(VacationRequest {
                antrags_id: None,
                employee_id: 0,
                start_datum: start,
                end_datum: end,
                status: VacationStatus::Pending,
                kind: kind.to_string(),
                grund: grund.to_string(),
                review_date: None,
                reviewer_id: None,
                comment,
            }),
        }
    }
}

/// Manager decision on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    pub fn status(self) -> VacationStatus {
        match self {
            Self::Approve => VacationStatus::Approved,
            Self::Reject => VacationStatus::Rejected,
        }
    }
}

/// Apply a review to a pending request.
///
/// A blank comment keeps the request's existing comment.
pub fn review(
    request: &VacationRequest,
    decision: ReviewDecision,
    reviewer_id: i32,
    comment: &str,
    today: NaiveDate,
) -> Result<VacationRequest, VacationError> {
    if request.antrags_id.is_none() {
        return Err(VacationError::MissingId);
    }
    if !request.is_editable() {
        return Err(VacationError::NotPending);
    }

    let comment = comment.trim();
    Ok(VacationRequest {
        status: decision.status(),
        review_date: Some(today),
        reviewer_id: Some(reviewer_id),
        comment: if comment.is_empty() {
            request.comment.clone()
        } else {
            Some(comment.to_string())
        },
        ..request.clone()
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Submission order (request ID).
    #[default]
    Submitted,
    StartDate,
    Employee,
    Status,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [Self::Submitted, Self::StartDate, Self::Employee, Self::Status];

    pub fn label(self) -> &'static str {
        match self {
            Self::Submitted => "Eingangsdatum",
            Self::StartDate => "Startdatum",
            Self::Employee => "Mitarbeiter",
            Self::Status => "Status",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Filter and sort settings of the manager table.
#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    pub status: Option<VacationStatus>,
    pub employee_id: Option<i32>,
    /// Only requests covering this day.
    pub date: Option<NaiveDate>,
    pub sort: SortKey,
    pub order: SortOrder,
}

impl RequestFilter {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, request: &VacationRequest) -> bool {
        self.status.is_none_or(|s| request.status == s)
            && self.employee_id.is_none_or(|id| request.employee_id == id)
            && self.date.is_none_or(|d| request.covers(d))
    }

    /// Filtered and sorted copy of `requests`.
    ///
    /// `employee_name` resolves IDs for sorting by employee.
    pub fn apply<F>(&self, requests: &[VacationRequest], employee_name: F) -> Vec<VacationRequest>
    where
        F: Fn(i32) -> String,
    {
        let mut out: Vec<VacationRequest> = requests.iter().filter(|r| self.matches(r)).cloned().collect();

        out.sort_by(|a, b| {
            let ord = match self.sort {
                SortKey::Submitted => a.antrags_id.cmp(&b.antrags_id),
                SortKey::StartDate => a.start_datum.cmp(&b.start_datum),
                SortKey::Employee => employee_name(a.employee_id).cmp(&employee_name(b.employee_id)),
                SortKey::Status => a.status.rank().cmp(&b.status.rank()),
            };
            match self.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
            .then_with(|| tie_break(a, b))
        });
        out
    }
}

fn tie_break(a: &VacationRequest, b: &VacationRequest) -> Ordering {
    a.antrags_id.cmp(&b.antrags_id)
}

/// Requests per status, for the summary chips.
pub fn count_by_status(requests: &[VacationRequest], status: VacationStatus) -> usize {
    requests.iter().filter(|r| r.status == status).count()
}

/// Approved days starting in `year`.
pub fn approved_days(requests: &[VacationRequest], year: i32) -> i64 {
    use chrono::Datelike;
    requests
        .iter()
        .filter(|r| r.status == VacationStatus::Approved && r.start_datum.year() == year)
        .map(VacationRequest::day_count)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2025, 6, 10)
    }

    fn filled_form() -> VacationForm {
        VacationForm {
            start: Some(date(2025, 7, 1)),
            end: Some(date(2025, 7, 5)),
            kind: Some("Erholungsurlaub".into()),
            grund: "  Familienbesuch ".into(),
            comment: " ".into(),
            original: None,
        }
    }

    fn request(id: i32, employee: i32, start: NaiveDate, end: NaiveDate, status: VacationStatus) -> VacationRequest {
        VacationRequest {
            antrags_id: Some(id),
            employee_id: employee,
            start_datum: start,
            end_datum: end,
            status,
            kind: "Erholungsurlaub".into(),
            grund: "Urlaub".into(),
            review_date: None,
            reviewer_id: None,
            comment: None,
        }
    }

    #[test]
    fn test_validation_order() {
        let mut form = VacationForm::default();
        assert_eq!(form.validate(today()), Err(VacationError::MissingStart));

        form.start = Some(date(2025, 6, 1));
        assert_eq!(form.validate(today()), Err(VacationError::MissingEnd));

        form.end = Some(date(2025, 5, 1));
        assert_eq!(form.validate(today()), Err(VacationError::MissingType));

        form.kind = Some("Krankheit".into());
        form.grund = "   ".into();
        assert_eq!(form.validate(today()), Err(VacationError::MissingReason));

        form.grund = "Grippe".into();
        assert_eq!(form.validate(today()), Err(VacationError::EndBeforeStart));

        form.end = Some(date(2025, 6, 2));
        assert_eq!(form.validate(today()), Err(VacationError::StartInPast));
        assert_eq!(
            VacationError::StartInPast.to_string(),
            "Das Startdatum darf nicht in der Vergangenheit liegen"
        );
    }

    #[test]
    fn test_valid_new_request() {
        let req = filled_form().validate(today()).unwrap();
        assert_eq!(req.status, VacationStatus::Pending);
        assert_eq!(req.employee_id, 0);
        assert_eq!(req.antrags_id, None);
        assert_eq!(req.grund, "Familienbesuch");
        assert_eq!(req.comment, None);
        assert_eq!(req.day_count(), 5);
    }

    #[test]
    fn test_start_today_and_single_day_allowed() {
        let mut form = filled_form();
        form.start = Some(today());
        form.end = Some(today());
        assert!(form.validate(today()).is_ok());
        assert_eq!(form.day_count(), Some(1));
    }

    #[test]
    fn test_edit_keeps_identity() {
        let original = request(7, 1001, date(2025, 7, 1), date(2025, 7, 3), VacationStatus::Pending);
        let mut form = VacationForm::default();
        form.edit(&original);
        form.end = Some(date(2025, 7, 4));
        form.comment = "Bitte prüfen".into();

        let updated = form.validate(today()).unwrap();
        assert_eq!(updated.antrags_id, Some(7));
        assert_eq!(updated.employee_id, 1001);
        assert_eq!(updated.end_datum, date(2025, 7, 4));
        assert_eq!(updated.comment.as_deref(), Some("Bitte prüfen"));

        let approved = VacationRequest {
            status: VacationStatus::Approved,
            ..original
        };
        form.edit(&approved);
        assert_eq!(form.validate(today()), Err(VacationError::NotPending));
    }

    #[test]
    fn test_review() {
        let mut pending = request(3, 5, date(2025, 7, 1), date(2025, 7, 2), VacationStatus::Pending);
        pending.comment = Some("Urlaub mit Familie".into());

        let approved = review(&pending, ReviewDecision::Approve, 1, "  ", today()).unwrap();
        assert_eq!(approved.status, VacationStatus::Approved);
        assert_eq!(approved.review_date, Some(today()));
        assert_eq!(approved.reviewer_id, Some(1));
        assert_eq!(approved.comment.as_deref(), Some("Urlaub mit Familie"));

        let rejected = review(&pending, ReviewDecision::Reject, 1, "Engpass", today()).unwrap();
        assert_eq!(rejected.status, VacationStatus::Rejected);
        assert_eq!(rejected.comment.as_deref(), Some("Engpass"));

        assert_eq!(
            review(&approved, ReviewDecision::Reject, 1, "", today()),
            Err(VacationError::NotPending)
        );

        let unsaved = VacationRequest {
            antrags_id: None,
            ..pending
        };
        assert_eq!(
            review(&unsaved, ReviewDecision::Approve, 1, "", today()),
            Err(VacationError::MissingId)
        );
    }

    fn sample_requests() -> Vec<VacationRequest> {
        vec![
            request(1, 10, date(2025, 7, 10), date(2025, 7, 20), VacationStatus::Approved),
            request(2, 20, date(2025, 7, 1), date(2025, 7, 3), VacationStatus::Pending),
            request(3, 10, date(2025, 8, 1), date(2025, 8, 2), VacationStatus::Rejected),
        ]
    }

    fn name(id: i32) -> String {
        match id {
            10 => "Zoe".to_string(),
            20 => "Anna".to_string(),
            _ => "?".to_string(),
        }
    }

    fn ids(list: &[VacationRequest]) -> Vec<i32> {
        list.iter().filter_map(|r| r.antrags_id).collect()
    }

    #[test]
    fn test_filters() {
        let requests = sample_requests();
        let mut filter = RequestFilter::default();
        assert_eq!(ids(&filter.apply(&requests, name)), [3, 2, 1]);

        filter.status = Some(VacationStatus::Pending);
        assert_eq!(ids(&filter.apply(&requests, name)), [2]);

        filter.status = None;
        filter.employee_id = Some(10);
        assert_eq!(ids(&filter.apply(&requests, name)), [3, 1]);

        filter.employee_id = None;
        filter.date = Some(date(2025, 7, 20));
        assert_eq!(ids(&filter.apply(&requests, name)), [1]);

        filter.date = Some(date(2025, 7, 5));
        assert!(filter.apply(&requests, name).is_empty());

        filter.reset();
        assert!(filter.date.is_none());
    }

    #[test]
    fn test_sorting() {
        let requests = sample_requests();
        let mut filter = RequestFilter {
            sort: SortKey::StartDate,
            order: SortOrder::Asc,
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&requests, name)), [2, 1, 3]);

        filter.sort = SortKey::Employee;
        assert_eq!(ids(&filter.apply(&requests, name)), [2, 1, 3]);

        filter.sort = SortKey::Status;
        assert_eq!(ids(&filter.apply(&requests, name)), [2, 1, 3]);

        filter.order = SortOrder::Desc;
        assert_eq!(ids(&filter.apply(&requests, name)), [3, 1, 2]);
    }

    #[test]
    fn test_summaries() {
        let requests = sample_requests();
        assert_eq!(count_by_status(&requests, VacationStatus::Pending), 1);
        assert_eq!(approved_days(&requests, 2025), 11);
        assert_eq!(approved_days(&requests, 2024), 0);
    }
}
