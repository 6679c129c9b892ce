//! `urlaubsantrag/*` endpoints.

use super::ApiClient;
use crate::error::{AppError, Result};
use crate::models::VacationRequest;
use crate::vacation::{ReviewDecision, review};
use chrono::NaiveDate;
use reqwest::Method;

impl ApiClient {
    /// All requests (managers only).
    pub async fn vacation_requests(&self) -> Result<Vec<VacationRequest>> {
        self.get_list("urlaubsantrag/all").await
    }

    /// Requests of the logged-in employee.
    pub async fn my_vacation_requests(&self) -> Result<Vec<VacationRequest>> {
        self.get_list("urlaubsantrag/user").await
    }

    pub async fn vacation_request(&self, id: i32) -> Result<VacationRequest> {
        self.get_json(&format!("urlaubsantrag/get/{id}")).await
    }

    pub async fn add_vacation_request(&self, request: &VacationRequest) -> Result<()> {
        self.send_json(Method::POST, "urlaubsantrag/add", request).await?;
        Ok(())
    }

    pub async fn update_vacation_request(&self, request: &VacationRequest) -> Result<()> {
        self.send_json(Method::PUT, "urlaubsantrag/update", request).await?;
        Ok(())
    }

    pub async fn delete_vacation_request(&self, id: i32) -> Result<()> {
        self.send_empty(Method::DELETE, &format!("urlaubsantrag/delete/{id}")).await?;
        Ok(())
    }

    /// Approve or reject a request.
    ///
    /// The current request is fetched first so the review carries the
    /// server's copy of every other field.
    pub async fn review_vacation_request(
        &self,
        id: i32,
        decision: ReviewDecision,
        reviewer_id: i32,
        comment: &str,
        today: NaiveDate,
    ) -> Result<VacationRequest> {
        let current = self.vacation_request(id).await?;
        let reviewed = review(&current, decision, reviewer_id, comment, today)
            .map_err(|e| AppError::validation(e.to_string()))?;
        self.send_json(Method::PUT, "urlaubsantrag/review", &reviewed).await?;
        tracing::info!("Vacation request {id} {}", reviewed.status.label());
        Ok(reviewed)
    }
}
