//! `auth/*` endpoints.

use super::ApiClient;
use crate::error::{AppError, Result};
use crate::models::{AccessRights, LoginRequest, SignupRequest};
use reqwest::{Method, StatusCode};

impl ApiClient {
    /// Log in and store the session cookie in the jar.
    pub async fn login(&self, employee_id: i32, password: &str) -> Result<()> {
        let body = LoginRequest {
            employee_id,
            password: password.to_string(),
        };
        match self.send_json(Method::POST, "auth/login", &body).await {
            Ok(_) => {
                tracing::info!("Logged in as employee {employee_id}");
                Ok(())
            }
            Err(AppError::Unauthorized) => Err(AppError::LoginFailed("Falsche Anmeldedaten".to_string())),
            Err(AppError::Api { status, message }) if status == StatusCode::NOT_FOUND => {
                Err(AppError::LoginFailed(if message.is_empty() {
                    "Mitarbeiter ID nicht hinterlegt".to_string()
                } else {
                    message
                }))
            }
            Err(e) => Err(e),
        }
    }

    /// Register a new employee.
    pub async fn signup(&self, request: &SignupRequest) -> Result<()> {
        self.send_json(Method::POST, "auth/signup", request).await?;
        tracing::info!("Registered employee {}", request.employee_id);
        Ok(())
    }

    pub async fn logout(&self) -> Result<()> {
        self.send_empty(Method::POST, "auth/logout").await?;
        Ok(())
    }

    /// Validate the session cookie and fetch the employee's permissions.
    pub async fn validate_session(&self) -> Result<AccessRights> {
        let response = self
            .execute(self.request(Method::POST, "auth/cookie-validation"), "auth/cookie-validation")
            .await?;
        super::decode_optional::<AccessRights>(response)
            .await?
            .ok_or(AppError::Unauthorized)
    }
}
