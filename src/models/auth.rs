//! Authentication payloads.

use serde::{Deserialize, Serialize};

use super::role::Role;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub employee_id: i32,
    pub password: String,
}

/// Employee registration, sent by administrators.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub employee_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordUpdate {
    pub old_password: String,
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_body() {
        let body = LoginRequest {
            employee_id: 1001,
            password: "Geheim123".into(),
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v, serde_json::json!({"employeeId": 1001, "password": "Geheim123"}));
    }

    #[test]
    fn test_password_update_body() {
        let body = PasswordUpdate {
            old_password: "Alt12345".into(),
            new_password: "Neu12345".into(),
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["oldPassword"], "Alt12345");
        assert_eq!(v["newPassword"], "Neu12345");
    }
}
