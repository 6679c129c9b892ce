//! Employee DTO.

use serde::{Deserialize, Serialize};

use super::role::Role;

/// Employee as returned by `/employee/*` endpoints.
///
/// `password` is only ever sent (signup, admin updates); the backend never
/// returns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub employee_id: i32,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

impl Employee {
    /// "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Two-letter avatar initials.
    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .take(1)
            .chain(self.last_name.chars().take(1))
            .collect::<String>()
            .to_uppercase()
    }

    /// Display name for an optional lookup result.
    pub fn display_name(employee: Option<&Employee>) -> String {
        employee.map_or_else(|| "Unbekannt".to_string(), Employee::full_name)
    }

    /// Name of the assigned role, if any.
    pub fn role_name(&self) -> &str {
        self.role.as_ref().map(|r| r.role_name.as_str()).unwrap_or("-")
    }
}

/// Resolve a display name by ID from a loaded employee list.
///
/// Unknown IDs render as "Mitarbeiter <id>" so that requests by deleted staff
/// stay readable.
pub fn name_for_id(employees: &[Employee], employee_id: i32) -> String {
    if employee_id == 0 {
        return "Unbekannt".to_string();
    }
    employees
        .iter()
        .find(|e| e.employee_id == employee_id)
        .map(Employee::full_name)
        .unwrap_or_else(|| format!("Mitarbeiter {employee_id}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anna() -> Employee {
        Employee {
            employee_id: 1001,
            first_name: "Anna".to_string(),
            last_name: "Huber".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_names() {
        let e = anna();
        assert_eq!(e.full_name(), "Anna Huber");
        assert_eq!(e.initials(), "AH");
        assert_eq!(Employee::display_name(Some(&e)), "Anna Huber");
        assert_eq!(Employee::display_name(None), "Unbekannt");
    }

    #[test]
    fn test_name_for_id() {
        let list = vec![anna()];
        assert_eq!(name_for_id(&list, 1001), "Anna Huber");
        assert_eq!(name_for_id(&list, 7), "Mitarbeiter 7");
        assert_eq!(name_for_id(&list, 0), "Unbekannt");
    }

    #[test]
    fn test_deserialize_without_role_or_password() {
        let json = r#"{"employeeId":5,"firstName":"Max","lastName":"Muster"}"#;
        let e: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(e.employee_id, 5);
        assert!(e.role.is_none());
        assert!(e.password.is_none());

        let out = serde_json::to_value(&e).unwrap();
        assert!(out.get("password").is_none());
        assert_eq!(out["firstName"], "Max");
    }
}
