//! Role DTO.

use serde::{Deserialize, Serialize};

use super::employee::Employee;

/// Role with its permission strings.
///
/// `role_id` is `None` for roles that have not been created yet; the backend
/// assigns it on `/role/add`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    #[serde(default)]
    pub role_id: Option<i32>,
    pub role_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub role_permissions: Vec<String>,
    /// Members, only filled in list responses.
    #[serde(default, rename = "employeeDtos", skip_serializing_if = "Vec::is_empty")]
    pub employees: Vec<Employee>,
}

impl Role {
    /// Comma separated permission list for tables.
    pub fn permissions_label(&self) -> String {
        if self.role_permissions.is_empty() {
            "-".to_string()
        } else {
            self.role_permissions.join(", ")
        }
    }

    /// Check the fields the role form requires.
    pub fn validate(&self) -> Result<(), String> {
        if self.role_name.trim().is_empty() {
            return Err("Rollenname ist erforderlich".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_members() {
        let json = r#"{
            "roleId": 2,
            "roleName": "Kassierer",
            "description": "Kasse",
            "rolePermissions": ["kasse", "product.read"],
            "employeeDtos": [{"employeeId": 3, "firstName": "Eva", "lastName": "Berg"}]
        }"#;
        let role: Role = serde_json::from_str(json).unwrap();
        assert_eq!(role.role_id, Some(2));
        assert_eq!(role.employees.len(), 1);
        assert_eq!(role.permissions_label(), "kasse, product.read");
    }

    #[test]
    fn test_new_role_serializes_null_id() {
        let role = Role {
            role_name: "Lager".to_string(),
            ..Default::default()
        };
        let v = serde_json::to_value(&role).unwrap();
        assert!(v["roleId"].is_null());
        assert!(v.get("employeeDtos").is_none());
    }

    #[test]
    fn test_validate_requires_name() {
        assert!(Role::default().validate().is_err());
        let role = Role {
            role_name: "Admin".to_string(),
            ..Default::default()
        };
        assert!(role.validate().is_ok());
    }
}
