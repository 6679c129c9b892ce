//! `employee/*` endpoints.

use super::ApiClient;
use crate::error::Result;
use crate::models::{Employee, PasswordUpdate};
use reqwest::Method;

impl ApiClient {
    /// The logged-in employee.
    pub async fn current_employee(&self) -> Result<Employee> {
        self.get_json("employee/current").await
    }

    /// Employee by ID, `None` when unknown.
    pub async fn employee(&self, id: i32) -> Result<Option<Employee>> {
        self.get_optional(&format!("employee/get/{id}")).await
    }

    pub async fn employees(&self) -> Result<Vec<Employee>> {
        self.get_list("employee/all").await
    }

    pub async fn update_employee(&self, employee: &Employee) -> Result<()> {
        self.send_json(Method::PUT, "employee/update", employee).await?;
        Ok(())
    }

    pub async fn delete_employee(&self, id: i32) -> Result<()> {
        self.send_empty(Method::DELETE, &format!("employee/delete/{id}")).await?;
        Ok(())
    }

    /// Change the logged-in employee's password.
    pub async fn update_password(&self, update: &PasswordUpdate) -> Result<()> {
        self.send_json(Method::PUT, "employee/update-password", update).await?;
        Ok(())
    }
}
