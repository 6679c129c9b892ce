//! `role/*` endpoints.

use super::ApiClient;
use crate::error::Result;
use crate::models::Role;
use reqwest::Method;

impl ApiClient {
    pub async fn roles(&self) -> Result<Vec<Role>> {
        self.get_list("role/all").await
    }

    pub async fn role(&self, id: i32) -> Result<Option<Role>> {
        self.get_optional(&format!("role/get/{id}")).await
    }

    pub async fn add_role(&self, role: &Role) -> Result<()> {
        self.send_json(Method::POST, "role/add", role).await?;
        Ok(())
    }

    pub async fn update_role(&self, role: &Role) -> Result<()> {
        self.send_json(Method::PUT, "role/update", role).await?;
        Ok(())
    }

    pub async fn delete_role(&self, id: i32) -> Result<()> {
        self.send_empty(Method::DELETE, &format!("role/delete/{id}")).await?;
        Ok(())
    }
}
