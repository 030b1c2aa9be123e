use anyhow::Result;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::Service;

/// Read-only access to the service catalog. An appointment copies the
/// service's duration and price at booking time, so nothing here mutates.
pub struct CatalogService {
    supabase: SupabaseClient,
}

impl CatalogService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Fetch one service by id, scoped to the organization. `None` means no
    /// such service exists there.
    pub async fn get_service(
        &self,
        service_id: Uuid,
        organization_id: Uuid,
        auth_token: &str,
    ) -> Result<Option<Service>> {
        debug!("Fetching service: {}", service_id);

        let path = format!(
            "/rest/v1/services?id=eq.{}&organization_id=eq.{}",
            service_id, organization_id
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        match result.into_iter().next() {
            Some(row) => Ok(Some(serde_json::from_value(row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_services(
        &self,
        organization_id: Uuid,
        active_only: bool,
        auth_token: &str,
    ) -> Result<Vec<Service>> {
        debug!("Listing services for organization: {}", organization_id);

        let mut path = format!(
            "/rest/v1/services?organization_id=eq.{}&order=name.asc",
            organization_id
        );
        if active_only {
            path.push_str("&active=eq.true");
        }

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        let services = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<Service>, _>>()?;

        Ok(services)
    }
}
