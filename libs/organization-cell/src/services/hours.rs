use anyhow::{anyhow, Result};
use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{OrganizationHours, UpdateHoursRequest};

pub struct HoursService {
    supabase: SupabaseClient,
}

impl HoursService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Fetch the weekly hours row for an organization. `None` means the
    /// organization has never configured its hours.
    pub async fn get_hours(
        &self,
        organization_id: Uuid,
        auth_token: &str,
    ) -> Result<Option<OrganizationHours>> {
        debug!("Fetching hours for organization: {}", organization_id);

        let path = format!(
            "/rest/v1/organization_hours?organization_id=eq.{}",
            organization_id
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

    /// Replace the organization's weekly hours. Creates the row on first
    /// save, patches it afterwards.
    pub async fn upsert_hours(
        &self,
        request: UpdateHoursRequest,
        auth_token: &str,
    ) -> Result<OrganizationHours> {
        debug!(
            "Saving hours for organization: {}",
            request.organization_id
        );

        if !self.is_valid_timezone(&request.timezone) {
            return Err(anyhow!("Invalid timezone: {}", request.timezone));
        }

        let hours_data = json!({
            "organization_id": request.organization_id,
            "timezone": request.timezone,
            "sunday_open": request.sunday_open,
            "sunday_close": request.sunday_close,
            "monday_open": request.monday_open,
            "monday_close": request.monday_close,
            "tuesday_open": request.tuesday_open,
            "tuesday_close": request.tuesday_close,
            "wednesday_open": request.wednesday_open,
            "wednesday_close": request.wednesday_close,
            "thursday_open": request.thursday_open,
            "thursday_close": request.thursday_close,
            "friday_open": request.friday_open,
            "friday_close": request.friday_close,
            "saturday_open": request.saturday_open,
            "saturday_close": request.saturday_close,
            "updated_at": Utc::now().to_rfc3339()
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let existing = self.get_hours(request.organization_id, auth_token).await?;

        let result: Vec<Value> = if existing.is_some() {
            let path = format!(
                "/rest/v1/organization_hours?organization_id=eq.{}",
                request.organization_id
            );
            self.supabase
                .request_with_headers(
                    Method::PATCH,
                    &path,
                    Some(auth_token),
                    Some(hours_data),
                    Some(headers),
                )
                .await?
        } else {
            self.supabase
                .request_with_headers(
                    Method::POST,
                    "/rest/v1/organization_hours",
                    Some(auth_token),
                    Some(hours_data),
                    Some(headers),
                )
                .await?
        };

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to save organization hours"))?;

        let hours: OrganizationHours = serde_json::from_value(row)?;
        debug!("Hours saved for organization: {}", hours.organization_id);

        Ok(hours)
    }

    fn is_valid_timezone(&self, timezone: &str) -> bool {
        // Basic timezone validation - in production, use a proper timezone library
        let valid_timezones = [
            "UTC",
            "America/Sao_Paulo",
            "America/Recife",
            "America/Manaus",
            "America/New_York",
            "America/Chicago",
            "America/Denver",
            "America/Los_Angeles",
            "Europe/London",
            "Europe/Paris",
            "Europe/Lisbon",
        ];

        valid_timezones.contains(&timezone)
    }
}
