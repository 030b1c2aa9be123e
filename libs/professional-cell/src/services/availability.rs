use anyhow::Result;
use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{ProfessionalAvailability, ReplaceAvailabilityRequest};

pub struct AvailabilityService {
    supabase: SupabaseClient,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Weekly schedule rows for a professional, ordered by weekday. An
    /// empty list is a normal answer (not scheduled, or a replace is in
    /// flight), never an error.
    pub async fn get_availability(
        &self,
        organization_id: Uuid,
        professional_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<ProfessionalAvailability>> {
        debug!(
            "Fetching availability for professional {} in organization {}",
            professional_id, organization_id
        );

        let path = format!(
            "/rest/v1/professional_availability?organization_id=eq.{}&professional_id=eq.{}&order=day_of_week.asc,start_time.asc",
            organization_id, professional_id
        );

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        let rows = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<ProfessionalAvailability>, _>>()?;

        Ok(rows)
    }

    /// Replace the professional's whole weekly schedule: delete every
    /// existing row, then insert the new windows in one batch. Readers that
    /// land between the two steps see an empty schedule, which they treat
    /// as "not available" rather than an error.
    pub async fn replace_availability(
        &self,
        professional_id: Uuid,
        request: ReplaceAvailabilityRequest,
        auth_token: &str,
    ) -> Result<Vec<ProfessionalAvailability>> {
        info!(
            "Replacing availability for professional {} ({} windows)",
            professional_id,
            request.windows.len()
        );

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let delete_path = format!(
            "/rest/v1/professional_availability?organization_id=eq.{}&professional_id=eq.{}",
            request.organization_id, professional_id
        );
        let _deleted: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::DELETE,
                &delete_path,
                Some(auth_token),
                None,
                Some(headers.clone()),
            )
            .await?;

        if request.windows.is_empty() {
            return Ok(Vec::new());
        }

        let now = Utc::now().to_rfc3339();
        let rows: Vec<Value> = request
            .windows
            .iter()
            .map(|window| {
                json!({
                    "organization_id": request.organization_id,
                    "professional_id": professional_id,
                    "day_of_week": window.day_of_week,
                    "start_time": window.start_time,
                    "end_time": window.end_time,
                    "created_at": now,
                    "updated_at": now
                })
            })
            .collect();

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/professional_availability",
                Some(auth_token),
                Some(Value::Array(rows)),
                Some(headers),
            )
            .await?;

        let inserted = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<ProfessionalAvailability>, _>>()?;

        debug!(
            "Availability replaced for professional {}: {} rows",
            professional_id,
            inserted.len()
        );

        Ok(inserted)
    }
}
