use anyhow::{anyhow, Result};
use chrono::{NaiveDate, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{CreateExceptionRequest, DateException};

pub struct ExceptionService {
    supabase: SupabaseClient,
}

impl ExceptionService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// List exceptions for an organization, optionally narrowed to a date
    /// or a professional.
    pub async fn list_exceptions(
        &self,
        organization_id: Uuid,
        date: Option<NaiveDate>,
        professional_id: Option<Uuid>,
        auth_token: &str,
    ) -> Result<Vec<DateException>> {
        debug!("Listing exceptions for organization: {}", organization_id);

        let mut query_parts = vec![format!("organization_id=eq.{}", organization_id)];

        if let Some(date) = date {
            query_parts.push(format!("date=eq.{}", date));
        }
        if let Some(professional_id) = professional_id {
            query_parts.push(format!("professional_id=eq.{}", professional_id));
        }

        let path = format!(
            "/rest/v1/date_exceptions?{}&order=date.asc",
            query_parts.join("&")
        );

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        let exceptions = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<DateException>, _>>()?;

        Ok(exceptions)
    }

    /// Exceptions that apply to one professional on one date: the
    /// organization-wide rows plus the professional's own.
    pub async fn exceptions_for_date(
        &self,
        organization_id: Uuid,
        professional_id: Uuid,
        date: NaiveDate,
        auth_token: &str,
    ) -> Result<Vec<DateException>> {
        let scope_filter = format!("professional_id.is.null,professional_id.eq.{}", professional_id);
        let path = format!(
            "/rest/v1/date_exceptions?organization_id=eq.{}&date=eq.{}&or=({})",
            organization_id,
            date,
            urlencoding::encode(&scope_filter)
        );

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        let exceptions = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<DateException>, _>>()?;

        Ok(exceptions)
    }

    /// Record a new exception. Exceptions are append-only: correcting one
    /// means deleting it and creating another.
    pub async fn create_exception(
        &self,
        request: CreateExceptionRequest,
        auth_token: &str,
    ) -> Result<DateException> {
        debug!(
            "Creating exception for organization {} on {}",
            request.organization_id, request.date
        );

        let exception_data = json!({
            "organization_id": request.organization_id,
            "professional_id": request.professional_id,
            "date": request.date,
            "is_closed": request.is_closed,
            "special_open": request.special_open,
            "special_close": request.special_close,
            "reason": request.reason,
            "created_at": Utc::now().to_rfc3339()
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/date_exceptions",
                Some(auth_token),
                Some(exception_data),
                Some(headers),
            )
            .await?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to create exception"))?;

        Ok(serde_json::from_value(row)?)
    }

    pub async fn delete_exception(&self, exception_id: Uuid, auth_token: &str) -> Result<()> {
        debug!("Deleting exception: {}", exception_id);

        let path = format!("/rest/v1/date_exceptions?id=eq.{}", exception_id);

        // return=representation so the response carries the deleted rows;
        // an empty list means the id did not exist
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(Method::DELETE, &path, Some(auth_token), None, Some(headers))
            .await?;

        if result.is_empty() {
            return Err(anyhow!("Exception not found"));
        }

        Ok(())
    }
}
