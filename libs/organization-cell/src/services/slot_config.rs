use anyhow::{anyhow, Result};
use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{SlotConfig, SlotSettings, UpdateSlotConfigRequest};

pub struct SlotConfigService {
    supabase: SupabaseClient,
}

impl SlotConfigService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn get_slot_config(
        &self,
        organization_id: Uuid,
        auth_token: &str,
    ) -> Result<Option<SlotConfig>> {
        debug!("Fetching slot config for organization: {}", organization_id);

        let path = format!(
            "/rest/v1/slot_configs?organization_id=eq.{}",
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

    /// Settings with defaults applied when no row exists (30-minute
    /// interval, no buffer).
    pub async fn get_effective_settings(
        &self,
        organization_id: Uuid,
        auth_token: &str,
    ) -> Result<SlotSettings> {
        match self.get_slot_config(organization_id, auth_token).await? {
            Some(config) => Ok(SlotSettings::from(&config)),
            None => {
                debug!(
                    "No slot config for organization {}, using defaults",
                    organization_id
                );
                Ok(SlotSettings::default())
            }
        }
    }

    pub async fn upsert_slot_config(
        &self,
        request: UpdateSlotConfigRequest,
        auth_token: &str,
    ) -> Result<SlotConfig> {
        debug!(
            "Saving slot config for organization: {}",
            request.organization_id
        );

        let config_data = json!({
            "organization_id": request.organization_id,
            "interval_minutes": request.interval_minutes,
            "buffer_minutes": request.buffer_minutes,
            "updated_at": Utc::now().to_rfc3339()
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let existing = self
            .get_slot_config(request.organization_id, auth_token)
            .await?;

        let result: Vec<Value> = if existing.is_some() {
            let path = format!(
                "/rest/v1/slot_configs?organization_id=eq.{}",
                request.organization_id
            );
            self.supabase
                .request_with_headers(
                    Method::PATCH,
                    &path,
                    Some(auth_token),
                    Some(config_data),
                    Some(headers),
                )
                .await?
        } else {
            self.supabase
                .request_with_headers(
                    Method::POST,
                    "/rest/v1/slot_configs",
                    Some(auth_token),
                    Some(config_data),
                    Some(headers),
                )
                .await?
        };

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to save slot config"))?;

        Ok(serde_json::from_value(row)?)
    }
}
