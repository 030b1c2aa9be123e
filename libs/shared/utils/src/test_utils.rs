use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            supabase_jwt_secret: self.jwt_secret.clone(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role: "client".to_string(),
        }
    }
}

impl TestUser {
    pub fn new(email: &str, role: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    pub fn owner(email: &str) -> Self {
        Self::new(email, "owner")
    }

    pub fn staff(email: &str) -> Self {
        Self::new(email, "staff")
    }

    pub fn client(email: &str) -> Self {
        Self::new(email, "client")
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            role: Some(self.role.clone()),
            metadata: None,
            created_at: Some(Utc::now()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": user.id,
            "email": user.email,
            "role": user.role,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn organization_hours_response(organization_id: &str) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "organization_id": organization_id,
            "timezone": "America/Sao_Paulo",
            "monday_open": "09:00:00",
            "monday_close": "18:00:00",
            "tuesday_open": "09:00:00",
            "tuesday_close": "18:00:00",
            "wednesday_open": "09:00:00",
            "wednesday_close": "18:00:00",
            "thursday_open": "09:00:00",
            "thursday_close": "18:00:00",
            "friday_open": "09:00:00",
            "friday_close": "18:00:00",
            "saturday_open": "09:00:00",
            "saturday_close": "14:00:00",
            "sunday_open": null,
            "sunday_close": null,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn slot_config_response(organization_id: &str) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "organization_id": organization_id,
            "interval_minutes": 30,
            "buffer_minutes": 0,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn availability_response(
        organization_id: &str,
        professional_id: &str,
        day_of_week: u8,
    ) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "organization_id": organization_id,
            "professional_id": professional_id,
            "day_of_week": day_of_week,
            "start_time": "10:00:00",
            "end_time": "16:00:00",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn date_exception_response(
        organization_id: &str,
        professional_id: Option<&str>,
        date: &str,
    ) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "organization_id": organization_id,
            "professional_id": professional_id,
            "date": date,
            "is_closed": true,
            "special_open": null,
            "special_close": null,
            "reason": "Holiday",
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn service_response(organization_id: &str) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "organization_id": organization_id,
            "name": "Haircut",
            "duration_minutes": 45,
            "price": 80.0,
            "active": true,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn appointment_response(
        organization_id: &str,
        professional_id: &str,
        client_id: &str,
    ) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "organization_id": organization_id,
            "professional_id": professional_id,
            "client_id": client_id,
            "service_id": Uuid::new_v4(),
            "scheduled_at": "2025-03-10T13:00:00Z",
            "duration_minutes": 45,
            "price": 80.0,
            "status": "scheduled",
            "notes": null,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn error_response(message: &str, code: &str) -> serde_json::Value {
        json!({
            "error": {
                "message": message,
                "code": code
            }
        })
    }
}
