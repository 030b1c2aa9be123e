use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub exp: Option<u64>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub app_metadata: Option<serde_json::Value>,
    pub user_metadata: Option<serde_json::Value>,
    pub aud: Option<String>,
    pub iat: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub role: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Coarse role checks used by the handlers. Fine-grained permission
    /// bits live in the backend's row-level security policies.
    pub fn is_owner(&self) -> bool {
        self.role.as_deref() == Some("owner")
    }

    pub fn is_staff(&self) -> bool {
        matches!(self.role.as_deref(), Some("owner") | Some("staff"))
    }
}
