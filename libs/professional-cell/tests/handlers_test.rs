use std::sync::Arc;

use axum::extract::{Extension, Path, Query, State};
use axum::Json;
use axum_extra::TypedHeader;
use chrono::{NaiveTime, Utc};
use headers::{authorization::Bearer, Authorization};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use professional_cell::handlers::*;
use professional_cell::models::{AvailabilityWindow, ReplaceAvailabilityRequest};
use shared_models::auth::User;
use shared_models::error::AppError;
use shared_utils::test_utils::{JwtTestUtils, MockSupabaseResponses, TestConfig, TestUser};

fn create_test_user_extension(role: &str, id: &str) -> Extension<User> {
    Extension(User {
        id: id.to_string(),
        email: Some(format!("{}@example.com", role)),
        role: Some(role.to_string()),
        metadata: None,
        created_at: Some(Utc::now()),
    })
}

fn create_auth_header(token: &str) -> TypedHeader<Authorization<Bearer>> {
    let auth = Authorization::bearer(token).unwrap();
    TypedHeader(auth)
}

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[tokio::test]
async fn test_get_availability_returns_windows() {
    let mock_server = MockServer::start().await;
    let test_config = TestConfig::default();
    let mut config = test_config.to_app_config();
    config.supabase_url = mock_server.uri();

    let staff = TestUser::staff("staff@example.com");
    let token = JwtTestUtils::create_test_token(&staff, &config.supabase_jwt_secret, Some(24));
    let organization_id = Uuid::new_v4();
    let professional_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/professional_availability"))
        .and(query_param("organization_id", format!("eq.{}", organization_id)))
        .and(query_param("professional_id", format!("eq.{}", professional_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::availability_response(
                &organization_id.to_string(),
                &professional_id.to_string(),
                1,
            ),
            MockSupabaseResponses::availability_response(
                &organization_id.to_string(),
                &professional_id.to_string(),
                2,
            )
        ])))
        .mount(&mock_server)
        .await;

    let result = get_professional_availability(
        State(Arc::new(config)),
        Path(professional_id),
        Query(AvailabilityQuery { organization_id }),
        create_auth_header(&token),
    )
    .await;

    assert!(result.is_ok());
    let response = result.unwrap().0;
    assert_eq!(response["total"], 2);
    assert_eq!(response["windows"][0]["day_of_week"], 1);
    assert_eq!(response["windows"][1]["day_of_week"], 2);
}

#[tokio::test]
async fn test_get_availability_empty_is_not_an_error() {
    let mock_server = MockServer::start().await;
    let test_config = TestConfig::default();
    let mut config = test_config.to_app_config();
    config.supabase_url = mock_server.uri();

    let client = TestUser::client("client@example.com");
    let token = JwtTestUtils::create_test_token(&client, &config.supabase_jwt_secret, Some(24));

    // A replace may be mid-flight; readers just see an empty schedule
    Mock::given(method("GET"))
        .and(path("/rest/v1/professional_availability"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let result = get_professional_availability(
        State(Arc::new(config)),
        Path(Uuid::new_v4()),
        Query(AvailabilityQuery {
            organization_id: Uuid::new_v4(),
        }),
        create_auth_header(&token),
    )
    .await;

    assert!(result.is_ok());
    let response = result.unwrap().0;
    assert_eq!(response["total"], 0);
    assert_eq!(response["windows"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_replace_availability_deletes_then_inserts() {
    let mock_server = MockServer::start().await;
    let test_config = TestConfig::default();
    let mut config = test_config.to_app_config();
    config.supabase_url = mock_server.uri();

    let staff = TestUser::staff("staff@example.com");
    let token = JwtTestUtils::create_test_token(&staff, &config.supabase_jwt_secret, Some(24));
    let organization_id = Uuid::new_v4();
    let professional_id = Uuid::new_v4();

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/professional_availability"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/professional_availability"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::availability_response(
                &organization_id.to_string(),
                &professional_id.to_string(),
                1,
            )
        ])))
        .mount(&mock_server)
        .await;

    let request = ReplaceAvailabilityRequest {
        organization_id,
        windows: vec![AvailabilityWindow {
            day_of_week: 1,
            start_time: t(10, 0),
            end_time: t(16, 0),
        }],
    };

    let result = replace_professional_availability(
        State(Arc::new(config)),
        Path(professional_id),
        create_auth_header(&token),
        create_test_user_extension("staff", &staff.id),
        Json(request),
    )
    .await;

    assert!(result.is_ok(), "Expected replace to succeed, got: {:?}", result.err());
    let response = result.unwrap().0;
    assert_eq!(response["total"], 1);
    assert_eq!(response["windows"][0]["day_of_week"], 1);
}

#[tokio::test]
async fn test_replace_availability_empty_clears_schedule() {
    let mock_server = MockServer::start().await;
    let test_config = TestConfig::default();
    let mut config = test_config.to_app_config();
    config.supabase_url = mock_server.uri();

    let staff = TestUser::staff("staff@example.com");
    let token = JwtTestUtils::create_test_token(&staff, &config.supabase_jwt_secret, Some(24));

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/professional_availability"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let request = ReplaceAvailabilityRequest {
        organization_id: Uuid::new_v4(),
        windows: vec![],
    };

    let result = replace_professional_availability(
        State(Arc::new(config)),
        Path(Uuid::new_v4()),
        create_auth_header(&token),
        create_test_user_extension("staff", &staff.id),
        Json(request),
    )
    .await;

    assert!(result.is_ok());
    let response = result.unwrap().0;
    assert_eq!(response["total"], 0);
}

#[tokio::test]
async fn test_replace_availability_rejects_duplicate_weekday() {
    let test_config = TestConfig::default();
    let config = test_config.to_app_config();

    let staff = TestUser::staff("staff@example.com");
    let token = JwtTestUtils::create_test_token(&staff, &config.supabase_jwt_secret, Some(24));

    let request = ReplaceAvailabilityRequest {
        organization_id: Uuid::new_v4(),
        windows: vec![
            AvailabilityWindow {
                day_of_week: 3,
                start_time: t(9, 0),
                end_time: t(12, 0),
            },
            AvailabilityWindow {
                day_of_week: 3,
                start_time: t(14, 0),
                end_time: t(18, 0),
            },
        ],
    };

    let result = replace_professional_availability(
        State(Arc::new(config)),
        Path(Uuid::new_v4()),
        create_auth_header(&token),
        create_test_user_extension("staff", &staff.id),
        Json(request),
    )
    .await;

    match result.unwrap_err() {
        AppError::ValidationError(msg) => assert!(msg.contains("duplicate")),
        other => panic!("Expected validation error, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_replace_availability_rejects_inverted_window() {
    let test_config = TestConfig::default();
    let config = test_config.to_app_config();

    let staff = TestUser::staff("staff@example.com");
    let token = JwtTestUtils::create_test_token(&staff, &config.supabase_jwt_secret, Some(24));

    let request = ReplaceAvailabilityRequest {
        organization_id: Uuid::new_v4(),
        windows: vec![AvailabilityWindow {
            day_of_week: 2,
            start_time: t(16, 0),
            end_time: t(10, 0),
        }],
    };

    let result = replace_professional_availability(
        State(Arc::new(config)),
        Path(Uuid::new_v4()),
        create_auth_header(&token),
        create_test_user_extension("staff", &staff.id),
        Json(request),
    )
    .await;

    assert!(matches!(result.unwrap_err(), AppError::ValidationError(_)));
}

#[tokio::test]
async fn test_replace_availability_client_forbidden() {
    let test_config = TestConfig::default();
    let config = test_config.to_app_config();

    let client = TestUser::client("client@example.com");
    let token = JwtTestUtils::create_test_token(&client, &config.supabase_jwt_secret, Some(24));

    let request = ReplaceAvailabilityRequest {
        organization_id: Uuid::new_v4(),
        windows: vec![],
    };

    let result = replace_professional_availability(
        State(Arc::new(config)),
        Path(Uuid::new_v4()),
        create_auth_header(&token),
        create_test_user_extension("client", &client.id),
        Json(request),
    )
    .await;

    assert!(matches!(result.unwrap_err(), AppError::Auth(_)));
}

#[tokio::test]
async fn test_professional_can_edit_own_schedule() {
    let mock_server = MockServer::start().await;
    let test_config = TestConfig::default();
    let mut config = test_config.to_app_config();
    config.supabase_url = mock_server.uri();

    let professional_id = Uuid::new_v4();
    let professional = TestUser {
        id: professional_id.to_string(),
        email: "pro@example.com".to_string(),
        role: "professional".to_string(),
    };
    let token =
        JwtTestUtils::create_test_token(&professional, &config.supabase_jwt_secret, Some(24));

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/professional_availability"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let request = ReplaceAvailabilityRequest {
        organization_id: Uuid::new_v4(),
        windows: vec![],
    };

    let result = replace_professional_availability(
        State(Arc::new(config)),
        Path(professional_id),
        create_auth_header(&token),
        create_test_user_extension("professional", &professional.id),
        Json(request),
    )
    .await;

    assert!(result.is_ok());
}
