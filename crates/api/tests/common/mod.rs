//! Common test utilities for integration tests.
//!
//! These tests run against a real PostgreSQL database. Set
//! `TEST_DATABASE_URL` to enable them; without it every suite skips
//! cleanly so the rest of the workspace tests stay runnable anywhere.

// Allow dead code in this module - these are helper utilities that may not be
// used by all integration tests but are intentionally available for them.
#![allow(dead_code)]

use axum::Router;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use arlo_sync_api::app::create_app_with_groups;
use arlo_sync_api::config::{Config, LoggingConfig, PrivacyConfig, ServerConfig};
use domain::services::{GroupPrivacy, COMPONENT};
use persistence::db::DatabaseConfig;
use persistence::entities::{EmailAreaDb, EnrolmentStatusDb};
use persistence::repositories::{
    ContactRepository, CreateContactInput, CreateEnrolmentInstanceInput, CreateRegistrationInput,
    EmailQueueRepository, EnqueueEmailInput, EnrolmentInstanceRepository,
    GroupMembershipRepository, RegistrationRepository, RoleRepository,
};

/// Connect to the test database, or return None when `TEST_DATABASE_URL`
/// is unset or unreachable. Callers early-return on None.
pub async fn try_test_pool() -> Option<PgPool> {
    let database_url = std::env::var("TEST_DATABASE_URL").ok()?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(&database_url)
        .await
        .ok()?;

    run_migrations(&pool).await;
    Some(pool)
}

/// Run migrations on the test database.
pub async fn run_migrations(pool: &PgPool) {
    let migration_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("persistence/src/migrations");

    let mut entries: Vec<_> = std::fs::read_dir(&migration_dir)
        .expect("Failed to read migrations directory")
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map(|ext| ext == "sql").unwrap_or(false))
        .collect();

    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let sql = std::fs::read_to_string(entry.path()).expect("Failed to read migration file");

        // Migration might already be applied, ignore errors
        sqlx::raw_sql(&sql).execute(pool).await.ok();
    }
}

/// Test configuration pointing at the test database.
pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // Use random port
            request_timeout_secs: 30,
        },
        database: DatabaseConfig {
            url: std::env::var("TEST_DATABASE_URL").unwrap_or_default(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_secs: 10,
            idle_timeout_secs: 600,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        privacy: PrivacyConfig {
            transactional_erasure: true,
        },
    }
}

/// Create a test application router with an injected group collaborator.
pub fn create_test_app(pool: PgPool, groups: Arc<dyn GroupPrivacy>) -> Router {
    create_app_with_groups(test_config(), pool, groups)
}

/// Generate a unique email for testing.
pub fn unique_test_email() -> String {
    format!("test_{}@example.com", Uuid::new_v4())
}

/// Insert a user row and return its id.
pub async fn seed_user(pool: &PgPool) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (email, first_name, last_name) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(unique_test_email())
    .bind(FirstName().fake::<String>())
    .bind(LastName().fake::<String>())
    .fetch_one(pool)
    .await
    .expect("Failed to seed user")
}

/// Insert a course row and return its id.
pub async fn seed_course(pool: &PgPool) -> i64 {
    let suffix = Uuid::new_v4().simple().to_string();
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO courses (shortname, fullname) VALUES ($1, $2) RETURNING id",
    )
    .bind(format!("course-{}", suffix))
    .bind(format!("Test Course {}", suffix))
    .fetch_one(pool)
    .await
    .expect("Failed to seed course")
}

/// Create a role through the repository and return its id.
pub async fn seed_role(pool: &PgPool, archetype: &str, sort_order: i32) -> i64 {
    RoleRepository::new(pool.clone())
        .create(
            &format!("role-{}", Uuid::new_v4().simple()),
            archetype,
            sort_order,
        )
        .await
        .expect("Failed to seed role")
        .id
}

/// Create an enabled enrolment instance through the repository and return
/// its id.
pub async fn seed_instance(pool: &PgPool, course_id: i64) -> i64 {
    EnrolmentInstanceRepository::new(pool.clone())
        .create(CreateEnrolmentInstanceInput {
            course_id,
            name: format!("Instance {}", Uuid::new_v4().simple()),
            platform: None,
            source_id: unique_source_id(),
            source_guid: Uuid::new_v4(),
        })
        .await
        .expect("Failed to seed enrolment instance")
        .id
}

/// Create a contact for a user through the repository and return its id.
pub async fn seed_contact(pool: &PgPool, user_id: i64) -> i64 {
    ContactRepository::new(pool.clone())
        .create(CreateContactInput {
            user_id,
            source_id: unique_source_id(),
            source_guid: Uuid::new_v4(),
            first_name: FirstName().fake::<String>(),
            last_name: LastName().fake::<String>(),
            email: unique_test_email(),
            code_primary: None,
            phone_work: None,
            phone_mobile: None,
        })
        .await
        .expect("Failed to seed contact")
        .id
}

/// Create a registration through the repository and return its id.
pub async fn seed_registration(pool: &PgPool, enrol_id: i64, user_id: i64) -> i64 {
    RegistrationRepository::new(pool.clone())
        .create(CreateRegistrationInput {
            enrol_id,
            user_id,
            source_id: unique_source_id(),
            source_guid: Uuid::new_v4(),
            grade: None,
            outcome: Some("Pass".to_string()),
            last_activity: None,
            progress_status: None,
            progress_percent: None,
            source_contact_id: None,
            source_contact_guid: None,
        })
        .await
        .expect("Failed to seed registration")
        .id
}

/// Queue an email through the repository and return its id.
pub async fn seed_email(
    pool: &PgPool,
    area: EmailAreaDb,
    instance_id: i64,
    user_id: i64,
) -> i64 {
    EmailQueueRepository::new(pool.clone())
        .enqueue(EnqueueEmailInput {
            area,
            instance_id,
            user_id,
            message_type: "coursewelcome".to_string(),
            extra: None,
        })
        .await
        .expect("Failed to seed email")
        .id
}

/// Add a group membership tagged with the plugin component.
pub async fn seed_group_membership(pool: &PgPool, course_id: i64, user_id: i64) -> i64 {
    GroupMembershipRepository::new(pool.clone())
        .add(course_id, user_id, COMPONENT)
        .await
        .expect("Failed to seed group membership")
}

/// Count rows matching a user in a table.
pub async fn count_rows(pool: &PgPool, table: &str, column: &str, id: i64) -> i64 {
    let sql = format!("SELECT COUNT(*) FROM {} WHERE {} = $1", table, column);
    sqlx::query_scalar::<_, i64>(&sql)
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("Failed to count rows")
}

/// Instance status read back through the repository, for asserting
/// disable behaviour.
pub async fn instance_status(pool: &PgPool, instance_id: i64) -> EnrolmentStatusDb {
    EnrolmentInstanceRepository::new(pool.clone())
        .find_by_id(instance_id)
        .await
        .expect("Failed to read instance")
        .expect("Instance not found")
        .status
}

/// Group memberships remaining in a course for the plugin component.
pub async fn group_membership_count(pool: &PgPool, course_id: i64) -> i64 {
    GroupMembershipRepository::new(pool.clone())
        .count_for_course(course_id, COMPONENT)
        .await
        .expect("Failed to count group memberships")
}

/// Helper to parse JSON response body.
pub async fn parse_response_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
}

/// Build a JSON POST request.
pub fn json_request(
    method: axum::http::Method,
    uri: &str,
    body: serde_json::Value,
) -> axum::http::Request<axum::body::Body> {
    use axum::{
        body::Body,
        http::{header, Request},
    };

    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Build a GET request.
pub fn get_request(uri: &str) -> axum::http::Request<axum::body::Body> {
    use axum::{body::Body, http::Request};

    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn unique_source_id() -> i64 {
    // Uuid as a cheap unique integer source; the column only needs
    // uniqueness per test run.
    (Uuid::new_v4().as_u128() % i64::MAX as u128) as i64
}
