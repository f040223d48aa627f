//! Integration tests for API endpoints.
//!
//! Services are replaced by hand-written doubles; tokens are minted with a
//! real `TokenIssuer` so the auth middleware and role gate run unchanged.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;

use employee_management::api::{cors_layer, create_router, AppState};
use employee_management::config::JwtConfig;
use employee_management::domain::{Employee, EmployeeDetails, Identity, Role};
use employee_management::errors::{AppError, AppResult};
use employee_management::infra::Database;
use employee_management::services::{
    AuthService, Claims, EmployeeRegistration, EmployeeService, TokenIssuer, TokenResponse,
};

// =============================================================================
// Test doubles
// =============================================================================

fn jwt_config() -> JwtConfig {
    JwtConfig::new(
        "api-test-secret-key-for-testing-only-32chars",
        "employee-api",
        "employee-clients",
    )
    .unwrap()
}

fn identity(id: i32, username: &str, role: &str) -> Identity {
    Identity {
        id,
        username: username.to_string(),
        email: format!("{}@example.com", username),
        password_hash: "hashed".to_string(),
        role: role.to_string(),
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn employee(id: i32, details: EmployeeDetails) -> Employee {
    Employee {
        id,
        user_id: None,
        first_name: details.first_name,
        last_name: details.last_name,
        email: details.email,
        phone: details.phone,
        department: details.department,
        position: details.position,
        salary: details.salary,
        hire_date: details.hire_date,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn ada() -> EmployeeDetails {
    EmployeeDetails {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        phone: "555-0100".to_string(),
        department: "Engineering".to_string(),
        position: "Analyst".to_string(),
        salary: Decimal::new(8500050, 2),
        hire_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
    }
}

/// Auth double: one known login, one taken username, real token checks
struct StubAuthService {
    tokens: Arc<TokenIssuer>,
}

#[async_trait]
impl AuthService for StubAuthService {
    async fn register(
        &self,
        username: String,
        _email: String,
        _password: String,
        role: Option<Role>,
    ) -> AppResult<Identity> {
        if role == Some(Role::Admin) {
            return Err(AppError::validation("Only the User role can be requested"));
        }
        if username == "taken" {
            return Err(AppError::conflict("Username or email already exists"));
        }
        Ok(identity(10, &username, "User"))
    }

    async fn login(&self, username: String, password: String) -> AppResult<TokenResponse> {
        if username == "alice" && password == "CorrectHorse1" {
            let token = self.tokens.issue(&identity(1, "alice", "User"))?;
            Ok(TokenResponse { token })
        } else {
            Err(AppError::InvalidCredentials)
        }
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        self.tokens.validate(token)
    }
}

/// Employee double that counts mutating calls
#[derive(Default)]
struct RecordingEmployeeService {
    creates: AtomicUsize,
    updates: AtomicUsize,
    deletes: AtomicUsize,
}

#[async_trait]
impl EmployeeService for RecordingEmployeeService {
    async fn list_employees(&self) -> AppResult<Vec<Employee>> {
        Ok(vec![employee(1, ada())])
    }

    async fn get_employee(&self, id: i32) -> AppResult<Employee> {
        if id == 1 {
            Ok(employee(1, ada()))
        } else {
            Err(AppError::NotFound)
        }
    }

    async fn create_employee(&self, details: EmployeeDetails) -> AppResult<Employee> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        Ok(employee(2, details))
    }

    async fn update_employee(&self, id: i32, details: EmployeeDetails) -> AppResult<Employee> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(employee(id, details))
    }

    async fn delete_employee(&self, id: i32) -> AppResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if id == 1 {
            Ok(())
        } else {
            Err(AppError::NotFound)
        }
    }

    async fn register_employee(&self, registration: EmployeeRegistration) -> AppResult<Employee> {
        let mut employee = employee(3, registration.details);
        employee.user_id = Some(11);
        Ok(employee)
    }
}

// =============================================================================
// Test helpers
// =============================================================================

struct TestApp {
    router: Router,
    tokens: Arc<TokenIssuer>,
    employees: Arc<RecordingEmployeeService>,
}

impl TestApp {
    async fn new() -> Self {
        let connection = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        let database = Arc::new(Database::from_connection(connection));

        let tokens = Arc::new(TokenIssuer::new(jwt_config()));
        let employees = Arc::new(RecordingEmployeeService::default());
        let state = AppState::new(
            Arc::new(StubAuthService {
                tokens: tokens.clone(),
            }),
            employees.clone(),
            database,
        );

        Self {
            router: create_router(state, cors_layer(None)),
            tokens,
            employees,
        }
    }

    fn token(&self, role: &str) -> String {
        self.tokens.issue(&identity(1, "tester", role)).unwrap()
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}

fn employee_payload() -> Value {
    json!({
        "firstName": "Grace",
        "lastName": "Hopper",
        "email": "grace@example.com",
        "phone": "555-0199",
        "department": "Research",
        "position": "Admiral",
        "salary": 120000.25,
        "hireDate": "2023-11-20"
    })
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/employees", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_non_bearer_header_is_unauthorized() {
    let app = TestApp::new().await;
    let request = Request::builder()
        .uri("/employees")
        .header(header::AUTHORIZATION, format!("Token {}", app.token("User")))
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_is_unauthorized() {
    let app = TestApp::new().await;
    let stale = app
        .tokens
        .issue_at(&identity(1, "tester", "User"), Utc::now() - Duration::hours(2))
        .unwrap();

    let (status, _) = app.send(Method::GET, "/employees", Some(&stale), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_from_other_secret_is_unauthorized() {
    let app = TestApp::new().await;
    let foreign = TokenIssuer::new(
        JwtConfig::new(
            "a-completely-different-secret-of-32-chars",
            "employee-api",
            "employee-clients",
        )
        .unwrap(),
    )
    .issue(&identity(1, "tester", "Admin"))
    .unwrap();

    let (status, _) = app.send(Method::GET, "/employees", Some(&foreign), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_returns_token() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": "alice", "password": "CorrectHorse1" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let claims = app.tokens.validate(body["token"].as_str().unwrap()).unwrap();
    assert_eq!(claims.name, "alice");
    assert_eq!(claims.role, "User");
}

#[tokio::test]
async fn test_login_failure_is_uniform() {
    let app = TestApp::new().await;

    let (wrong_status, wrong_body) = app
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": "alice", "password": "nope" })),
        )
        .await;
    let (unknown_status, unknown_body) = app
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": "nobody", "password": "CorrectHorse1" })),
        )
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["message"], "Invalid username or password");
}

#[tokio::test]
async fn test_register_returns_confirmation() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "username": "bob",
                "email": "bob@example.com",
                "password": "SecurePass123"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Registration successful");
}

#[tokio::test]
async fn test_register_duplicate_is_bad_request() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "username": "taken",
                "email": "taken@example.com",
                "password": "SecurePass123"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Username or email already exists");
}

#[tokio::test]
async fn test_register_reports_invalid_fields() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "username": "",
                "email": "not-an-email",
                "password": "short",
                "role": "Superuser"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    let fields = body["fields"].as_object().unwrap();
    for field in ["username", "email", "password", "role"] {
        assert!(fields.contains_key(field), "missing error for {}", field);
    }
}

#[tokio::test]
async fn test_register_admin_role_is_rejected() {
    let app = TestApp::new().await;

    let (status, _) = app
        .send(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "username": "eve",
                "email": "eve@example.com",
                "password": "SecurePass123",
                "role": "Admin"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Employees
// =============================================================================

#[tokio::test]
async fn test_any_role_can_list_employees() {
    let app = TestApp::new().await;
    let token = app.token("User");

    let (status, body) = app.send(Method::GET, "/employees", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["firstName"], "Ada");
    assert_eq!(list[0]["salary"], 85000.5);
    assert_eq!(list[0]["hireDate"], "2024-03-01");
    assert!(list[0].get("userId").is_none());
}

#[tokio::test]
async fn test_get_unknown_employee_is_not_found() {
    let app = TestApp::new().await;
    let token = app.token("User");

    let (status, body) = app.send(Method::GET, "/employees/99", Some(&token), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_user_cannot_create_employee() {
    let app = TestApp::new().await;
    let token = app.token("User");

    let (status, body) = app
        .send(Method::POST, "/employees", Some(&token), Some(employee_payload()))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
    assert_eq!(app.employees.creates.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_role_cannot_create_employee() {
    let app = TestApp::new().await;
    let token = app.token("Auditor");

    let (status, _) = app
        .send(Method::POST, "/employees", Some(&token), Some(employee_payload()))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(app.employees.creates.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_admin_creates_employee() {
    let app = TestApp::new().await;
    let token = app.token("Admin");

    let (status, body) = app
        .send(Method::POST, "/employees", Some(&token), Some(employee_payload()))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "grace@example.com");
    assert_eq!(body["salary"], 120000.25);
    assert_eq!(app.employees.creates.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_create_rejects_invalid_payload() {
    let app = TestApp::new().await;
    let token = app.token("Admin");
    let mut payload = employee_payload();
    payload["salary"] = json!(-5);
    payload["firstName"] = json!("");

    let (status, body) = app
        .send(Method::POST, "/employees", Some(&token), Some(payload))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields = body["fields"].as_object().unwrap();
    assert!(fields.contains_key("salary"));
    assert!(fields.contains_key("firstName"));
    assert!(!fields.contains_key("first_name"));
    assert_eq!(app.employees.creates.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_user_cannot_update_or_delete() {
    let app = TestApp::new().await;
    let token = app.token("User");

    let (update_status, _) = app
        .send(Method::PUT, "/employees/1", Some(&token), Some(employee_payload()))
        .await;
    let (delete_status, _) = app.send(Method::DELETE, "/employees/1", Some(&token), None).await;

    assert_eq!(update_status, StatusCode::FORBIDDEN);
    assert_eq!(delete_status, StatusCode::FORBIDDEN);
    assert_eq!(app.employees.updates.load(Ordering::SeqCst), 0);
    assert_eq!(app.employees.deletes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_admin_updates_and_deletes() {
    let app = TestApp::new().await;
    let token = app.token("Admin");

    let (update_status, body) = app
        .send(Method::PUT, "/employees/1", Some(&token), Some(employee_payload()))
        .await;
    let (delete_status, delete_body) =
        app.send(Method::DELETE, "/employees/1", Some(&token), None).await;

    assert_eq!(update_status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["lastName"], "Hopper");
    assert_eq!(delete_status, StatusCode::NO_CONTENT);
    assert_eq!(delete_body, Value::Null);
}

#[tokio::test]
async fn test_admin_delete_unknown_is_not_found() {
    let app = TestApp::new().await;
    let token = app.token("Admin");

    let (status, _) = app.send(Method::DELETE, "/employees/42", Some(&token), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_employee_registration_is_public() {
    let app = TestApp::new().await;
    let mut payload = employee_payload();
    payload["username"] = json!("grace");
    payload["password"] = json!("SecurePass123");

    let (status, body) = app
        .send(Method::POST, "/employees/register", None, Some(payload))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 3);
    assert_eq!(body["firstName"], "Grace");
}

#[tokio::test]
async fn test_employee_registration_validates_nested_profile() {
    let app = TestApp::new().await;
    let mut payload = employee_payload();
    payload["username"] = json!("grace");
    payload["password"] = json!("SecurePass123");
    payload["email"] = json!("not-an-email");

    let (status, body) = app
        .send(Method::POST, "/employees/register", None, Some(payload))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"].as_object().unwrap().contains_key("email"));
}

// =============================================================================
// Infrastructure routes
// =============================================================================

#[tokio::test]
async fn test_unknown_path_returns_json_404() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/no/such/endpoint", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Endpoint not found" }));
}

#[tokio::test]
async fn test_health_reports_database() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["database"]["status"], "healthy");
}
