//! End-to-end tests of the HTTP repositories against an in-process backend.

use api_client::connect_with_storage;
use axum::extract::{Path, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use clinic_core::{ClinicConfig, ClinicStores, MemorySessionStorage, Outcome, Role};
use clinic_types::Doctor;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct Backend {
    doctors: Mutex<Vec<Value>>,
    seen_auth: Mutex<Vec<Option<String>>>,
}

impl Backend {
    fn record_auth(&self, headers: &HeaderMap) {
        let value = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        self.seen_auth.lock().unwrap().push(value);
    }
}

fn id_of(row: &Value) -> Option<i64> {
    row.get("doctorID").and_then(Value::as_i64)
}

async fn list_doctors(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Json<Value> {
    backend.record_auth(&headers);
    Json(Value::Array(backend.doctors.lock().unwrap().clone()))
}

async fn get_doctor(
    State(backend): State<Arc<Backend>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, StatusCode> {
    backend
        .doctors
        .lock()
        .unwrap()
        .iter()
        .find(|row| id_of(row) == Some(id))
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn create_doctor(
    State(backend): State<Arc<Backend>>,
    Json(mut body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut doctors = backend.doctors.lock().unwrap();
    if body.get("doctorEmail").and_then(Value::as_str) == Some("taken@clinic.test") {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "Email already registered" })),
        );
    }
    let next = doctors.iter().filter_map(id_of).max().unwrap_or(0) + 1;
    body["doctorID"] = json!(next);
    body["id"] = json!(next);
    doctors.push(body.clone());
    (StatusCode::CREATED, Json(body))
}

async fn update_doctor(
    State(backend): State<Arc<Backend>>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut doctors = backend.doctors.lock().unwrap();
    let row = doctors
        .iter_mut()
        .find(|row| id_of(row) == Some(id))
        .ok_or(StatusCode::NOT_FOUND)?;
    *row = body.clone();
    Ok(Json(body))
}

async fn delete_doctor(State(backend): State<Arc<Backend>>, Path(id): Path<i64>) -> StatusCode {
    backend
        .doctors
        .lock()
        .unwrap()
        .retain(|row| id_of(row) != Some(id));
    StatusCode::NO_CONTENT
}

async fn patients_offline() -> (StatusCode, Json<Value>) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "message": "Database offline" })),
    )
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body.get("password").and_then(Value::as_str) == Some("secret") {
        (
            StatusCode::OK,
            Json(json!({ "token": "tok-1", "role": "Admin" })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        )
    }
}

async fn serve(backend: Arc<Backend>) -> SocketAddr {
    let app = Router::new()
        .route("/api/doctors", get(list_doctors).post(create_doctor))
        .route(
            "/api/doctors/:id",
            get(get_doctor).put(update_doctor).delete(delete_doctor),
        )
        .route("/api/patients", get(patients_offline))
        .route("/api/auth/login", post(login))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });
    addr
}

async fn stores_for(backend: Arc<Backend>) -> ClinicStores {
    let addr = serve(backend).await;
    let cfg = ClinicConfig::new(
        format!("http://{addr}/api"),
        ".clinic".into(),
        Duration::from_secs(120),
        Duration::from_secs(5),
    )
    .expect("Failed to build config");
    connect_with_storage(&cfg, Arc::new(MemorySessionStorage::new()))
        .expect("Failed to connect stores")
}

fn seeded() -> Arc<Backend> {
    let backend = Backend::default();
    *backend.doctors.lock().unwrap() = vec![
        json!({ "doctorID": 1, "doctorName": "Dr Ada", "doctorSpeciality": "GP" }),
        json!({ "doctorID": "2", "doctorName": "Dr Bo" }),
        json!({ "doctorID": 3, "doctorName": null, "doctorPhone": 5550100 }),
        json!({ "doctorName": "No identity" }),
    ];
    Arc::new(backend)
}

#[tokio::test]
async fn test_list_keeps_mistyped_rows_and_coerces_ids() {
    let stores = stores_for(seeded()).await;

    let outcome = stores.doctors.load_all(false).await;

    assert_eq!(outcome, Outcome::Applied);
    let names: Vec<String> = stores
        .doctors
        .select_all()
        .into_iter()
        .map(|d| d.doctor_name)
        .collect();
    assert_eq!(
        names,
        vec!["Dr Ada".to_string(), "Dr Bo".to_string(), String::new()]
    );
    assert_eq!(
        stores.doctors.select_by_id(3).and_then(|d| d.doctor_phone).as_deref(),
        Some("5550100")
    );
    assert_eq!(
        stores.doctors.select_by_id(2).map(|d| d.doctor_name).as_deref(),
        Some("Dr Bo")
    );
}

#[tokio::test]
async fn test_entity_requests_carry_session_token() {
    let backend = seeded();
    let stores = stores_for(backend.clone()).await;

    stores.doctors.load_all(false).await;
    assert_eq!(stores.auth.login("admin@clinic.test", "secret").await, Outcome::Applied);
    assert_eq!(stores.auth.role(), Some(Role::Admin));
    stores.doctors.load_all(true).await;

    let seen = backend.seen_auth.lock().unwrap().clone();
    assert_eq!(seen, vec![None, Some("Bearer tok-1".to_string())]);
}

#[tokio::test]
async fn test_failed_login_surfaces_backend_message() {
    let stores = stores_for(seeded()).await;

    let outcome = stores.auth.login("admin@clinic.test", "nope").await;

    assert_eq!(outcome, Outcome::Failed("Invalid credentials".into()));
    assert!(!stores.auth.is_authenticated());
}

#[tokio::test]
async fn test_missing_record_leaves_table_untouched() {
    let stores = stores_for(seeded()).await;
    stores.doctors.load_all(false).await;

    assert_eq!(stores.doctors.load_by_id(99).await, Outcome::Applied);
    assert_eq!(stores.doctors.count(), 3);
    assert_eq!(stores.doctors.last_error(), None);
}

#[tokio::test]
async fn test_create_update_delete_against_backend() {
    let backend = seeded();
    let stores = stores_for(backend.clone()).await;
    stores.doctors.load_all(false).await;

    let created = stores
        .doctors
        .create(Doctor {
            doctor_name: "Dr Cy".into(),
            ..Doctor::default()
        })
        .await;
    assert_eq!(created, Outcome::Applied);
    let new_doctor = stores.doctors.select_by_id(4).expect("created doctor is stored");
    assert_eq!(new_doctor.doctor_name, "Dr Cy");

    let renamed = Doctor {
        doctor_name: "Dr Cy Jones".into(),
        ..new_doctor
    };
    assert_eq!(stores.doctors.update(renamed).await, Outcome::Applied);
    assert_eq!(
        stores.doctors.select_by_id(4).map(|d| d.doctor_name).as_deref(),
        Some("Dr Cy Jones")
    );

    assert_eq!(stores.doctors.delete(1).await, Outcome::Applied);
    assert_eq!(stores.doctors.select_by_id(1), None);
    assert_eq!(backend.doctors.lock().unwrap().len(), 4);
}

#[tokio::test]
async fn test_create_conflict_keeps_message_and_table() {
    let stores = stores_for(seeded()).await;
    stores.doctors.load_all(false).await;

    let outcome = stores
        .doctors
        .create(Doctor {
            doctor_name: "Dr Dup".into(),
            doctor_email: Some("taken@clinic.test".into()),
            ..Doctor::default()
        })
        .await;

    assert_eq!(outcome, Outcome::Failed("Email already registered".into()));
    assert_eq!(
        stores.doctors.last_error().as_deref(),
        Some("Email already registered")
    );
    assert_eq!(stores.doctors.count(), 3);
}

#[tokio::test]
async fn test_error_statuses_map_to_store_errors() {
    let stores = stores_for(seeded()).await;

    let load = stores.load_dashboards(false).await;

    assert_eq!(load.patients, Outcome::Failed("Database offline".into()));
    // No route: a bare 404 without a message falls back to the default text.
    assert_eq!(load.fees, Outcome::Failed("Failed to load fees".into()));
    assert_eq!(load.activity, Outcome::Failed("Failed to load activity".into()));
    assert_eq!(load.doctors, Outcome::Applied);
}
