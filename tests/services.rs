mod common;

use common::MockServer;
use serde_json::json;
use std::sync::Arc;

use carehub::api::{ApiClient, Endpoints, HealthStatus, StaticToken};
use carehub::models::{Appointment, NotificationStatus, SignInRequest};
use carehub::storage::LocalStore;
use carehub::{Session, TokenSource};

#[tokio::test]
async fn test_bearer_token_except_on_sign_in() {
    let server = MockServer::start().await;
    server.on(
        "GET",
        "/residents",
        200,
        json!([{"id": 1, "dni": "12345678", "firstName": "Rosa", "lastName": "Perez"}]),
    );
    server.on(
        "POST",
        "/authentication/sign-in",
        200,
        json!({"id": 7, "username": "ana@mail.com", "token": "jwt"}),
    );
    let client = server.client(Some("secret"));

    let residents = client.residents().list().await.unwrap();
    assert_eq!(residents.len(), 1);
    assert_eq!(residents[0].full_name(), "Rosa Perez");

    let auth = client
        .iam()
        .sign_in(&SignInRequest {
            username: "ana@mail.com".into(),
            password: "secret1".into(),
        })
        .await
        .unwrap();
    assert_eq!(auth.token.as_deref(), Some("jwt"));

    let requests = server.requests();
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer secret"));
    assert_eq!(requests[1].path, "/authentication/sign-in");
    assert_eq!(requests[1].authorization, None);
    assert_eq!(
        requests[1].body,
        Some(json!({"username": "ana@mail.com", "password": "secret1"}))
    );
}

#[tokio::test]
async fn test_no_header_without_token() {
    let server = MockServer::start().await;
    server.on("GET", "/receipts", 200, json!([]));

    let receipts = server.client(None).payments().list().await.unwrap();
    assert!(receipts.is_empty());
    assert_eq!(server.requests()[0].authorization, None);
}

#[tokio::test]
async fn test_token_read_on_every_request() {
    let server = MockServer::start().await;
    server.on("GET", "/doctors", 200, json!([]));

    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(LocalStore::open(dir.path()).unwrap());
    let session = Session::new(store.clone());
    let client = server.client_with(store);

    client.users().list_doctors().await.unwrap();
    session.set_token("first").unwrap();
    client.users().list_doctors().await.unwrap();
    session.logout().unwrap();
    client.users().list_doctors().await.unwrap();

    let auth: Vec<_> = server
        .requests()
        .into_iter()
        .map(|r| r.authorization)
        .collect();
    assert_eq!(auth, vec![None, Some("Bearer first".to_string()), None]);
}

#[tokio::test]
async fn test_error_message_from_body() {
    let server = MockServer::start().await;
    server.on(
        "POST",
        "/residents",
        400,
        json!({"message": "DNI already registered"}),
    );

    let err = server
        .client(Some("t"))
        .residents()
        .create(&Default::default())
        .await
        .unwrap_err();
    assert_eq!(err.status, Some(400));
    assert_eq!(err.message, "DNI already registered");
    assert_eq!(err.details, Some(json!({"message": "DNI already registered"})));
}

#[tokio::test]
async fn test_error_without_message_uses_status_line() {
    let server = MockServer::start().await;
    server.on_text("GET", "/appointments/4", 503, "");

    let err = server
        .client(Some("t"))
        .appointments()
        .get(4)
        .await
        .unwrap_err();
    assert_eq!(err.status, Some(503));
    assert_eq!(err.message, "HTTP 503 Service Unavailable");
    assert_eq!(err.details, None);
}

#[tokio::test]
async fn test_not_found() {
    let server = MockServer::start().await;

    let err = server.client(None).residents().get(99).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.message, "No such route");
}

#[tokio::test]
async fn test_unreachable_service() {
    let client = ApiClient::with_http(
        reqwest::Client::new(),
        Endpoints::uniform("http://127.0.0.1:1/api/v1"),
        Arc::new(StaticToken(None)),
    );

    let err = client.residents().list().await.unwrap_err();
    assert_eq!(err.status, None);
    assert!(err.message.starts_with("Service unavailable"), "{}", err.message);
}

#[tokio::test]
async fn test_unexpected_body_is_an_error() {
    let server = MockServer::start().await;
    server.on("GET", "/residents", 200, json!({"unexpected": true}));

    let err = server.client(None).residents().list().await.unwrap_err();
    assert_eq!(err.status, Some(200));
    assert!(err.message.starts_with("Invalid response body"));
}

#[tokio::test]
async fn test_search_query_parameters() {
    let server = MockServer::start().await;
    server.on(
        "GET",
        "/appointments/searchByResidentId",
        200,
        json!([{"id": 3, "residentId": 5, "doctorId": 2, "date": "2024-06-10",
                "time": "09:30:00", "status": "SCHEDULED"}]),
    );
    server.on("GET", "/notifications/search", 200, json!([]));
    let client = server.client(Some("t"));

    let appointments = client.appointments().search_by_resident(5).await.unwrap();
    assert_eq!(appointments[0].time_label(), "09:30");
    client
        .notifications()
        .search_by_status(NotificationStatus::Unread)
        .await
        .unwrap();

    let requests = server.requests();
    assert_eq!(requests[0].query.as_deref(), Some("residentId=5"));
    assert_eq!(requests[1].query.as_deref(), Some("status=unread"));
}

#[tokio::test]
async fn test_string_ids_are_path_encoded() {
    let server = MockServer::start().await;
    server.on(
        "POST",
        "/notifications/n%2F1/mark-as-read",
        200,
        json!({"id": "n/1", "title": "Visit", "status": "READ"}),
    );

    let updated = server
        .client(Some("t"))
        .notifications()
        .mark_as_read("n/1")
        .await
        .unwrap();
    assert_eq!(updated.effective_status(), NotificationStatus::Read);
    assert_eq!(server.requests()[0].method, "POST");
}

#[tokio::test]
async fn test_accept_rewrites_only_the_status() {
    let server = MockServer::start().await;
    let stored = json!({"id": 4, "residentId": 5, "doctorId": 2, "date": "2024-06-10",
                        "time": {"hour": 9, "minute": 30, "second": 0, "nano": 0},
                        "status": "SCHEDULED"});
    server.on("GET", "/appointments/4", 200, stored);
    server.on(
        "PUT",
        "/appointments/4",
        200,
        json!({"id": 4, "residentId": 5, "doctorId": 2, "date": "2024-06-10",
               "time": "09:30:00", "status": "accepted"}),
    );

    let updated = server
        .client(Some("t"))
        .appointments()
        .set_status(4, Appointment::ACCEPTED)
        .await
        .unwrap();
    assert_eq!(updated.status.as_deref(), Some("accepted"));

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[1].method, "PUT");
    assert_eq!(
        requests[1].body,
        Some(json!({"residentId": 5, "doctorId": 2, "date": "2024-06-10",
                    "time": {"hour": 9, "minute": 30, "second": 0, "nano": 0},
                    "status": "accepted"}))
    );
}

#[tokio::test]
async fn test_reject_unknown_appointment_sends_no_update() {
    let server = MockServer::start().await;

    let err = server
        .client(Some("t"))
        .appointments()
        .set_status(9, Appointment::REJECTED)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(server.requests_to("PUT", "/appointments/9").is_empty());
}

#[tokio::test]
async fn test_delete_accepts_empty_body() {
    let server = MockServer::start().await;
    server.on_text("DELETE", "/receipts/8", 204, "");

    server.client(Some("t")).payments().delete(8).await.unwrap();
    assert_eq!(server.requests_to("DELETE", "/receipts/8").len(), 1);
}

#[tokio::test]
async fn test_food_entry_numeric_id() {
    let server = MockServer::start().await;
    server.on(
        "GET",
        "/food-entries/resident/3",
        200,
        json!([{"id": 12, "meal": "LUNCH", "description": "Soup", "date": "2024-06-10",
                "time": "13:00", "residentId": 3}]),
    );

    let entries = server.client(Some("t")).food().by_resident(3).await.unwrap();
    assert_eq!(entries[0].id, "12");
    assert_eq!(entries[0].resident_id, Some(3));
}

#[tokio::test]
async fn test_health_reports_every_service() {
    let server = MockServer::start().await;
    server.on("GET", "/authentication/health", 200, json!({"status": "UP"}));
    server.on("GET", "/residents", 200, json!([{"id": 1}, {"id": 2}]));
    server.on("GET", "/receipts", 500, json!({"message": "Database down"}));

    let results = carehub::api::health::probe_all(&server.client(Some("t"))).await;
    assert_eq!(results.len(), 8);

    let by_name = |name: &str| results.iter().find(|r| r.name == name).unwrap();
    assert_eq!(by_name("IAM").status, HealthStatus::Ok { items: None });
    assert_eq!(by_name("Residents").status, HealthStatus::Ok { items: Some(2) });
    assert_eq!(
        by_name("Payments").status,
        HealthStatus::Failed {
            status: Some(500),
            message: "Database down".into()
        }
    );
    assert_eq!(
        by_name("Food").status,
        HealthStatus::Failed {
            status: Some(404),
            message: "No such route".into()
        }
    );
    assert!(by_name("Residents").url.ends_with("/api/v1/residents"));
}

#[test]
fn test_store_is_a_token_source() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::open(dir.path()).unwrap();
    assert_eq!(store.token(), None);
    store.set("authToken", "abc").unwrap();
    assert_eq!(store.token().as_deref(), Some("abc"));
}
