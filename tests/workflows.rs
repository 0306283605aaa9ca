mod common;

use chrono::NaiveDate;
use common::MockServer;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

use carehub::api::ApiClient;
use carehub::cache::ResidentProfiles;
use carehub::routing::Role;
use carehub::storage::{LocalStore, Session};
use carehub::validation::{LoginForm, RegisterForm, Rule};
use carehub::workflows::{self, RegistrationStep, WorkflowError};

struct Harness {
    server: MockServer,
    session: Session,
    client: ApiClient,
    _dir: TempDir,
}

async fn harness() -> Harness {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(LocalStore::open(dir.path()).unwrap());
    let client = server.client_with(store.clone());
    Harness {
        server,
        session: Session::new(store),
        client,
        _dir: dir,
    }
}

fn login_form(email: &str) -> LoginForm {
    LoginForm {
        email: email.into(),
        password: "secret1".into(),
    }
}

fn family_form() -> RegisterForm {
    RegisterForm {
        name: "Ana Torres".into(),
        email: "ana@mail.com".into(),
        password: "secret1".into(),
        confirm_password: "secret1".into(),
        role: Some(Role::FamilyMember),
        relationship: "Hija".into(),
        resident_name: "Rosa Torres".into(),
        resident_age: "84".into(),
        ..RegisterForm::default()
    }
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[tokio::test]
async fn test_login_with_role_in_response() {
    let h = harness().await;
    h.server.on(
        "POST",
        "/authentication/sign-in",
        200,
        json!({"id": 4, "username": "luis@mail.com", "token": "jwt", "roles": ["ROLE_CARER"]}),
    );

    let outcome = workflows::login(&h.client, &h.session, &login_form("luis@mail.com"))
        .await
        .unwrap();
    assert_eq!(outcome.home, "/cuidador/dashboard");
    assert_eq!(outcome.user.role, Role::Carer);
    assert_eq!(outcome.user.id, 4);

    assert!(h.session.is_authenticated());
    assert_eq!(h.session.token().as_deref(), Some("jwt"));
    assert_eq!(h.session.current_user(), Some(outcome.user));
    assert_eq!(h.server.requests().len(), 1);
}

#[tokio::test]
async fn test_login_looks_up_role_when_missing() {
    let h = harness().await;
    h.server.on(
        "POST",
        "/authentication/sign-in",
        200,
        json!({"id": 9, "username": "house@mail.com", "token": "jwt"}),
    );
    h.server.on(
        "GET",
        "/users",
        200,
        json!([
            {"id": 1, "username": "other@mail.com", "roles": ["ROLE_CARER"]},
            {"id": 9, "username": "house@mail.com", "roles": ["ROLE_DOCTOR"]}
        ]),
    );

    let outcome = workflows::login(&h.client, &h.session, &login_form("house@mail.com"))
        .await
        .unwrap();
    assert_eq!(outcome.user.role, Role::Doctor);
    assert_eq!(outcome.home, "/doctor/gestion-citas");

    let lookups = h.server.requests_to("GET", "/users");
    assert_eq!(lookups.len(), 1);
    assert_eq!(lookups[0].authorization.as_deref(), Some("Bearer jwt"));
}

#[tokio::test]
async fn test_login_unknown_role_leaves_session_empty() {
    let h = harness().await;
    h.server.on(
        "POST",
        "/authentication/sign-in",
        200,
        json!({"id": 9, "username": "x@mail.com", "token": "jwt", "roles": ["ROLE_GUEST"]}),
    );
    h.server.on("GET", "/users", 200, json!([]));

    let err = workflows::login(&h.client, &h.session, &login_form("x@mail.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::UnknownRole(_)));
    assert_eq!(h.session.token(), None);
    assert_eq!(h.session.current_user(), None);
}

#[tokio::test]
async fn test_login_rejected_credentials() {
    let h = harness().await;
    h.server.on(
        "POST",
        "/authentication/sign-in",
        401,
        json!({"message": "Invalid credentials"}),
    );

    let err = workflows::login(&h.client, &h.session, &login_form("ana@mail.com"))
        .await
        .unwrap_err();
    match err {
        WorkflowError::Api(api) => {
            assert!(api.is_unauthorized());
            assert_eq!(api.message, "Invalid credentials");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!h.session.is_authenticated());
}

#[tokio::test]
async fn test_login_without_token() {
    let h = harness().await;
    h.server.on(
        "POST",
        "/authentication/sign-in",
        200,
        json!({"id": 4, "username": "ana@mail.com", "roles": ["ROLE_CARER"]}),
    );

    let err = workflows::login(&h.client, &h.session, &login_form("ana@mail.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::MissingToken));
}

#[tokio::test]
async fn test_invalid_login_form_sends_nothing() {
    let h = harness().await;
    let form = LoginForm {
        email: "not-an-email".into(),
        password: "123".into(),
    };

    let err = workflows::login(&h.client, &h.session, &form).await.unwrap_err();
    let WorkflowError::Validation(errors) = err else {
        panic!("expected validation errors");
    };
    assert_eq!(errors.rule_for("email"), Some(&Rule::Email));
    assert_eq!(errors.rule_for("password"), Some(&Rule::MinLength { min: 6 }));
    assert!(h.server.requests().is_empty());
}

fn mock_family_registration(server: &MockServer) {
    server.on(
        "POST",
        "/authentication/sign-up",
        201,
        json!({"id": 30, "username": "ana@mail.com", "roles": ["ROLE_FAMILY_MEMBER"]}),
    );
    server.on(
        "POST",
        "/authentication/sign-in",
        200,
        json!({"id": 30, "username": "ana@mail.com", "token": "jwt",
               "roles": ["ROLE_FAMILY_MEMBER"]}),
    );
}

#[tokio::test]
async fn test_family_registration_then_login() {
    let h = harness().await;
    mock_family_registration(&h.server);
    h.server.on(
        "POST",
        "/residents",
        201,
        json!({"id": 11, "firstName": "Rosa", "lastName": "Torres"}),
    );
    h.server.on(
        "POST",
        "/family-members",
        201,
        json!({"id": 21, "relationship": "Hija", "linkedResidentId": 11}),
    );

    let outcome = workflows::register(&h.client, &h.session, &family_form())
        .await
        .unwrap();
    assert_eq!(
        outcome.completed,
        vec![
            RegistrationStep::SignUp,
            RegistrationStep::SignIn,
            RegistrationStep::CreateResident,
            RegistrationStep::LinkFamilyMember,
            RegistrationStep::StoreProfile,
        ]
    );
    assert_eq!(outcome.user_id, Some(30));
    assert_eq!(outcome.resident_id, Some(11));
    assert_eq!(outcome.redirect, "/login?registered=true&email=ana%40mail.com");

    let sign_up = &h.server.requests_to("POST", "/authentication/sign-up")[0];
    assert_eq!(
        sign_up.body,
        Some(json!({"username": "ana@mail.com", "password": "secret1",
                    "roles": ["ROLE_FAMILY_MEMBER"]}))
    );
    let resident = &h.server.requests_to("POST", "/residents")[0];
    assert_eq!(resident.authorization.as_deref(), Some("Bearer jwt"));
    assert_eq!(resident.body.as_ref().unwrap()["firstName"], "Rosa");
    let link = &h.server.requests_to("POST", "/family-members")[0];
    assert_eq!(link.body.as_ref().unwrap()["linkedResidentId"], 11);

    // Registration never leaves a session behind
    assert_eq!(h.session.token(), None);

    let profiles = ResidentProfiles::new(h.session.store().clone()).all().unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].resident.remote_id, Some(11));
    assert_eq!(profiles[0].family_member.remote_id, Some(21));
    assert_eq!(profiles[0].family_member.relationship, "Hija");

    let login = workflows::login(&h.client, &h.session, &login_form("ana@mail.com"))
        .await
        .unwrap();
    assert_eq!(login.home, "/familiar/dashboard");
    assert_eq!(login.user.linked_resident_id, Some(11));
    assert_eq!(login.user.family_member_id, Some(21));
    let current = ResidentProfiles::new(h.session.store().clone())
        .current()
        .unwrap()
        .unwrap();
    assert_eq!(current.resident.name, "Rosa Torres");
}

#[tokio::test]
async fn test_registration_reports_orphaned_account() {
    let h = harness().await;
    mock_family_registration(&h.server);
    h.server.on("POST", "/residents", 500, json!({"message": "Database down"}));

    let err = workflows::register(&h.client, &h.session, &family_form())
        .await
        .unwrap_err();
    let WorkflowError::Registration(failure) = err else {
        panic!("expected a registration failure");
    };
    assert_eq!(failure.failed, RegistrationStep::CreateResident);
    assert_eq!(
        failure.completed,
        vec![RegistrationStep::SignUp, RegistrationStep::SignIn]
    );
    assert_eq!(failure.orphaned_user_id, Some(30));
    assert!(failure.to_string().contains("Database down"));

    assert!(h.server.requests_to("POST", "/family-members").is_empty());
    assert_eq!(h.session.token(), None);
    assert!(ResidentProfiles::new(h.session.store().clone())
        .all()
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_sign_up_failure_has_no_orphan() {
    let h = harness().await;
    h.server.on(
        "POST",
        "/authentication/sign-up",
        409,
        json!({"message": "Username already exists"}),
    );

    let err = workflows::register(&h.client, &h.session, &family_form())
        .await
        .unwrap_err();
    let WorkflowError::Registration(failure) = err else {
        panic!("expected a registration failure");
    };
    assert_eq!(failure.failed, RegistrationStep::SignUp);
    assert!(failure.completed.is_empty());
    assert_eq!(failure.orphaned_user_id, None);
    assert_eq!(
        failure.to_string(),
        "Registration failed while creating the account: Username already exists"
    );
}

#[tokio::test]
async fn test_doctor_registration() {
    let h = harness().await;
    h.server.on(
        "POST",
        "/authentication/sign-up",
        201,
        json!({"id": 40, "username": "house@mail.com", "roles": ["ROLE_DOCTOR"]}),
    );
    h.server.on(
        "POST",
        "/authentication/sign-in",
        200,
        json!({"id": 40, "username": "house@mail.com", "token": "jwt"}),
    );
    h.server.on("POST", "/doctors", 201, json!({"id": 5}));

    let form = RegisterForm {
        name: "Greg House".into(),
        email: "house@mail.com".into(),
        password: "secret1".into(),
        confirm_password: "secret1".into(),
        role: Some(Role::Doctor),
        license_number: "CMP-123".into(),
        specialty: "Geriatrics".into(),
        ..RegisterForm::default()
    };
    let outcome = workflows::register(&h.client, &h.session, &form).await.unwrap();
    assert_eq!(
        outcome.completed.last(),
        Some(&RegistrationStep::CreateDoctor)
    );

    let body = h.server.requests_to("POST", "/doctors")[0].body.clone().unwrap();
    assert_eq!(body["licenseNumber"], "CMP-123");
    assert_eq!(body["fullName"]["firstName"], "Greg");
    assert_eq!(body["fullName"]["lastName"], "House");
}

#[tokio::test]
async fn test_carer_registration() {
    let h = harness().await;
    h.server.on(
        "POST",
        "/authentication/sign-up",
        201,
        json!({"id": 50, "username": "marta@mail.com", "roles": ["ROLE_CARER"]}),
    );
    h.server.on(
        "POST",
        "/authentication/sign-in",
        200,
        json!({"id": 50, "username": "marta@mail.com", "token": "jwt"}),
    );
    h.server.on("POST", "/carers", 201, json!({"id": 8}));

    let form = RegisterForm {
        name: "Marta Diaz".into(),
        email: "marta@mail.com".into(),
        password: "secret1".into(),
        confirm_password: "secret1".into(),
        role: Some(Role::Carer),
        dni: "12345678".into(),
        ..RegisterForm::default()
    };
    let outcome = workflows::register(&h.client, &h.session, &form).await.unwrap();
    assert_eq!(outcome.user_id, Some(50));
    assert_eq!(
        outcome.completed,
        vec![
            RegistrationStep::SignUp,
            RegistrationStep::SignIn,
            RegistrationStep::CreateCarer
        ]
    );
    assert_eq!(outcome.resident_id, None);

    let sign_up = h.server.requests_to("POST", "/authentication/sign-up");
    assert_eq!(sign_up[0].body.as_ref().unwrap()["roles"], json!(["ROLE_CARER"]));

    let carer = &h.server.requests_to("POST", "/carers")[0];
    assert_eq!(carer.authorization.as_deref(), Some("Bearer jwt"));
    assert_eq!(
        carer.body,
        Some(json!({"dni": "12345678", "fullName": "Marta Diaz", "email": "marta@mail.com"}))
    );
    assert!(!h.session.is_authenticated());
}

#[tokio::test]
async fn test_developer_accounts_cannot_register() {
    let h = harness().await;
    let form = RegisterForm {
        name: "Dev Ops".into(),
        email: "dev@mail.com".into(),
        password: "secret1".into(),
        confirm_password: "secret1".into(),
        role: Some(Role::Developer),
        ..RegisterForm::default()
    };

    let err = workflows::register(&h.client, &h.session, &form).await.unwrap_err();
    let WorkflowError::Validation(errors) = err else {
        panic!("expected validation errors");
    };
    assert_eq!(errors.rule_for("role"), Some(&Rule::Invalid));
    assert!(h.server.requests().is_empty());
}

#[tokio::test]
async fn test_family_dashboard_scoped_to_resident() {
    let h = harness().await;
    h.server.on(
        "GET",
        "/appointments/searchByResidentId",
        200,
        json!([
            {"id": 1, "residentId": 11, "date": "2024-06-09", "time": "09:00", "status": "COMPLETED"},
            {"id": 2, "residentId": 11, "date": "2024-06-12", "time": "10:00", "status": "SCHEDULED"},
            {"id": 3, "residentId": 11, "date": "2024-06-11", "time": "11:00", "status": "SCHEDULED"}
        ]),
    );
    h.server.on(
        "GET",
        "/notifications/notifications/30",
        200,
        json!([{"id": "a", "status": "unread"}, {"id": "b", "read": true}]),
    );
    h.server.on(
        "GET",
        "/receipts/resident/11",
        200,
        json!([
            {"receiptId": 1, "totalAmount": 120.0, "status": false},
            {"receiptId": 2, "totalAmount": 80.0, "status": true}
        ]),
    );

    let user = carehub::CurrentUser {
        id: 30,
        email: "ana@mail.com".into(),
        name: "Ana Torres".into(),
        role: Role::FamilyMember,
        family_member_id: Some(21),
        linked_resident_id: Some(11),
    };
    let dashboard = workflows::family_dashboard(&h.client, &user, day("2024-06-10"))
        .await
        .unwrap();

    let ids: Vec<_> = dashboard
        .upcoming_appointments
        .iter()
        .filter_map(|a| a.id)
        .collect();
    assert_eq!(ids, vec![3, 2]);
    assert_eq!(dashboard.notification_count, 2);
    assert_eq!(dashboard.unread_notifications, 1);
    assert_eq!(dashboard.pending_payments, 1);
    assert_eq!(dashboard.pending_amount, 120.0);

    let search = &h.server.requests_to("GET", "/appointments/searchByResidentId")[0];
    assert_eq!(search.query.as_deref(), Some("residentId=11"));
}

#[tokio::test]
async fn test_dashboard_fails_when_any_branch_fails() {
    let h = harness().await;
    h.server.on("GET", "/residents", 200, json!([{"id": 1, "firstName": "Rosa"}]));
    h.server.on("GET", "/appointments", 500, json!({"message": "Appointments down"}));

    let err = workflows::carer_dashboard(&h.client, day("2024-06-10"))
        .await
        .unwrap_err();
    match err {
        WorkflowError::Api(api) => assert_eq!(api.message, "Appointments down"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_doctor_dashboard() {
    let h = harness().await;
    h.server.on(
        "GET",
        "/appointments/searchByDoctorId",
        200,
        json!([
            {"id": 1, "doctorId": 5, "date": "2024-06-10", "time": "15:00", "status": "SCHEDULED"},
            {"id": 2, "doctorId": 5, "date": "2024-06-10", "time": "08:00", "status": "SCHEDULED"},
            {"id": 3, "doctorId": 5, "date": "2024-06-20", "time": "08:00", "status": "SCHEDULED"}
        ]),
    );

    let dashboard = workflows::doctor_dashboard(&h.client, 5, day("2024-06-10"))
        .await
        .unwrap();
    let ids: Vec<_> = dashboard.appointments.iter().filter_map(|a| a.id).collect();
    assert_eq!(ids, vec![2, 1, 3]);
    assert_eq!(dashboard.today, 2);
    assert_eq!(dashboard.upcoming, 1);
    assert_eq!(
        h.server.requests()[0].query.as_deref(),
        Some("doctorId=5")
    );
}
