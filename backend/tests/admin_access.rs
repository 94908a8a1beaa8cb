//! End-to-end coverage of registration uniqueness and the admin
//! authentication/authorisation gates on mutating endpoints.

mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::Value;

use backend::test_support::{feedback_body, login_body, memory_state, register_body};
use support::api_app;

#[actix_web::test]
async fn registering_the_same_email_twice_keeps_one_user() {
    let state = memory_state();
    let app = test::init_service(api_app(state.clone())).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/users/register")
            .set_json(register_body("alice@example.com", "Alice", "pw"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    // Same address, different case: still one stored user.
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/users/register")
            .set_json(register_body("Alice@Example.COM", "Alice", "pw"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let value: Value = test::read_body_json(res).await;
    assert_eq!(value["code"], "conflict");

    let email = backend::domain::EmailAddress::new("alice@example.com").expect("valid email");
    let found = state
        .users
        .find_by_email(&email)
        .await
        .expect("lookup succeeds");
    assert!(found.is_some());
}

#[actix_web::test]
async fn mutations_without_a_session_are_unauthorised() {
    let app = test::init_service(api_app(memory_state())).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/feedback")
            .set_json(feedback_body("u-1", "Alice", 4, "hello", None))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let value: Value = test::read_body_json(res).await;
    let id = value["feedbackId"].as_str().expect("feedback id").to_owned();

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/feedback/{id}"))
            .set_json(serde_json::json!({ "status": "reviewed" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/feedback/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // The entry is untouched.
    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/feedback").to_request(),
    )
    .await;
    let entries: Vec<Value> = test::read_body_json(res).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["status"], "open");
}

#[actix_web::test]
async fn logout_invalidates_the_session() {
    let app = test::init_service(api_app(memory_state())).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/admin/setup")
            .set_json(register_body("admin@example.com", "Admin", "secret"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/admin/login")
            .set_json(login_body("admin@example.com", "secret"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res
        .response()
        .cookies()
        .find(|c| c.name() == "admin_session")
        .expect("session cookie")
        .into_owned();

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/admin/logout")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    // Purging replaces the cookie with an expired one.
    let cleared = res
        .response()
        .cookies()
        .find(|c| c.name() == "admin_session")
        .expect("removal cookie");
    assert!(cleared.value().is_empty());

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/api/feedback/whatever")
            .cookie(cleared.into_owned())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn session_cookie_is_http_only_and_lax() {
    let app = test::init_service(api_app(memory_state())).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/admin/setup")
            .set_json(register_body("admin@example.com", "Admin", "secret"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/admin/login")
            .set_json(login_body("admin@example.com", "secret"))
            .to_request(),
    )
    .await;
    let cookie = res
        .response()
        .cookies()
        .find(|c| c.name() == "admin_session")
        .expect("session cookie")
        .into_owned();
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(
        cookie.same_site(),
        Some(actix_web::cookie::SameSite::Lax)
    );
    // The payload is a signed blob, not the bare user id.
    let login_value: Value = test::read_body_json(res).await;
    let user_id = login_value["userId"].as_str().expect("user id");
    assert_ne!(cookie.value(), user_id);
}

#[actix_web::test]
async fn tampered_session_cookie_is_rejected() {
    let app = test::init_service(api_app(memory_state())).await;

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/api/feedback/some-id")
            .cookie(actix_web::cookie::Cookie::new("admin_session", "forged-admin-id"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
