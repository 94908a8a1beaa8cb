//! Server-delivered HTML pages.
//!
//! The public submission form and the admin dashboard are small static pages
//! embedded at compile time; they hold local UI state only and drive the
//! JSON API. The submission page registers the user first and tolerates
//! failure with a client-generated fallback id; the dashboard re-fetches the
//! filtered list after every mutation.

use actix_web::{HttpResponse, get, http::header::ContentType};

fn html_page(body: &'static str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}

/// Landing page linking the submission form and the dashboard.
#[get("/")]
pub async fn home() -> HttpResponse {
    html_page(include_str!("../../../static/home.html"))
}

/// Public feedback submission form.
#[get("/feedback/submit")]
pub async fn submit_form() -> HttpResponse {
    html_page(include_str!("../../../static/submit.html"))
}

/// Admin dashboard with login gate.
#[get("/admin")]
pub async fn admin_dashboard() -> HttpResponse {
    html_page(include_str!("../../../static/admin.html"))
}

/// First-run admin bootstrap form.
#[get("/admin/setup")]
pub async fn admin_setup_form() -> HttpResponse {
    html_page(include_str!("../../../static/admin_setup.html"))
}
