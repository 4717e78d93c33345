//! Application serving the countdown timer [`Service`] over HTTP.

#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod args;
pub mod config;
pub mod error;
pub mod page;

use axum::{
    extract::{Form, Query},
    response::{Html, IntoResponse as _, Response},
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use service::{
    command::{Command as _, StartTimer},
    domain::{session, timer},
    query::ResolveTimer,
};
// Used in binary.
use axum_client_ip as _;
use tokio as _;
use tower_http as _;
use tracing_subscriber as _;

pub use self::{
    args::Args,
    config::Config,
    error::{AsError, Error},
    page::Page,
};
use self::{error::SessionError, page::Durations};

/// [`Service`] with filled infrastructure dependencies.
///
/// [`Service`]: service::Service
pub type Service = service::Service<service::infra::Backend>;

/// Creates a new [`Router`] serving the timer page on `/`.
pub fn router(service: Service, page: Page) -> Router {
    Router::new()
        .route("/", get(show_timer).post(start_timer))
        .layer(Extension(service))
        .layer(Extension(page))
}

/// Query parameters of the [`show_timer()`] handler.
#[derive(Debug, Deserialize)]
pub struct ShowTimerParams {
    /// ID of the session to show the timer of.
    ///
    /// A fresh one is generated if missing or empty.
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

/// Renders the timer page of a session.
///
/// # Errors
///
/// - If the provided session ID is invalid.
/// - If the timer cannot be resolved or rendered.
pub async fn show_timer(
    Extension(service): Extension<Service>,
    Extension(page): Extension<Page>,
    Query(params): Query<ShowTimerParams>,
) -> Result<Html<String>, Error> {
    let session = match params.session_id.filter(|id| !id.is_empty()) {
        None => session::Id::random(),
        Some(id) => session::Id::new(id).ok_or(SessionError::Invalid)?,
    };

    let state = service
        .execute(ResolveTimer::now(session.clone()))
        .await
        .map_err(AsError::into_error)?;

    let config = service.config();
    page.render(
        &state,
        &session,
        Durations {
            options: &config.durations,
            selected: config.default_duration,
        },
    )
    .map(Html)
    .map_err(AsError::into_error)
}

/// Form of the [`start_timer()`] handler.
#[derive(Debug, Deserialize)]
pub struct StartTimerForm {
    /// ID of the session to start the timer for.
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,

    /// Requested duration in seconds.
    ///
    /// Leniently parsed, falling back to the default one.
    pub duration: Option<String>,
}

/// Starts a timer and redirects to its page.
///
/// # Errors
///
/// - If the session ID is missing or invalid.
/// - If the timer cannot be stored.
pub async fn start_timer(
    Extension(service): Extension<Service>,
    Form(form): Form<StartTimerForm>,
) -> Result<Response, Error> {
    let session = form
        .session_id
        .filter(|id| !id.is_empty())
        .ok_or(SessionError::Missing)?;
    let session = session::Id::new(session).ok_or(SessionError::Invalid)?;
    let duration = form.duration.as_deref().and_then(timer::Duration::coerce);

    _ = service
        .execute(StartTimer::now(session.clone(), duration))
        .await
        .map_err(AsError::into_error)?;

    Ok((
        http::StatusCode::FOUND,
        [(http::header::LOCATION, format!("/?sessionId={session}"))],
    )
        .into_response())
}

#[cfg(test)]
mod spec {
    use axum::{body::Body, Router};
    use common::operations::Insert;
    use http::{header, Request, StatusCode};
    use service::{
        domain::{session, timer},
        infra::{
            store::{Entry, Key},
            Backend, Memory, Redis, Store as _,
        },
    };
    use tower::ServiceExt as _;

    use super::{router, Page, Service};

    fn app(store: impl Into<Backend>) -> Router {
        router(
            Service::new(service::Config::default(), store.into()),
            Page::new().unwrap(),
        )
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
        let res = app
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    async fn post(app: &Router, form: &str) -> http::Response<Body> {
        app.clone()
            .oneshot(
                Request::post("/")
                    .header(
                        header::CONTENT_TYPE,
                        "application/x-www-form-urlencoded",
                    )
                    .body(Body::from(form.to_owned()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// Extracts the session ID carried by the start form.
    fn form_session(html: &str) -> &str {
        const FIELD: &str = r#"name="sessionId" value=""#;

        let start = html.find(FIELD).unwrap() + FIELD.len();
        let len = html[start..].find('"').unwrap();
        &html[start..start + len]
    }

    #[tokio::test]
    async fn generates_session_when_missing() {
        let app = app(Memory::new());

        for uri in ["/", "/?sessionId="] {
            let (status, html) = get(&app, uri).await;

            assert_eq!(status, StatusCode::OK);
            let id = form_session(&html);
            assert_eq!(id.len(), 32);
            assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[tokio::test]
    async fn keeps_provided_session() {
        let (status, html) = get(&app(Memory::new()), "/?sessionId=abc").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(form_session(&html), "abc");
        assert!(html
            .contains(r#"class="duration selected" data-duration="180""#));
    }

    #[tokio::test]
    async fn rejects_invalid_session() {
        let app = app(Memory::new());

        let (status, body) = get(&app, "/?sessionId=%3Cscript%3E").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("INVALID_SESSION_ID"));

        let res = post(&app, "sessionId=a%20b&duration=60").await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn requires_session_to_start() {
        let app = app(Memory::new());

        for form in ["duration=60", "sessionId=&duration=60"] {
            let res = post(&app, form).await;
            assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn starts_and_shows_countdown() {
        let app = app(Memory::new());

        let res = post(&app, "sessionId=abc&duration=300").await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(
            res.headers().get(header::LOCATION).unwrap(),
            "/?sessionId=abc",
        );

        let (status, html) = get(&app, "/?sessionId=abc").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains(r#"id="countdown""#));
        assert!(html.contains(r#"data-total="300000""#));
        assert!(html.contains(r#"href="/?sessionId=abc""#));

        let (_, other) = get(&app, "/?sessionId=xyz").await;
        assert!(!other.contains(r#"id="countdown""#));
    }

    #[tokio::test]
    async fn coerces_duration() {
        let app = app(Memory::new());

        for (form, total) in [
            ("sessionId=a&duration=abc", 180_000),
            ("sessionId=b", 180_000),
            ("sessionId=c&duration=0", 180_000),
            ("sessionId=d&duration=-5", 180_000),
            ("sessionId=e&duration=59.6", 60_000),
            ("sessionId=f&duration=999999", 86_400_000),
        ] {
            assert_eq!(post(&app, form).await.status(), StatusCode::FOUND);

            let id = form
                .split('&')
                .next()
                .and_then(|field| field.strip_prefix("sessionId="))
                .unwrap();
            let (_, html) = get(&app, &format!("/?sessionId={id}")).await;
            assert!(
                html.contains(&format!(r#"data-total="{total}""#)),
                "`{form}` should start a {total}ms timer",
            );
        }
    }

    #[tokio::test]
    async fn notifies_completion_once() {
        let store = Memory::new();
        let app = app(store.clone());
        store
            .execute(Insert(Entry {
                key: Key::timer(
                    timer::Scope::Session,
                    &session::Id::new("abc").unwrap(),
                ),
                value: r#"{"expiresAt":1000,"duration":60}"#.to_owned(),
            }))
            .await
            .unwrap();

        let (status, html) = get(&app, "/?sessionId=abc").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains(r#"class="notice""#));

        let (status, html) = get(&app, "/?sessionId=abc").await;
        assert_eq!(status, StatusCode::OK);
        assert!(!html.contains(r#"class="notice""#));
        assert_eq!(form_session(&html), "abc");
    }

    #[tokio::test]
    async fn reports_unavailable_store() {
        let redis = Redis::new(&service::infra::redis::Config {
            url: "redis://127.0.0.1:1".to_owned().into(),
            pool_size: 1,
            wait_timeout: std::time::Duration::from_secs(5),
        })
        .unwrap();
        let app = app(redis);

        let (status, body) = get(&app, "/?sessionId=abc").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.contains("STORE_UNAVAILABLE"));

        let res = post(&app, "sessionId=abc&duration=60").await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
