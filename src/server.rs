use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Form, FromRequest, Path, Query, Request, State},
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    response::{
        Html, IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::get,
};
use chrono::Utc;
use futures::{Stream, StreamExt, future, stream};
use serde::{Deserialize, de::DeserializeOwned};
use tokio_stream::wrappers::BroadcastStream;
use tokio_util::sync::CancellationToken;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::AppState;
use crate::config::AppConfig;
use crate::course::Message;
use crate::error::Error;
use crate::resilience::{rate_limit_middleware, timeout_middleware};
use crate::session::{SendRejected, Session, SessionEvent, SessionSnapshot};
use crate::theme::{OsSignal, ThemePreference, ThemeState, ThemeTracker};
use crate::ui;
use crate::ui::legal::{LegalDocument, PRIVACY_POLICY, TERMS_OF_SERVICE};

/// How often idle sessions are swept.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// SSE keep-alive interval.
const KEEP_ALIVE: Duration = Duration::from_secs(15);

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: AppConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(config)?;
    let config = Arc::clone(&state.config);

    info!(
        name: "theme.store.loaded",
        store = config.theme.store_path.as_deref().unwrap_or("memory"),
        preference = %state.theme.current(),
        "Theme preference loaded"
    );

    // Background tasks stop when the server shuts down
    let shutdown = CancellationToken::new();
    let reload = state
        .theme
        .spawn_reload(config.theme.reload_interval(), shutdown.clone());
    let sweeper = state.sessions.spawn_sweeper(
        config.chat.session_idle_timeout(),
        SWEEP_INTERVAL,
        shutdown.clone(),
    );

    let app = router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    let signal = shutdown.clone();
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!(name: "server.stopping", "Shutdown signal received");
            signal.cancel();
        })
        .await?;

    shutdown.cancel();
    let (reload, sweeper) = tokio::join!(reload, sweeper);
    for (task, result) in [("theme.reload", reload), ("session.sweeper", sweeper)] {
        if let Err(e) = result {
            error!(name: "server.task_failed", task, error = %e, "Background task failed");
        }
    }
    Ok(())
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let static_dir = state.config.server.static_dir.clone();

    Router::new()
        // HTML pages
        .route("/", get(editor_handler))
        .route("/dashboard", get(dashboard_handler))
        .route("/privacy", get(privacy_handler))
        .route("/terms", get(terms_handler))
        // Session API
        .route(
            "/api/sessions/{id}",
            get(api_get_session).delete(api_delete_session),
        )
        .route(
            "/api/sessions/{id}/messages",
            axum::routing::post(api_send_message),
        )
        .route("/api/sessions/{id}/events", get(api_session_events))
        // Theme API
        .route("/api/theme", get(api_get_theme).put(api_set_theme))
        .route("/api/theme/events", get(api_theme_events))
        // Static assets
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found_handler)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            timeout_middleware,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Extractors
// ─────────────────────────────────────────────────────────────────────────────

/// Body accepted as JSON or as a URL-encoded form (what HTMX posts).
#[derive(Debug)]
pub struct FormOrJson<T>(pub T);

impl<T, S> FromRequest<S> for FormOrJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        if is_json {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(value))
        } else {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(value))
        }
    }
}

/// Theme query for requests that report the OS colour scheme explicitly.
#[derive(Debug, Default, Deserialize)]
struct OsQuery {
    os: Option<OsSignal>,
}

impl OsQuery {
    fn signal(&self, headers: &HeaderMap) -> OsSignal {
        self.os.unwrap_or_else(|| OsSignal::from_headers(headers))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HTML Page Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Ask browsers to send the colour-scheme client hint on later requests.
const ACCEPT_CH: [(&str, &str); 2] = [
    ("accept-ch", "Sec-CH-Prefers-Color-Scheme"),
    ("vary", "Sec-CH-Prefers-Color-Scheme"),
];

fn theme_for(state: &AppState, headers: &HeaderMap) -> ThemeState {
    ThemeState::resolve(state.theme.current(), OsSignal::from_headers(headers))
}

/// GET / - open a new seeded editor session.
async fn editor_handler(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let session = state.sessions.create_seeded();
    info!(name: "chat.session.created", session_id = %session.id(), "Editor session created");

    let theme = theme_for(&state, &headers);
    (ACCEPT_CH, Html(ui::editor::editor_page(&session.snapshot(), &theme)))
}

async fn dashboard_handler(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let theme = theme_for(&state, &headers);
    (ACCEPT_CH, Html(ui::dashboard::dashboard_page(&theme)))
}

async fn privacy_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    legal(&state, &headers, &PRIVACY_POLICY)
}

async fn terms_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    legal(&state, &headers, &TERMS_OF_SERVICE)
}

fn legal(state: &AppState, headers: &HeaderMap, doc: &LegalDocument) -> Response {
    let theme = theme_for(state, headers);
    let today = Utc::now().date_naive();
    (ACCEPT_CH, Html(ui::legal::legal_page(doc, &theme, today))).into_response()
}

async fn not_found_handler(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let theme = theme_for(&state, &headers);
    (StatusCode::NOT_FOUND, Html(ui::shell::not_found_page(&theme)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Session API Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Request body for sending a message.
#[derive(Debug, Deserialize)]
struct SendRequest {
    #[serde(default)]
    message: String,
}

impl IntoResponse for SendRejected {
    fn into_response(self) -> Response {
        let status = match self {
            SendRejected::Empty => StatusCode::UNPROCESSABLE_ENTITY,
            SendRejected::InFlight => StatusCode::CONFLICT,
        };
        (status, self.to_string()).into_response()
    }
}

fn find_session(state: &AppState, id: &str) -> Result<Session, Error> {
    state
        .sessions
        .get(id)
        .ok_or_else(|| Error::SessionNotFound(id.to_string()))
}

/// POST /api/sessions/{id}/messages - submit author input.
async fn api_send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    FormOrJson(req): FormOrJson<SendRequest>,
) -> Result<(StatusCode, Json<Message>), Response> {
    let session = find_session(&state, &id).map_err(IntoResponse::into_response)?;
    let message = session.send(&req.message).map_err(|rejected| {
        tracing::debug!(
            name: "chat.message.rejected",
            session_id = %id,
            reason = %rejected,
            "User message ignored"
        );
        rejected.into_response()
    })?;
    Ok((StatusCode::ACCEPTED, Json(message)))
}

/// GET /api/sessions/{id} - current session state.
async fn api_get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, Error> {
    Ok(Json(find_session(&state, &id)?.snapshot()))
}

/// DELETE /api/sessions/{id} - close a session, cancelling any pending reply.
async fn api_delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, Error> {
    state
        .sessions
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(Error::SessionNotFound(id))
}

/// GET /api/sessions/{id}/events - live HTML fragments for the editor page.
async fn api_session_events(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>> + Send>, Error> {
    let session = find_session(&state, &id)?;
    let rx = session.subscribe();
    let closed = session.closed();

    let stream = BroadcastStream::new(rx)
        .filter_map(|res| future::ready(res.ok()))
        .flat_map(move |event| stream::iter(session_fragments(&session, &event)))
        .take_until(closed)
        .map(Ok);

    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(KEEP_ALIVE)))
}

/// Fragments to re-render for a session event, as SSE events named after
/// the `sse-swap` targets on the page.
fn session_fragments(session: &Session, event: &SessionEvent) -> Vec<Event> {
    let messages = || {
        Event::default()
            .event("messages")
            .data(ui::chat::message_list(&session.messages(), session.is_loading()))
    };
    match event {
        SessionEvent::MessageAppended { .. } => vec![messages()],
        SessionEvent::LoadingChanged { loading } => vec![
            messages(),
            Event::default()
                .event("composer")
                .data(ui::chat::composer(session.id(), *loading)),
        ],
        SessionEvent::CourseReplaced { course } => vec![
            Event::default()
                .event("outline")
                .data(ui::outline::outline(course)),
        ],
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Theme API Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Request body for updating the theme preference.
#[derive(Debug, Deserialize)]
struct ThemeUpdate {
    preference: String,
}

/// GET /api/theme - stored preference resolved for the caller.
async fn api_get_theme(
    State(state): State<AppState>,
    Query(query): Query<OsQuery>,
    headers: HeaderMap,
) -> Json<ThemeState> {
    Json(ThemeState::resolve(
        state.theme.current(),
        query.signal(&headers),
    ))
}

/// PUT /api/theme - persist a new preference.
async fn api_set_theme(
    State(state): State<AppState>,
    Query(query): Query<OsQuery>,
    headers: HeaderMap,
    FormOrJson(update): FormOrJson<ThemeUpdate>,
) -> Result<Json<ThemeState>, Error> {
    let preference: ThemePreference = update.preference.parse()?;
    state.theme.set(preference)?;
    Ok(Json(ThemeState::resolve(preference, query.signal(&headers))))
}

/// GET /api/theme/events - resolved theme now and after every change.
async fn api_theme_events(
    State(state): State<AppState>,
    Query(query): Query<OsQuery>,
    headers: HeaderMap,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send> {
    let tracker = ThemeTracker::with_fixed_os(state.theme.subscribe(), query.signal(&headers));
    let initial = tracker.state();

    let updates = stream::unfold(tracker, |mut tracker| async move {
        tracker.changed().await.map(|next| (next, tracker))
    });
    let stream = stream::once(future::ready(initial))
        .chain(updates)
        .map(|theme| {
            let json = serde_json::to_string(&theme).unwrap_or_else(|_| "{}".to_string());
            Ok(Event::default().event("theme").data(json))
        });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(KEEP_ALIVE))
}
