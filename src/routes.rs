// src/routes.rs

use std::path::PathBuf;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, post, put},
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::{
    handlers::{auth, quiz, session, submission},
    state::AppState,
    utils::jwt::{require_admin, require_admin_page},
};

/// Quiz images travel inline as base64, so bodies may be large.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Assembles the main application router.
///
/// * Public student API, admin API behind the cookie gate.
/// * HTML pages, two of them admin only.
/// * Global middleware (Trace, CORS, body limit).
/// Browser origins of the pages this server itself serves.
fn allowed_origins(port: u16) -> Vec<HeaderValue> {
    ["localhost", "127.0.0.1"]
        .iter()
        .filter_map(|host| HeaderValue::from_str(&format!("http://{host}:{port}")).ok())
        .collect()
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins(state.config.port))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    let student_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/quiz-questions", get(quiz::quiz_questions))
        .route("/check-answer", post(quiz::check_answer))
        .route("/submit-quiz", post(submission::submit_quiz))
        .route("/check-absen", post(submission::check_absen))
        .route("/last-submission", get(submission::last_submission))
        .route("/session/start", post(session::start_session))
        .route("/session/block", post(session::block_session))
        .route("/session/status", get(session::session_status));

    let admin_routes = Router::new()
        .route("/quizzes", get(quiz::list_quizzes).post(quiz::create_quiz))
        .route("/quizzes/{id}", put(quiz::update_quiz).delete(quiz::delete_quiz))
        .route("/submissions", get(submission::list_submissions))
        .route(
            "/submissions/{absen}/{kelas}",
            delete(submission::delete_submission),
        )
        .route("/sessions", get(session::list_sessions))
        .route("/session/unblock", post(session::unblock_session))
        .layer(middleware::from_fn_with_state(state.clone(), require_admin));

    let public_dir = PathBuf::from(&state.config.public_dir);

    let public_pages = Router::new()
        .route_service("/", ServeFile::new(public_dir.join("quiz.html")))
        .route_service("/login", ServeFile::new(public_dir.join("login.html")))
        .route_service("/statistik", ServeFile::new(public_dir.join("statistik.html")));

    let admin_pages = Router::new()
        .route_service("/dashboard", ServeFile::new(public_dir.join("dashboard.html")))
        .route_service("/monitor", ServeFile::new(public_dir.join("monitor.html")))
        .layer(middleware::from_fn_with_state(state.clone(), require_admin_page));

    Router::new()
        .nest("/api", student_routes.merge(admin_routes))
        .merge(public_pages)
        .merge(admin_pages)
        .fallback_service(ServeDir::new(public_dir))
        // Global Middleware (applied from outside in)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
