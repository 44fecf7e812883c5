use anyhow::{Context, Result};
use axum::{
    Router, middleware,
    routing::{get, post},
};

use edoctor_core::EDoctor;

mod dto;
mod error;
mod handlers;
mod html;
mod markdown;
mod security;
mod svg;

#[cfg(test)]
mod tests;

#[derive(Clone)]
pub(crate) struct WebState {
    pub(crate) app: EDoctor,
}

impl WebState {
    fn new(app: EDoctor) -> Self {
        Self { app }
    }
}

/// Start the web server and block until Ctrl-C.
///
/// # Errors
/// Returns an error when the runtime cannot be created, the socket cannot be
/// bound, or the server exits with a runtime failure.
pub fn serve_web(app: EDoctor, host: &str, port: u16) -> Result<()> {
    let state = WebState::new(app);
    let bind_addr = format!("{host}:{port}");
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build web runtime")?;

    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(&bind_addr)
            .await
            .with_context(|| format!("failed to bind web server at {bind_addr}"))?;
        tracing::info!(addr = %listener.local_addr()?, "e-doctor listening");

        axum::serve(listener, app_router(state))
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await
            .context("web server failed")
    })
}

pub(crate) fn app_router(state: WebState) -> Router {
    Router::new()
        .route("/", get(handlers::maternal_page))
        .route(
            "/maternal",
            get(handlers::maternal_page).post(handlers::submit_maternal),
        )
        .route(
            "/fetal",
            get(handlers::fetal_page).post(handlers::submit_fetal),
        )
        .route("/dashboard", get(handlers::dashboard_page))
        .route("/assets/index.css", get(handlers::index_css))
        .route("/api/predict/maternal", post(handlers::api_predict_maternal))
        .route("/api/predict/fetal", post(handlers::api_predict_fetal))
        .route("/api/dashboard", get(handlers::api_dashboard))
        .layer(middleware::from_fn(security::security_headers_middleware))
        .with_state(state)
}
