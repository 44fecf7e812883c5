use axum::{
    Form, Json,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};

use edoctor_core::charts::Dashboard;
use edoctor_core::features::{RawForm, form_from_json};
use edoctor_core::{EDoctorError, Prediction};

use crate::WebState;
use crate::dto::PredictionResponse;
use crate::error::{api_error_response, blocking_task_failed, log_flow_error, status_for_error};
use crate::html::{FormFlow, FormOutcome, INDEX_CSS, render_dashboard_page, render_prediction_page};

pub async fn index_css() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        INDEX_CSS,
    )
        .into_response()
}

pub async fn maternal_page() -> Html<String> {
    Html(render_prediction_page(
        FormFlow::Maternal,
        &RawForm::new(),
        &FormOutcome::Empty,
    ))
}

pub async fn fetal_page() -> Html<String> {
    Html(render_prediction_page(
        FormFlow::Fetal,
        &RawForm::new(),
        &FormOutcome::Empty,
    ))
}

pub async fn submit_maternal(State(state): State<WebState>, Form(form): Form<RawForm>) -> Response {
    let outcome = state.app.predict_maternal(&form);
    prediction_view(FormFlow::Maternal, &form, outcome, "predict.maternal")
}

pub async fn submit_fetal(State(state): State<WebState>, Form(form): Form<RawForm>) -> Response {
    let outcome = state.app.predict_fetal(&form);
    prediction_view(FormFlow::Fetal, &form, outcome, "predict.fetal")
}

fn prediction_view<T>(
    flow: FormFlow,
    form: &RawForm,
    outcome: Result<Prediction<T>, EDoctorError>,
    operation: &str,
) -> Response {
    match outcome {
        Ok(prediction) => {
            tracing::info!(operation, label = %prediction.label, "prediction served");
            let page = render_prediction_page(
                flow,
                form,
                &FormOutcome::Predicted {
                    label: &prediction.label,
                    severity: prediction.severity,
                },
            );
            (StatusCode::OK, Html(page)).into_response()
        }
        Err(err) => {
            log_flow_error(&err, operation);
            let page = render_prediction_page(flow, form, &FormOutcome::Failed(&err));
            (status_for_error(&err), Html(page)).into_response()
        }
    }
}

pub async fn dashboard_page(State(state): State<WebState>) -> Response {
    match load_dashboard(&state).await {
        Ok(dashboard) => {
            (StatusCode::OK, Html(render_dashboard_page(Ok(&dashboard)))).into_response()
        }
        Err(err) => {
            log_flow_error(&err, "dashboard.view");
            (
                status_for_error(&err),
                Html(render_dashboard_page(Err(&err))),
            )
                .into_response()
        }
    }
}

pub async fn api_predict_maternal(
    State(state): State<WebState>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Response {
    match read_prediction_body(body).and_then(|form| state.app.predict_maternal(&form)) {
        Ok(prediction) => (
            StatusCode::OK,
            Json(PredictionResponse {
                flow: "maternal",
                prediction,
            }),
        )
            .into_response(),
        Err(err) => api_error_response(err, "predict.maternal"),
    }
}

pub async fn api_predict_fetal(
    State(state): State<WebState>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Response {
    match read_prediction_body(body).and_then(|form| state.app.predict_fetal(&form)) {
        Ok(prediction) => (
            StatusCode::OK,
            Json(PredictionResponse {
                flow: "fetal",
                prediction,
            }),
        )
            .into_response(),
        Err(err) => api_error_response(err, "predict.fetal"),
    }
}

/// Malformed or mistyped bodies become validation payloads, not axum's plain-text rejection.
fn read_prediction_body(
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<RawForm, EDoctorError> {
    let Json(value) =
        body.map_err(|rejection| EDoctorError::validation("body", rejection.body_text()))?;
    form_from_json(&value)
}

pub async fn api_dashboard(State(state): State<WebState>) -> Response {
    match load_dashboard(&state).await {
        Ok(dashboard) => (StatusCode::OK, Json(dashboard)).into_response(),
        Err(err) => api_error_response(err, "dashboard.load"),
    }
}

/// The dataset fetch is blocking I/O, so it runs off the async workers.
async fn load_dashboard(state: &WebState) -> Result<Dashboard, EDoctorError> {
    let app = state.app.clone();
    tokio::task::spawn_blocking(move || app.load_dashboard())
        .await
        .map_err(|err| blocking_task_failed(&err))?
}
