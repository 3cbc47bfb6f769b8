//! HTTP server for the prediction form and JSON API.
//!
//! Routes:
//!
//! - `GET /` renders the form filled with the sample phone
//! - `POST /` re-renders the form, predicting when `predict_button` is present
//! - `POST /api/predict` predicts from a JSON object
//! - `GET /health` reports liveness and artifact availability
//!
//! Predictions read files and run the network, so they are moved off the
//! async runtime with [`tokio::task::spawn_blocking`].

use crate::api::{ErrorResponse, HealthResponse, PredictRequest, PredictResponse};
use crate::config::{PageConfig, ServerConfig};
use crate::error::{ServingError, ServingResult};
use crate::form::{render_page, FormView, PREDICT_BUTTON};
use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::{Form, Json, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use decisiomate_model::{FeatureVector, Prediction, Predictor};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

/// State shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    predictor: Arc<Predictor>,
    page: Arc<PageConfig>,
}

impl AppState {
    /// Create handler state.
    pub fn new(predictor: Arc<Predictor>, page: PageConfig) -> Self {
        Self {
            predictor,
            page: Arc::new(page),
        }
    }

    /// The shared predictor.
    pub fn predictor(&self) -> &Arc<Predictor> {
        &self.predictor
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .route("/api/predict", post(api_predict))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// HTTP status for a failed prediction.
pub fn status_for(err: &ServingError) -> StatusCode {
    if err.is_client_error() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Coerces the fields and runs one prediction on the blocking pool.
///
/// Returns the coerced row alongside the prediction so the form can echo
/// normalized values.
async fn predict_blocking(
    predictor: Arc<Predictor>,
    fields: HashMap<String, String>,
) -> ServingResult<(FeatureVector, Prediction)> {
    let result = tokio::task::spawn_blocking(move || {
        let features = FeatureVector::from_map(&fields).map_err(|e| {
            error!("Error assembling features: {}", e);
            e
        })?;
        predictor.predict(&features).map(|p| (features, p))
    })
    .await??;
    Ok(result)
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_page(&state.page, &FormView::sample()))
}

fn form_error(page: &PageConfig, view: FormView, err: &ServingError) -> Response {
    error!("Form prediction failed: {}", err);
    let view = view.with_error(err.public_message());
    (status_for(err), Html(render_page(page, &view))).into_response()
}

async fn submit(
    State(state): State<AppState>,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Response {
    let fields = match form {
        Ok(Form(fields)) => fields,
        Err(rejection) => {
            let err = ServingError::InvalidRequest(rejection.body_text());
            return form_error(&state.page, FormView::sample(), &err);
        }
    };

    if !fields.contains_key(PREDICT_BUTTON) {
        debug!("Form submitted without {}, re-rendering", PREDICT_BUTTON);
        let view = FormView::with_values(fields);
        return Html(render_page(&state.page, &view)).into_response();
    }

    let view = FormView::with_values(fields.clone());
    match predict_blocking(Arc::clone(&state.predictor), fields).await {
        Ok((features, prediction)) => {
            info!("Form prediction: {}", prediction.decision);
            let view = FormView::with_values(features.to_text_map())
                .with_prediction(prediction.message());
            Html(render_page(&state.page, &view)).into_response()
        }
        Err(err) => form_error(&state.page, view, &err),
    }
}

fn api_error(err: &ServingError) -> Response {
    error!("API prediction failed: {}", err);
    (status_for(err), Json(ErrorResponse::from(err))).into_response()
}

async fn api_predict(
    State(state): State<AppState>,
    request: Result<Json<PredictRequest>, JsonRejection>,
) -> Response {
    let request = match request {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return api_error(&ServingError::InvalidRequest(rejection.body_text()));
        }
    };

    match predict_blocking(Arc::clone(&state.predictor), request.to_text_fields()).await {
        Ok((_, prediction)) => Json(PredictResponse::from(prediction)).into_response(),
        Err(err) => api_error(&err),
    }
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        artifacts_present: state.predictor.paths().exist(),
        artifacts_cached: state.predictor.is_cached(),
    })
}

/// The DecisioMate web server.
///
/// # Example
///
/// ```no_run
/// use decisiomate_serving::{Server, ServerConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let server = Server::new(ServerConfig::default())?;
/// server.run().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Server {
    config: ServerConfig,
    state: AppState,
}

impl Server {
    /// Validates the configuration and creates the server.
    pub fn new(config: ServerConfig) -> ServingResult<Self> {
        config
            .validate()
            .map_err(|e| ServingError::config(e.to_string()))?;

        let predictor = Arc::new(Predictor::new(
            config.artifacts.clone(),
            config.artifact_policy,
        ));
        let state = AppState::new(predictor, config.page.clone());
        Ok(Self { config, state })
    }

    /// Server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The shared predictor.
    pub fn predictor(&self) -> &Arc<Predictor> {
        self.state.predictor()
    }

    /// Router serving this server's state.
    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    /// Binds the configured address and serves until Ctrl-C.
    pub async fn run(self) -> ServingResult<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Received shutdown signal");
        })
        .await
    }

    /// Binds the configured address and serves until `shutdown` resolves.
    pub async fn run_until<F>(self, shutdown: F) -> ServingResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ServingError::server(format!("Failed to bind {}: {}", addr, e)))?;
        self.serve(listener, shutdown).await
    }

    /// Serves on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> ServingResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local = listener.local_addr()?;
        info!("DecisioMate listening on http://{}", local);
        info!(
            "Artifacts: weights={:?} scaler={:?} policy={:?}",
            self.config.artifacts.weights, self.config.artifacts.scaler, self.config.artifact_policy
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use decisiomate_model::ModelError;

    #[test]
    fn test_status_for() {
        let err: ServingError = ModelError::invalid_field("ram", "abc", "integer").into();
        assert_eq!(status_for(&err), StatusCode::UNPROCESSABLE_ENTITY);

        let err: ServingError = ModelError::artifact_format("w.json", "bad").into();
        assert_eq!(status_for(&err), StatusCode::INTERNAL_SERVER_ERROR);

        let err = ServingError::TaskFailed("panicked".into());
        assert_eq!(status_for(&err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_server_rejects_invalid_config() {
        let config = ServerConfig::builder().port(0).build();
        let err = Server::new(config).unwrap_err();
        assert!(matches!(err, ServingError::ConfigError(_)));
    }

    #[tokio::test]
    async fn test_serve_stops_on_shutdown() {
        let server = Server::new(ServerConfig::default()).unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        server.serve(listener, async {}).await.unwrap();
    }
}
