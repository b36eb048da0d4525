use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::assembler::FlightSearchResponse;
use crate::client::{ApiError, FlightSearchService};
use crate::processor::ProcessingError;
use crate::search_request::{FlightSearchRequest, ValidationError};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<dyn FlightSearchService>,
}

impl AppState {
    pub fn new(service: impl FlightSearchService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/flight/search", post(search_flights))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn search_flights(
    State(state): State<AppState>,
    payload: Result<Json<FlightSearchRequest>, JsonRejection>,
) -> Result<Json<FlightSearchResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    request.validate()?;

    info!(
        origin = %request.origin,
        destination = %request.destination,
        trip_type = ?request.trip_type,
        "flight search"
    );
    let response = state.service.search(request).await?;
    Ok(Json(response))
}

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    BadGateway(String),
    GatewayTimeout(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadGateway(msg) => {
                warn!("Upstream failure: {}", msg);
                (StatusCode::BAD_GATEWAY, msg)
            }
            AppError::GatewayTimeout(msg) => (StatusCode::GATEWAY_TIMEOUT, msg),
            AppError::Internal(msg) => {
                error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Processing(ProcessingError::NoFlightsFound(msg)) => AppError::NotFound(msg),
            ApiError::Processing(ProcessingError::SupplierError { message, .. }) => {
                AppError::BadGateway(message)
            }
            ApiError::Processing(ProcessingError::JsonParseError(_)) | ApiError::InvalidResponse(_) => {
                AppError::BadGateway("invalid response from flight supplier".to_string())
            }
            ApiError::Processing(ProcessingError::IoError(e)) => AppError::Internal(e.to_string()),
            ApiError::Authentication(msg) => {
                warn!("Supplier authentication failed: {}", msg);
                AppError::BadGateway("failed to authenticate with flight supplier".to_string())
            }
            ApiError::Timeout(ms) => AppError::GatewayTimeout(format!(
                "flight supplier did not respond within {}ms",
                ms
            )),
            other @ (ApiError::NetworkError(_) | ApiError::ApiResponseError { .. }) => {
                AppError::BadGateway(other.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::FlightSearchProcessor;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use test_case::test_case;
    use tower::ServiceExt;

    type Outcome = Box<dyn Fn() -> Result<FlightSearchResponse, ApiError> + Send + Sync>;

    struct StubService {
        outcome: Outcome,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl FlightSearchService for StubService {
        async fn search(
            &self,
            _request: FlightSearchRequest,
        ) -> Result<FlightSearchResponse, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.outcome)()
        }
    }

    fn router(outcome: Outcome) -> (Router, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let service = StubService {
            outcome,
            calls: calls.clone(),
        };
        (app(AppState::new(service)), calls)
    }

    fn sample_outcome() -> Outcome {
        Box::new(|| {
            let processor = FlightSearchProcessor::new();
            let json = processor.load_sample_response()?;
            Ok(processor.process(&json)?)
        })
    }

    fn search_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/flight/search")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    const ROUND_TRIP: &str = r#"{
        "trip_type": "round_trip",
        "origin": "ADD",
        "destination": "NBO",
        "departure_date": "2025-03-16",
        "return_date": "2025-03-20",
        "passengers": [{ "type": "ADT", "count": 1 }]
    }"#;

    #[tokio::test]
    async fn test_health() {
        let (router, _) = router(sample_outcome());
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn test_search_returns_sorted_flights() {
        let (router, calls) = router(sample_outcome());
        let (status, body) = send(router, search_request(ROUND_TRIP)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_flights"], 3);
        assert_eq!(body["flights"][0]["total_price"], "50.00 USD");
        assert_eq!(body["flights"][2]["total_price"], "100.00 USD");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_validation_failure_skips_supplier() {
        let (router, calls) = router(sample_outcome());
        let body = r#"{
            "trip_type": "round_trip",
            "origin": "ADD",
            "destination": "NBO",
            "departure_date": "2025-03-16",
            "passengers": [{ "type": "ADT", "count": 1 }]
        }"#;
        let (status, body) = send(router, search_request(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "return_date is required for round_trip");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let (router, calls) = router(sample_outcome());
        let (status, body) = send(router, search_request("{\"trip_type\": 7}")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    fn no_flights() -> Outcome {
        Box::new(|| {
            Err(ApiError::Processing(ProcessingError::NoFlightsFound(
                "no flights available for the specified route and dates".to_string(),
            )))
        })
    }

    fn supplier_failure() -> Outcome {
        Box::new(|| {
            Err(ApiError::Processing(ProcessingError::SupplierError {
                code: "ERR.2SG".to_string(),
                message: "an error occurred while searching for flights; please try again later"
                    .to_string(),
            }))
        })
    }

    fn timeout() -> Outcome {
        Box::new(|| Err(ApiError::Timeout(30_000)))
    }

    fn bad_token() -> Outcome {
        Box::new(|| Err(ApiError::Authentication("401 - invalid_client".to_string())))
    }

    #[test_case(no_flights(), StatusCode::NOT_FOUND; "#1 no flights")]
    #[test_case(supplier_failure(), StatusCode::BAD_GATEWAY; "#2 supplier error")]
    #[test_case(timeout(), StatusCode::GATEWAY_TIMEOUT; "#3 timeout")]
    #[test_case(bad_token(), StatusCode::BAD_GATEWAY; "#4 authentication")]
    #[tokio::test]
    async fn test_service_errors_map_to_status(outcome: Outcome, expected: StatusCode) {
        let (router, _) = router(outcome);
        let (status, body) = send(router, search_request(ROUND_TRIP)).await;

        assert_eq!(status, expected);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_supplier_message_reaches_caller() {
        let (router, _) = router(no_flights());
        let (_, body) = send(router, search_request(ROUND_TRIP)).await;
        assert_eq!(
            body["error"],
            "no flights available for the specified route and dates"
        );
    }
}
