//! HTTP request/response tracing middleware.

use axum::http::Request;
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, MakeSpan, TraceLayer};
use tracing::{Level, Span, field};

/// Span field holding the short identifier a redirect resolved.
pub const SHORT_ID_FIELD: &str = "short_id";

/// Span field holding the authenticated username.
pub const USER_FIELD: &str = "user";

/// Builds the per-request `http` span.
///
/// `short_id` and `user` start empty; the redirect handler and the auth
/// middleware fill them in through [`record_short_id`] and [`record_user`].
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        tracing::info_span!(
            "http",
            method = %request.method(),
            path = %request.uri().path(),
            short_id = field::Empty,
            user = field::Empty,
        )
    }
}

/// Records the resolved short identifier on the current request span.
pub fn record_short_id(id: &str) {
    Span::current().record(SHORT_ID_FIELD, id);
}

/// Records the authenticated username on the current request span.
pub fn record_user(username: &str) {
    Span::current().record(USER_FIELD, username);
}

/// Creates a tracing middleware for HTTP requests.
///
/// Each request runs inside an `http` span carrying the method and path.
/// Start and completion are logged at `INFO`, latency in milliseconds.
///
/// # Example Logs
///
/// ```text
/// INFO http{method=GET path=/k3Xa9QzT1b short_id=k3Xa9QzT1b}: started processing request
/// INFO http{method=GET path=/k3Xa9QzT1b short_id=k3Xa9QzT1b}: finished processing request latency=2 ms status=302
/// INFO http{method=GET path=/api/v1/urls user=alice}: finished processing request latency=4 ms status=200
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RequestSpan> {
    TraceLayer::new_for_http()
        .make_span_with(RequestSpan)
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}
