//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method validation,
//! route matching, response decoration and access logging.

use crate::config::{AppState, HttpConfig};
use crate::handler::fortune;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, HeaderValue};
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let access_log = state.access_log;

    let ctx = RequestContext {
        method: req.method(),
        path: req.uri().path(),
        query: req.uri().query(),
        is_head: *req.method() == Method::HEAD,
    };

    logger::log_headers_count(req.headers().len(), state.config.logging.show_headers);

    let mut response = check_http_method(ctx.method, state.config.http.enable_cors)
        .or_else(|| check_body_size(req.headers(), state.config.http.max_body_size))
        .unwrap_or_else(|| route_request(&ctx, &state));
    decorate_response(&mut response, &state.config.http);

    if access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            ctx.method.to_string(),
            ctx.path.to_string(),
        );
        entry.query = ctx.query.map(ToString::to_string);
        entry.http_version = http_version_label(req.version()).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.referer = header_string(req.headers(), "referer");
        entry.user_agent = header_string(req.headers(), "user-agent");
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = headers.get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Route request based on path
pub fn route_request(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let path = normalize_path(ctx.path);

    // Health check endpoints first
    let health = &state.config.health;
    if health.enabled && (path == health.liveness_path || path == health.readiness_path) {
        return http::build_text_response(StatusCode::OK, "ok", ctx.is_head);
    }

    match path {
        "/" => http::build_text_response(StatusCode::OK, "Hello, ZAP scanner!", ctx.is_head),
        "/login" => {
            http::build_text_response(StatusCode::OK, "Login page placeholder", ctx.is_head)
        }
        "/admin" => http::build_text_response(StatusCode::FORBIDDEN, "Forbidden area", ctx.is_head),
        "/fortune" => fortune::serve_fortune(ctx, state),
        _ => http::build_404_response(ctx.method.as_str(), ctx.path, ctx.is_head),
    }
}

/// Strip a single trailing slash so `/login/` routes like `/login`
fn normalize_path(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}

/// Add headers every response carries
fn decorate_response(response: &mut Response<Full<Bytes>>, http_config: &HttpConfig) {
    let headers = response.headers_mut();
    match HeaderValue::from_str(&http_config.server_name) {
        Ok(value) => {
            headers.insert("Server", value);
        }
        Err(e) => logger::log_warning(&format!(
            "Invalid server name '{}': {e}",
            http_config.server_name
        )),
    }
    if http_config.enable_cors {
        headers.insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
    }
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn http_version_label(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;

    fn test_state(configure: impl FnOnce(&mut Config)) -> Arc<AppState> {
        let mut cfg = Config::load_from("does/not/exist/config").unwrap();
        cfg.logging.access_log = false;
        configure(&mut cfg);
        Arc::new(AppState::new(&cfg))
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    fn request(method: Method, uri: &str) -> Request<()> {
        Request::builder().method(method).uri(uri).body(()).unwrap()
    }

    async fn send(state: &Arc<AppState>, req: Request<()>) -> (StatusCode, HeaderMap, String) {
        let resp = handle_request(req, Arc::clone(state), peer()).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    async fn get(state: &Arc<AppState>, uri: &str) -> (StatusCode, String) {
        let (status, _, body) = send(state, request(Method::GET, uri)).await;
        (status, body)
    }

    #[tokio::test]
    async fn test_static_routes() {
        let state = test_state(|_| {});
        assert_eq!(get(&state, "/").await, (StatusCode::OK, "Hello, ZAP scanner!".to_string()));
        assert_eq!(
            get(&state, "/login").await,
            (StatusCode::OK, "Login page placeholder".to_string())
        );
        assert_eq!(
            get(&state, "/admin").await,
            (StatusCode::FORBIDDEN, "Forbidden area".to_string())
        );
        assert_eq!(
            get(&state, "/login/").await,
            (StatusCode::OK, "Login page placeholder".to_string())
        );
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let state = test_state(|_| {});
        assert_eq!(
            get(&state, "/nowhere").await,
            (StatusCode::NOT_FOUND, "Cannot GET /nowhere".to_string())
        );
    }

    #[tokio::test]
    async fn test_head_has_no_body() {
        let state = test_state(|_| {});
        let (status, headers, body) = send(&state, request(Method::HEAD, "/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["Content-Length"], "19");
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_method_checks() {
        let state = test_state(|_| {});
        let (status, headers, _) = send(&state, request(Method::POST, "/")).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(headers["Allow"], "GET, HEAD, OPTIONS");

        let (status, _, _) = send(&state, request(Method::OPTIONS, "/")).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_body_too_large() {
        let state = test_state(|cfg| cfg.http.max_body_size = 10);
        let req = Request::builder()
            .uri("/")
            .header("content-length", "11")
            .body(())
            .unwrap();
        let (status, _, _) = send(&state, req).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_server_and_cors_headers() {
        let state = test_state(|cfg| {
            cfg.http.server_name = "Oracle/1.0".to_string();
            cfg.http.enable_cors = true;
        });
        let (_, headers, _) = send(&state, request(Method::GET, "/admin")).await;
        assert_eq!(headers["Server"], "Oracle/1.0");
        assert_eq!(headers["Access-Control-Allow-Origin"], "*");
    }

    #[tokio::test]
    async fn test_health_routes() {
        let state = test_state(|_| {});
        assert_eq!(get(&state, "/healthz").await, (StatusCode::OK, "ok".to_string()));
        assert_eq!(get(&state, "/readyz").await, (StatusCode::OK, "ok".to_string()));

        let state = test_state(|cfg| cfg.health.enabled = false);
        assert_eq!(get(&state, "/healthz").await.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_fortune_paid_and_unpaid() {
        let state = test_state(|_| {});

        let (status, body) = get(&state, "/fortune?money=5").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"<li class="oracle__answer">Answer 1: <em>42</em></li>"#));

        let (status, body) = get(&state, "/fortune").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"<li class="oracle__answer">Answer 2: <em></em></li>"#));

        let (_, body) = get(&state, "/fortune?money=4.999").await;
        assert!(body.contains("<em></em>"));
    }

    #[tokio::test]
    async fn test_fortune_encoded_query() {
        let state = test_state(|_| {});
        let (status, body) = get(&state, "/fortune?m%6Fney=%35").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<em>42</em>"));
    }

    #[tokio::test]
    async fn test_fortune_bad_money() {
        let state = test_state(|_| {});
        let (status, _) = get(&state, "/fortune?money=plenty").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_fortune_without_oracle() {
        let state = test_state(|cfg| cfg.oracle.enabled = false);

        let (status, body) = get(&state, "/fortune?money=0").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<em></em>"));

        let (status, body) = get(&state, "/fortune?money=5").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("No oracle available to answer"));
    }
}
