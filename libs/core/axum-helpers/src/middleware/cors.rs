use tower_http::cors::CorsLayer;

/// Creates the wide-open CORS layer the public account routes use.
///
/// Answers `Access-Control-Allow-Origin: *` on every response and
/// short-circuits `OPTIONS` preflights with an empty body before they reach
/// any handler.
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}
