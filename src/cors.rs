//! Cross-origin resource sharing configuration.

use std::str::FromStr;

use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};

use crate::Error;

/// The origins allowed to make cross-origin requests.
#[derive(Debug, Clone, PartialEq)]
pub enum AllowedOrigins {
    /// Any origin, configured with "*". Credentials are not allowed.
    Any,
    /// Exactly these origins, with credentials allowed.
    List(Vec<HeaderValue>),
}

impl FromStr for AllowedOrigins {
    type Err = Error;

    /// Parse a comma separated list of origins, e.g. "http://localhost:3000,https://example.com".
    ///
    /// # Errors
    /// Returns [Error::InvalidCorsOrigin] if an origin is not a valid header value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let origins: Vec<&str> = s
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .collect();

        if origins.contains(&"*") {
            return Ok(AllowedOrigins::Any);
        }

        origins
            .into_iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .map_err(|_| Error::InvalidCorsOrigin(origin.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(AllowedOrigins::List)
    }
}

/// Create the CORS layer for `origins`, allowing all methods and headers.
pub fn cors_layer(origins: &AllowedOrigins) -> CorsLayer {
    match origins {
        AllowedOrigins::Any => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        // Wildcards cannot be combined with credentials, so mirror the request instead.
        AllowedOrigins::List(origins) => CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins.iter().cloned()))
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderName, HeaderValue, header};
    use axum_test::TestServer;

    use crate::{Error, build_router, endpoints, test_utils::get_test_app_state};

    use super::{AllowedOrigins, cors_layer};

    fn get_test_server(origins: &str) -> TestServer {
        let origins: AllowedOrigins = origins.parse().unwrap();
        let app = build_router(get_test_app_state()).layer(cors_layer(&origins));

        TestServer::new(app)
    }

    async fn get_allow_origin(server: &TestServer, origin: &'static str) -> Option<HeaderValue> {
        let response = server
            .get(endpoints::ROOT)
            .add_header(header::ORIGIN, HeaderValue::from_static(origin))
            .await;

        response.assert_status_ok();
        response
            .headers()
            .get(HeaderName::from_static("access-control-allow-origin"))
            .cloned()
    }

    #[test]
    fn parses_wildcard() {
        assert_eq!("*".parse::<AllowedOrigins>(), Ok(AllowedOrigins::Any));
        assert_eq!(
            "http://localhost:3000, *".parse::<AllowedOrigins>(),
            Ok(AllowedOrigins::Any)
        );
    }

    #[test]
    fn parses_origin_list() {
        let origins: AllowedOrigins = "http://localhost:3000, https://example.com,"
            .parse()
            .unwrap();

        assert_eq!(
            origins,
            AllowedOrigins::List(vec![
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("https://example.com"),
            ])
        );
    }

    #[test]
    fn rejects_invalid_origin() {
        assert_eq!(
            "http://bad\norigin".parse::<AllowedOrigins>(),
            Err(Error::InvalidCorsOrigin("http://bad\norigin".to_owned()))
        );
    }

    #[tokio::test]
    async fn wildcard_allows_any_origin() {
        let server = get_test_server("*");

        let allow_origin = get_allow_origin(&server, "https://anywhere.example").await;

        assert_eq!(allow_origin, Some(HeaderValue::from_static("*")));
    }

    #[tokio::test]
    async fn list_only_allows_listed_origins() {
        let server = get_test_server("http://localhost:3000");

        let allowed = get_allow_origin(&server, "http://localhost:3000").await;
        let denied = get_allow_origin(&server, "https://elsewhere.example").await;

        assert_eq!(allowed, Some(HeaderValue::from_static("http://localhost:3000")));
        assert_eq!(denied, None);
    }
}
