//! Request extractors that report malformed input as JSON errors.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::Error;

/// A JSON request body.
///
/// Works like [axum::Json], except that a body that cannot be parsed is
/// rejected with an [Error::InvalidRequest].
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state)
            .await
            .map_err(|rejection| Error::InvalidRequest(rejection.body_text()))?;

        Ok(Self(value))
    }
}

/// Query string parameters.
///
/// Repeated keys, e.g. `?type=income&type=general`, can be collected into a `Vec`.
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum_extra::extract::Query(value) =
            axum_extra::extract::Query::<T>::from_request_parts(parts, state)
                .await
                .map_err(|rejection| Error::InvalidRequest(rejection.to_string()))?;

        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use axum::{Json, Router, routing::get};
    use axum_test::TestServer;
    use serde::Deserialize;
    use serde_json::{Value, json};

    use super::{JsonBody, QueryParams};

    #[derive(Debug, Deserialize)]
    struct Params {
        #[serde(default, rename = "type")]
        types: Vec<String>,
        page: Option<u64>,
    }

    fn get_test_server() -> TestServer {
        let app = Router::new().route(
            "/",
            get(|QueryParams(params): QueryParams<Params>| async move {
                Json(json!({ "types": params.types, "page": params.page }))
            })
            .post(|JsonBody(body): JsonBody<Params>| async move {
                Json(json!({ "page": body.page }))
            }),
        );

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn collects_repeated_query_keys() {
        let server = get_test_server();

        let response = server.get("/?type=income&type=general&page=2").await;

        response.assert_status_ok();
        response.assert_json(&json!({ "types": ["income", "general"], "page": 2 }));
    }

    #[tokio::test]
    async fn bad_query_is_json_error() {
        let server = get_test_server();

        let response = server.get("/?page=first").await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn bad_body_is_json_error() {
        let server = get_test_server();

        let response = server
            .post("/")
            .json(&json!({ "page": "first" }))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert!(body["error"].is_string());
    }
}
