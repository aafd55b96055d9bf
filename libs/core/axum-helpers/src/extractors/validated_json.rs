//! JSON extractor with automatic validation using the validator crate.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON extractor with automatic validation.
///
/// Both deserialization failures and `Validate` failures are rejected with
/// 400 and the standard error body; validation failures carry per-field
/// details.
///
/// ```ignore
/// use axum_helpers::extractors::ValidatedJson;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct CreateUser {
///     #[validate(length(min = 1))]
///     username: String,
///     #[validate(email)]
///     email: String,
/// }
///
/// async fn create_user(ValidatedJson(payload): ValidatedJson<CreateUser>) -> String {
///     format!("Creating user: {}", payload.username)
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        data.validate()
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(ValidatedJson(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        routing::post,
    };
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct Payload {
        #[validate(length(min = 1))]
        name: String,
    }

    fn app() -> Router {
        Router::new().route(
            "/",
            post(|ValidatedJson(p): ValidatedJson<Payload>| async move { p.name }),
        )
    }

    fn json_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_valid_payload_passes() {
        let response = app().oneshot(json_request(r#"{"name":"ok"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_validation_failure_has_field_details() {
        let response = app().oneshot(json_request(r#"{"name":""}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert!(body["details"]["name"].is_array());
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let response = app().oneshot(json_request("{}")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "JSON_EXTRACTION");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let response = app().oneshot(json_request("{not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
