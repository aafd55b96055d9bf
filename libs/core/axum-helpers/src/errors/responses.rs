//! Reusable OpenAPI response types for consistent API documentation.

use super::ErrorResponse;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "code": 2003,
        "error": "DATABASE_ERROR",
        "message": "Database error occurred"
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Validation Error",
    content_type = "application/json",
    example = json!({
        "code": 1001,
        "error": "VALIDATION_ERROR",
        "message": "Request validation failed",
        "details": {
            "username": [{
                "code": "length",
                "message": "username must not be empty",
                "params": {"min": 1, "value": ""}
            }]
        }
    })
)]
pub struct BadRequestValidationResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Invalid id",
    content_type = "application/json",
    example = json!({
        "code": 1002,
        "error": "INVALID_ID",
        "message": "Invalid id format: abc"
    })
)]
pub struct BadRequestIdResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "code": 1004,
        "error": "NOT_FOUND",
        "message": "User with id 999 not found"
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::openapi::RefOr;

    fn example_of<'a, T: ToResponse<'a>>() -> serde_json::Value {
        let RefOr::T(response) = T::response().1 else {
            panic!("expected an inline response");
        };
        response
            .content
            .get("application/json")
            .and_then(|content| content.example.clone())
            .expect("example is set")
    }

    #[test]
    fn test_examples_match_rendered_error_codes() {
        assert_eq!(example_of::<NotFoundResponse>()["code"], 1004);
        assert_eq!(example_of::<BadRequestIdResponse>()["error"], "INVALID_ID");
        assert_eq!(
            example_of::<InternalServerErrorResponse>()["error"],
            "DATABASE_ERROR"
        );
        assert!(example_of::<BadRequestValidationResponse>()["details"]["username"].is_array());
    }
}
