use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{web, Error, HttpResponse};
use serde_derive::Serialize;
use uuid::Uuid;

/// Response envelope shared by every JSON endpoint.
#[derive(Serialize, Debug)]
pub struct JsonResponse<T> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<Vec<T>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

pub struct JsonResponseBuilder<T>
where
    T: serde::Serialize,
{
    id: Option<Uuid>,
    item: Option<T>,
    list: Option<Vec<T>>,
    meta: Option<serde_json::Value>,
}

impl<T> JsonResponseBuilder<T>
where
    T: serde::Serialize,
{
    pub fn set_item(mut self, item: impl Into<Option<T>>) -> Self {
        self.item = item.into();
        self
    }

    pub fn set_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn set_list(mut self, list: Vec<T>) -> Self {
        self.list = Some(list);
        self
    }

    pub fn set_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = Some(meta);
        self
    }

    fn to_json_response(self, message: String) -> JsonResponse<T> {
        JsonResponse {
            message,
            id: self.id,
            item: self.item,
            list: self.list,
            meta: self.meta,
        }
    }

    fn to_error(self, status: StatusCode, message: impl Into<String>) -> Error {
        let message = message.into();
        let response = HttpResponse::build(status).json(self.to_json_response(message.clone()));
        InternalError::from_response(message, response).into()
    }

    pub fn ok(self, message: impl Into<String>) -> web::Json<JsonResponse<T>> {
        web::Json(self.to_json_response(message.into()))
    }

    pub fn created(self, message: impl Into<String>) -> HttpResponse {
        HttpResponse::Created().json(self.to_json_response(message.into()))
    }

    pub fn bad_request(self, message: impl Into<String>) -> Error {
        self.to_error(StatusCode::BAD_REQUEST, message)
    }

    /// 400 carrying the validation report in `meta`.
    pub fn form_error(mut self, errors: String) -> Error {
        let report = serde_json::from_str::<serde_json::Value>(&errors)
            .unwrap_or(serde_json::Value::String(errors));
        self.meta = Some(report);
        self.to_error(StatusCode::BAD_REQUEST, "Validation failed")
    }

    pub fn unauthorized(self, message: impl Into<String>) -> Error {
        self.to_error(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(self, message: impl Into<String>) -> Error {
        self.to_error(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(self, message: impl Into<String>) -> Error {
        self.to_error(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(self, message: impl Into<String>) -> Error {
        self.to_error(StatusCode::CONFLICT, message)
    }

    pub fn internal_server_error(self, message: impl Into<String>) -> Error {
        let message = message.into();
        let message = if message.trim().is_empty() {
            "Internal error".to_string()
        } else {
            message
        };
        self.to_error(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn service_unavailable(self, message: impl Into<String>) -> Error {
        self.to_error(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

impl<T> JsonResponse<T>
where
    T: serde::Serialize,
{
    pub fn build() -> JsonResponseBuilder<T> {
        JsonResponseBuilder {
            id: None,
            item: None,
            list: None,
            meta: None,
        }
    }
}

fn payload_error<E>(err: E, message: String) -> Error
where
    E: std::fmt::Debug + std::fmt::Display + 'static,
{
    tracing::debug!("{}", message);
    let response = HttpResponse::BadRequest().json(JsonResponse::<()> {
        message,
        id: None,
        item: None,
        list: None,
        meta: None,
    });

    InternalError::from_response(err, response).into()
}

/// Answers unparseable JSON bodies with the envelope instead of plain text.
pub fn json_error_handler(err: actix_web::error::JsonPayloadError, _req: &actix_web::HttpRequest) -> Error {
    let message = format!("Malformed JSON body: {err}");
    payload_error(err, message)
}

pub fn query_error_handler(err: actix_web::error::QueryPayloadError, _req: &actix_web::HttpRequest) -> Error {
    let message = format!("Invalid query parameters: {err}");
    payload_error(err, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;
    use actix_web::ResponseError;

    #[test]
    fn ok_envelope_skips_empty_fields() {
        let response = JsonResponse::build().set_item("x".to_string()).ok("OK");
        let value = serde_json::to_value(&response.0).unwrap();

        assert_eq!(value, serde_json::json!({"message": "OK", "item": "x"}));
    }

    #[test]
    fn not_found_error_carries_status_and_message() {
        let err = JsonResponse::<()>::build().not_found("movie not found");
        let response = err.as_response_error().error_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = response.into_body().try_into_bytes().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["message"], "movie not found");
    }

    #[test]
    fn form_error_keeps_structured_report() {
        let err = JsonResponse::<()>::build().form_error(r#"{"errors":[],"properties":{}}"#.to_string());
        let response = err.as_response_error().error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().try_into_bytes().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["message"], "Validation failed");
        assert!(value["meta"]["properties"].is_object());
    }

    #[test]
    fn empty_internal_error_message_is_replaced() {
        let err = JsonResponse::<()>::build().internal_server_error("");
        assert_eq!(err.to_string(), "Internal error");
    }
}
