use actix_web::{error::InternalError, http::StatusCode, Error, HttpResponse};
use serde::Serialize;

/// Envelope shared by every endpoint: `{ success, message, code?, ...item, list? }`.
#[derive(Serialize)]
pub struct JsonResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(flatten)]
    pub item: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<Vec<T>>,
}

pub struct JsonResponseBuilder<T> {
    code: Option<String>,
    item: Option<T>,
    list: Option<Vec<T>>,
}

impl<T> JsonResponse<T>
where
    T: Serialize,
{
    pub fn build() -> JsonResponseBuilder<T> {
        JsonResponseBuilder {
            code: None,
            item: None,
            list: None,
        }
    }
}

impl<T> JsonResponseBuilder<T>
where
    T: Serialize,
{
    pub fn set_item(mut self, item: T) -> Self {
        self.item = Some(item);
        self
    }

    pub fn set_list(mut self, list: Vec<T>) -> Self {
        self.list = Some(list);
        self
    }

    pub fn set_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn response(self, status: StatusCode, message: impl Into<String>) -> HttpResponse {
        let message = message.into();
        let message = if message.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("Unknown status")
                .to_string()
        } else {
            message
        };

        HttpResponse::build(status).json(JsonResponse {
            success: status.is_success(),
            message,
            code: self.code,
            item: self.item,
            list: self.list,
        })
    }

    pub fn ok(self, message: impl Into<String>) -> HttpResponse {
        self.response(StatusCode::OK, message)
    }

    fn error(self, status: StatusCode, message: impl Into<String>) -> Error {
        let message = message.into();
        InternalError::from_response(message.clone(), self.response(status, message)).into()
    }

    pub fn bad_request(self, message: impl Into<String>) -> Error {
        self.error(StatusCode::BAD_REQUEST, message)
    }

    pub fn form_error(self, message: impl Into<String>) -> Error {
        self.error(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(self, message: impl Into<String>) -> Error {
        self.error(StatusCode::UNAUTHORIZED, message)
    }

    pub fn internal_server_error(self, message: impl Into<String>) -> Error {
        self.error(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}
