//! Read a request body as a JSON object record, the way a JSON body parser middleware does.

use crate::error::AppError;
use crate::service::Record;
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, HeaderMap},
};
use serde_json::Value;

/// Body of a create or update request.
///
/// Never rejects: the outcome is carried in the value so handlers decide what is checked
/// first. A body without a JSON content type, or an empty one, reads as an empty object.
#[derive(Debug)]
pub struct JsonRecord(pub Result<Record, AppError>);

fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let essence = value.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}

pub(crate) fn parse_record(headers: &HeaderMap, bytes: &[u8]) -> Result<Record, AppError> {
    if !is_json_content_type(headers) || bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Record::new());
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(m)) => Ok(m),
        Ok(_) => Err(AppError::BadRequest("body must be a JSON object".into())),
        Err(e) => Err(AppError::BadRequest(format!("invalid JSON body: {}", e))),
    }
}

#[async_trait]
impl<S> FromRequest<S> for JsonRecord
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let headers = req.headers().clone();
        let record = match Bytes::from_request(req, state).await {
            Ok(bytes) => parse_record(&headers, &bytes),
            Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
        };
        Ok(JsonRecord(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(content_type: Option<&'static str>) -> HeaderMap {
        let mut h = HeaderMap::new();
        if let Some(ct) = content_type {
            h.insert(CONTENT_TYPE, HeaderValue::from_static(ct));
        }
        h
    }

    #[test]
    fn missing_content_type_reads_as_empty_object() {
        let r = parse_record(&headers(None), br#"{"name":"Rex"}"#).unwrap();
        assert!(r.is_empty());
    }

    #[test]
    fn empty_json_body_reads_as_empty_object() {
        let r = parse_record(&headers(Some("application/json")), b"  \n").unwrap();
        assert!(r.is_empty());
    }

    #[test]
    fn json_with_charset_is_parsed() {
        let r = parse_record(&headers(Some("application/json; charset=utf-8")), br#"{"age":3}"#).unwrap();
        assert_eq!(r.get("age"), Some(&Value::from(3)));
    }

    #[test]
    fn malformed_json_is_bad_request() {
        let r = parse_record(&headers(Some("application/json")), b"{nope");
        assert!(matches!(r, Err(AppError::BadRequest(m)) if m.starts_with("invalid JSON body")));
    }

    #[test]
    fn non_object_is_bad_request() {
        let r = parse_record(&headers(Some("application/json")), b"[1,2]");
        assert!(matches!(r, Err(AppError::BadRequest(m)) if m == "body must be a JSON object"));
    }
}
