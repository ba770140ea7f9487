// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::escape::decode_utf8;
use crate::observer::{RequestObserver, ResponseEvent};
use crate::ApiRequest;
use bytes::Bytes;
use http::{Method, StatusCode};
use semsign_core::{Error, Result};
use serde::Deserialize;

/// ApiResponse is the normalized result of an API call.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// Decoded JSON body of a `200` response.
    Json(serde_json::Value),
    /// Raw body of a `200` response to a binary request.
    Binary(Bytes),
    /// The request was accepted with `202`. Nothing to read yet.
    Accepted,
}

impl ApiResponse {
    /// The status code this result stands for, `202` for accepted requests.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiResponse::Accepted => StatusCode::ACCEPTED,
            _ => StatusCode::OK,
        }
    }

    /// Returns true if the request was only accepted for processing.
    pub fn is_accepted(&self) -> bool {
        matches!(self, ApiResponse::Accepted)
    }

    /// Borrow the decoded JSON body.
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            ApiResponse::Json(v) => Some(v),
            _ => None,
        }
    }

    /// Take the decoded JSON body.
    pub fn into_json(self) -> Option<serde_json::Value> {
        match self {
            ApiResponse::Json(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow the raw body of a binary response.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            ApiResponse::Binary(v) => Some(v),
            _ => None,
        }
    }
}

/// Turn a raw status and body into the result of `req`.
///
/// [`RequestObserver::on_response`] always fires first. `DELETE` only succeeds
/// with `202`. Other methods succeed with `200` or `202`. Every other status fires
/// [`RequestObserver::on_error`] once and fails with an [`ErrorKind::Api`](semsign_core::ErrorKind::Api) error.
pub fn normalize(
    req: &ApiRequest,
    observer: &dyn RequestObserver,
    status: StatusCode,
    body: Bytes,
) -> Result<ApiResponse> {
    let message = String::from_utf8_lossy(&body);
    let event = ResponseEvent {
        status,
        message: &message,
    };
    observer.on_response(&event);

    if req.method == Method::DELETE {
        if status == StatusCode::ACCEPTED {
            return Ok(ApiResponse::Accepted);
        }
    } else {
        match status {
            StatusCode::OK => {
                let result = if req.is_binary {
                    ApiResponse::Binary(body.clone())
                } else {
                    ApiResponse::Json(parse_json(&body)?)
                };
                if req.call_after_response_hook {
                    observer.on_after_response(&result);
                }
                return Ok(result);
            }
            StatusCode::ACCEPTED => return Ok(ApiResponse::Accepted),
            _ => {}
        }
    }

    observer.on_error(&event);
    Err(Error::api(status, error_message(&message)))
}

fn parse_json(body: &[u8]) -> Result<serde_json::Value> {
    let text = std::str::from_utf8(body)
        .map_err(|e| Error::unexpected("response body is not valid UTF-8").with_source(e))?;
    let value = serde_json::from_str(&decode_utf8(text)?)
        .map_err(|e| Error::unexpected("response body is not valid JSON").with_source(e))?;
    Ok(value)
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    message: Option<String>,
    error_message: Option<String>,
}

/// Pick the most specific message an error response offers.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|v| v.message.or(v.error_message))
        .filter(|v| !v.is_empty())
        .or_else(|| (!body.is_empty()).then(|| body.to_string()))
        .unwrap_or_else(|| "unknown error".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::{NoopObserver, RequestEvent};
    use pretty_assertions::assert_eq;
    use semsign_core::ErrorKind;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl RequestObserver for Recorder {
        fn on_request(&self, event: &RequestEvent<'_>) {
            self.events.lock().unwrap().push(format!("request {}", event.url));
        }

        fn on_response(&self, event: &ResponseEvent<'_>) {
            self.events
                .lock()
                .unwrap()
                .push(format!("response {}", event.status.as_u16()));
        }

        fn on_error(&self, event: &ResponseEvent<'_>) {
            self.events
                .lock()
                .unwrap()
                .push(format!("error {} {}", event.status.as_u16(), event.message));
        }

        fn on_after_response(&self, result: &ApiResponse) {
            self.events
                .lock()
                .unwrap()
                .push(format!("after {}", result.status().as_u16()));
        }
    }

    #[test]
    fn test_delete_accepted() {
        let obs = Recorder::default();
        let resp = normalize(
            &ApiRequest::delete("document/42"),
            &obs,
            StatusCode::ACCEPTED,
            Bytes::new(),
        )
        .unwrap();

        assert_eq!(resp, ApiResponse::Accepted);
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
        assert_eq!(obs.events(), vec!["response 202"]);
    }

    #[test]
    fn test_delete_other_status_fails() {
        for status in [StatusCode::OK, StatusCode::NOT_FOUND] {
            let obs = Recorder::default();
            let err = normalize(
                &ApiRequest::delete("document/42"),
                &obs,
                status,
                Bytes::from_static(b"gone"),
            )
            .unwrap_err();

            assert_eq!(err.kind(), ErrorKind::Api);
            assert_eq!(err.status(), Some(status));
            assert_eq!(err.message(), "gone");
            assert_eq!(
                obs.events(),
                vec![
                    format!("response {}", status.as_u16()),
                    format!("error {} gone", status.as_u16()),
                ]
            );
        }
    }

    #[test]
    fn test_ok_json() {
        let obs = Recorder::default();
        let resp = normalize(
            &ApiRequest::get("task"),
            &obs,
            StatusCode::OK,
            Bytes::from(r#"{"status":"COMPLETED","summary":"très bien"}"#),
        )
        .unwrap();

        assert_eq!(
            resp.into_json(),
            Some(json!({"status": "COMPLETED", "summary": "très bien"}))
        );
        assert_eq!(obs.events(), vec!["response 200"]);
    }

    #[test]
    fn test_ok_binary_is_untouched() {
        let body = Bytes::from_static(&[0xff, 0x00, 0x25, 0x41]);
        let resp = normalize(
            &ApiRequest::get("export").binary(),
            &NoopObserver,
            StatusCode::OK,
            body.clone(),
        )
        .unwrap();

        assert_eq!(resp.as_bytes(), Some(&body));
    }

    #[test]
    fn test_ok_invalid_json() {
        let obs = Recorder::default();
        let err = normalize(
            &ApiRequest::get("task"),
            &obs,
            StatusCode::OK,
            Bytes::from_static(b"<html>"),
        )
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Unexpected);
        assert_eq!(obs.events(), vec!["response 200"]);
    }

    #[test]
    fn test_after_response_hook() {
        let obs = Recorder::default();
        normalize(
            &ApiRequest::get("task").with_after_response_hook(),
            &obs,
            StatusCode::OK,
            Bytes::from_static(b"[]"),
        )
        .unwrap();
        assert_eq!(obs.events(), vec!["response 200", "after 200"]);

        let obs = Recorder::default();
        let resp = normalize(
            &ApiRequest::post("document").with_after_response_hook(),
            &obs,
            StatusCode::ACCEPTED,
            Bytes::new(),
        )
        .unwrap();
        assert!(resp.is_accepted());
        assert_eq!(obs.events(), vec!["response 202"]);
    }

    #[test]
    fn test_error_status() {
        let obs = Recorder::default();
        let err = normalize(
            &ApiRequest::get("task"),
            &obs,
            StatusCode::UNAUTHORIZED,
            Bytes::from_static(br#"{"message":"bad signature"}"#),
        )
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert_eq!(err.message(), "bad signature");
        assert_eq!(obs.events().len(), 2);
    }

    #[test]
    fn test_error_message() {
        assert_eq!(error_message(r#"{"message":"m"}"#), "m");
        assert_eq!(error_message(r#"{"error_message":"e"}"#), "e");
        assert_eq!(error_message(r#"{"message":""}"#), r#"{"message":""}"#);
        assert_eq!(error_message("Internal Server Error"), "Internal Server Error");
        assert_eq!(error_message(""), "unknown error");
    }
}
