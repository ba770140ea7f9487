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

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use semsign_core::{Context, Error, HttpSend, Result};
use semsign_fs_tokio::{TokioFileRead, TokioFileWrite};
use semsign_semantria::{ApiResponse, RequestEvent, RequestObserver, ResponseEvent};
use std::sync::{Arc, Mutex};

pub const SESSION_ENDPOINT: &str = "https://semantria.example.com/auth/session";
pub const API_HOST: &str = "https://api.example.com";

/// A request seen by [`MockHttpSend`].
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

#[derive(Debug, Clone)]
struct Route {
    method: Method,
    prefix: String,
    status: StatusCode,
    body: String,
}

/// MockHttpSend answers requests from scripted routes and records them.
///
/// Routes match on method and uri prefix. Unmatched requests fail like a
/// broken connection would.
#[derive(Debug, Clone, Default)]
pub struct MockHttpSend {
    routes: Arc<Mutex<Vec<Route>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockHttpSend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, method: Method, prefix: &str, status: StatusCode, body: &str) -> Self {
        self.routes.lock().unwrap().push(Route {
            method,
            prefix: prefix.to_string(),
            status,
            body: body.to_string(),
        });
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: &Method, prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.uri.starts_with(prefix))
            .count()
    }
}

#[async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let (parts, body) = req.into_parts();
        let uri = parts.uri.to_string();
        self.requests.lock().unwrap().push(Recorded {
            method: parts.method.clone(),
            uri: uri.clone(),
            headers: parts.headers.clone(),
            body,
        });

        let route = self
            .routes
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.method == parts.method && uri.starts_with(&r.prefix))
            .cloned()
            .ok_or_else(|| Error::transport(format!("connection refused: {uri}")))?;

        Ok(http::Response::builder()
            .status(route.status)
            .body(Bytes::from(route.body))?)
    }
}

/// Context backed by the real file system and the given mock transport.
pub fn context(http: MockHttpSend) -> Context {
    let _ = env_logger::builder().is_test(true).try_init();

    Context::new()
        .with_file_read(TokioFileRead)
        .with_file_write(TokioFileWrite)
        .with_http_send(http)
}

/// Observer that records every event as a line of text.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<String>>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl RequestObserver for RecordingObserver {
    fn on_request(&self, event: &RequestEvent<'_>) {
        self.push(format!(
            "request {} {} {}",
            event.method,
            event.url,
            event.message.unwrap_or("-")
        ));
    }

    fn on_response(&self, event: &ResponseEvent<'_>) {
        self.push(format!("response {} {}", event.status.as_u16(), event.message));
    }

    fn on_error(&self, event: &ResponseEvent<'_>) {
        self.push(format!("error {} {}", event.status.as_u16(), event.message));
    }

    fn on_after_response(&self, result: &ApiResponse) {
        self.push(format!("after {result:?}"));
    }
}
