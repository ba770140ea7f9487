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

use crate::ApiResponse;
use http::{Method, StatusCode};
use log::{debug, warn};
use std::fmt::Debug;

/// RequestEvent is emitted right before a signed request is dispatched.
#[derive(Debug, Clone, Copy)]
pub struct RequestEvent<'a> {
    /// HTTP method of the request.
    pub method: &'a Method,
    /// Unsigned url, without the oauth parameters.
    pub url: &'a str,
    /// Encoded request body, if any.
    pub message: Option<&'a str>,
}

/// ResponseEvent carries the raw status and body of an API response.
#[derive(Debug, Clone, Copy)]
pub struct ResponseEvent<'a> {
    /// HTTP status returned by the API.
    pub status: StatusCode,
    /// Raw response body.
    pub message: &'a str,
}

/// RequestObserver receives lifecycle events of every API call.
///
/// All methods default to doing nothing, so implementors only override what
/// they care about. Events are delivered synchronously and the return values
/// are ignored.
pub trait RequestObserver: Debug + Send + Sync + 'static {
    /// Called before the request is sent.
    fn on_request(&self, _event: &RequestEvent<'_>) {}

    /// Called for every response, before it is interpreted.
    fn on_response(&self, _event: &ResponseEvent<'_>) {}

    /// Called when the response is turned into an error.
    fn on_error(&self, _event: &ResponseEvent<'_>) {}

    /// Called with the decoded result of a `200` response if the request opted in.
    fn on_after_response(&self, _result: &ApiResponse) {}
}

/// NoopObserver ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RequestObserver for NoopObserver {}

/// LogObserver forwards every event to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl RequestObserver for LogObserver {
    fn on_request(&self, event: &RequestEvent<'_>) {
        debug!(
            "semantria request: {} {} body: {:?}",
            event.method, event.url, event.message
        );
    }

    fn on_response(&self, event: &ResponseEvent<'_>) {
        debug!(
            "semantria response: {} body: {}",
            event.status, event.message
        );
    }

    fn on_error(&self, event: &ResponseEvent<'_>) {
        warn!(
            "semantria request failed: {} body: {}",
            event.status, event.message
        );
    }

    fn on_after_response(&self, result: &ApiResponse) {
        debug!("semantria result: {result:?}");
    }
}
