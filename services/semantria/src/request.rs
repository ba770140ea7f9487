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

use crate::escape::encode_utf8;
use crate::Config;
use http::Method;
use semsign_core::Result;
use serde::Serialize;
use serde_json::Value;
use std::fmt::{self, Display, Formatter};

/// ApiRequest describes one logical call against the Semantria API.
///
/// ## Example
///
/// ```
/// use semsign_semantria::ApiRequest;
///
/// let req = ApiRequest::get("document/processed")
///     .query("config_id", "default")
///     .query_opt("limit", None::<u32>);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method, `GET` by default.
    pub method: Method,
    /// Path below the API host, without leading slash or format suffix.
    pub path: String,
    /// Query parameters in insertion order. `None` values are dropped from the url.
    pub get_params: Vec<(String, Option<String>)>,
    /// JSON body, if any.
    pub post_params: Option<Value>,
    /// Skip the format suffix and return the response body untouched.
    pub is_binary: bool,
    /// Report successful results to [`RequestObserver::on_after_response`](crate::RequestObserver::on_after_response).
    pub call_after_response_hook: bool,
}

impl Default for ApiRequest {
    fn default() -> Self {
        Self {
            method: Method::GET,
            path: String::new(),
            get_params: Vec::new(),
            post_params: None,
            is_binary: false,
            call_after_response_hook: false,
        }
    }
}

impl ApiRequest {
    /// Create a request with the given method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            ..Default::default()
        }
    }

    /// Create a `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Create a `POST` request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Create a `PUT` request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Create a `DELETE` request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Set a query parameter, replacing the value in place if the key exists.
    pub fn query(self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query_opt(key, Some(value))
    }

    /// Set a query parameter that is left out of the url when `None`.
    pub fn query_opt(mut self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        upsert_param(&mut self.get_params, key.into(), value.map(|v| v.to_string()));
        self
    }

    /// Attach a JSON body.
    pub fn json(mut self, body: impl Serialize) -> Result<Self> {
        self.post_params = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Mark the response as binary.
    pub fn binary(mut self) -> Self {
        self.is_binary = true;
        self
    }

    /// Opt in to the after-response hook.
    pub fn with_after_response_hook(mut self) -> Self {
        self.call_after_response_hook = true;
        self
    }

    /// Build the unsigned url: `<host>/<path>[.<format>][?query]`.
    pub fn plain_url(&self, config: &Config) -> String {
        self.unsigned_url(config).to_string()
    }

    /// Build the unsigned url split into its base and query parameters.
    pub fn unsigned_url(&self, config: &Config) -> UnsignedUrl {
        let mut base = format!("{}/{}", config.api_host, self.path);
        if !self.is_binary {
            base.push('.');
            base.push_str(&config.format);
        }
        UnsignedUrl {
            base,
            params: self.get_params.clone(),
        }
    }

    /// Serialize the body into byte-safe text.
    ///
    /// Returns `None` when there is no body or the body is empty: `null`,
    /// `false`, `0` or `""`. Empty objects and arrays are still sent.
    pub fn encoded_body(&self) -> Result<Option<String>> {
        match &self.post_params {
            Some(body) if !is_empty_body(body) => {
                Ok(Some(encode_utf8(&serde_json::to_string(body)?)))
            }
            _ => Ok(None),
        }
    }
}

/// UnsignedUrl is a request url before signing, with query values unescaped.
///
/// [`Client`](crate::Client) attaches it to the request extensions so that
/// [`RequestSigner`](crate::RequestSigner) signs the raw text instead of the
/// escaped uri that goes on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedUrl {
    /// `scheme://authority/path`, without query.
    pub base: String,
    /// Query parameters in order. `None` values are dropped.
    pub params: Vec<(String, Option<String>)>,
}

impl Display for UnsignedUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.base, create_query_string(&self.params))
    }
}

/// Build `?k1=v1&k2=v2` from the given parameters in order.
///
/// Entries whose value is `None` are skipped and nothing is escaped. Returns an
/// empty string when no entry survives.
pub fn create_query_string(params: &[(String, Option<String>)]) -> String {
    let pairs: Vec<String> = params
        .iter()
        .filter_map(|(k, v)| v.as_ref().map(|v| format!("{k}={v}")))
        .collect();

    if pairs.is_empty() {
        return String::new();
    }
    format!("?{}", pairs.join("&"))
}

fn is_empty_body(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

pub(crate) fn upsert_param(
    params: &mut Vec<(String, Option<String>)>,
    key: String,
    value: Option<String>,
) {
    match params.iter_mut().find(|(k, _)| *k == key) {
        Some((_, v)) => *v = value,
        None => params.push((key, value)),
    }
}
