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

use crate::constants::*;
use semsign_core::utils::Redact;
use semsign_core::Context;
use std::fmt::{Debug, Formatter};

/// Config carries the session configuration for the Semantria API.
///
/// Once built, a config is only read: resolved credentials live in the
/// [`Signer`](semsign_core::Signer) cache, never written back here.
#[derive(Clone)]
pub struct Config {
    /// `consumer_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `SEMANTRIA_CONSUMER_KEY`
    pub consumer_key: Option<String>,
    /// `consumer_secret` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `SEMANTRIA_CONSUMER_SECRET`
    pub consumer_secret: Option<String>,
    /// `app_key` identifies the application to the credential service.
    ///
    /// Required whenever the consumer key and secret are not supplied directly.
    ///
    /// - this field if it's `is_some`
    /// - env value: `SEMANTRIA_APP_KEY`
    pub app_key: Option<String>,
    /// `username` used for the login exchange, `unspecified` if absent.
    ///
    /// - this field if it's `is_some`
    /// - env value: `SEMANTRIA_USERNAME`
    pub username: Option<String>,
    /// `password` used for the login exchange, `unspecified` if absent.
    ///
    /// - this field if it's `is_some`
    /// - env value: `SEMANTRIA_PASSWORD`
    pub password: Option<String>,
    /// `session_file` caches the session id between runs.
    ///
    /// - this field if it's `is_some`
    /// - env value: `SEMANTRIA_SESSION_FILE`
    /// - default to `/tmp/semantria-session.dat`
    pub session_file: Option<String>,
    /// Base url of the credential service.
    pub session_endpoint: String,
    /// `api_host` will be loaded from
    ///
    /// - env value: `SEMANTRIA_API_HOST` if this field is still the default
    /// - default to `DEFAULT_API_HOST`
    pub api_host: String,
    /// Value of the `x-api-version` header.
    pub api_version: String,
    /// Value of the `x-app-name` header, omitted if `None`.
    ///
    /// - this field if it's `is_some`
    /// - env value: `SEMANTRIA_APPLICATION_NAME`
    pub application_name: Option<String>,
    /// Output format appended to non-binary request paths, `json` by default.
    pub format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            consumer_key: None,
            consumer_secret: None,
            app_key: None,
            username: None,
            password: None,
            session_file: None,
            session_endpoint: DEFAULT_SESSION_ENDPOINT.to_string(),
            api_host: DEFAULT_API_HOST.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            application_name: None,
            format: DEFAULT_FORMAT.to_string(),
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("consumer_key", &Redact::from(&self.consumer_key))
            .field("consumer_secret", &Redact::from(&self.consumer_secret))
            .field("app_key", &self.app_key)
            .field("username", &self.username)
            .field("password", &Redact::from(&self.password))
            .field("session_file", &self.session_file)
            .field("session_endpoint", &self.session_endpoint)
            .field("api_host", &self.api_host)
            .field("api_version", &self.api_version)
            .field("application_name", &self.application_name)
            .field("format", &self.format)
            .finish()
    }
}

impl Config {
    /// Load config from env.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(SEMANTRIA_CONSUMER_KEY) {
            self.consumer_key.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(SEMANTRIA_CONSUMER_SECRET) {
            self.consumer_secret.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(SEMANTRIA_APP_KEY) {
            self.app_key.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(SEMANTRIA_USERNAME) {
            self.username.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(SEMANTRIA_PASSWORD) {
            self.password.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(SEMANTRIA_SESSION_FILE) {
            self.session_file.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(SEMANTRIA_APPLICATION_NAME) {
            self.application_name.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(SEMANTRIA_API_HOST) {
            if self.api_host == DEFAULT_API_HOST {
                self.api_host = v;
            }
        }

        self
    }

    /// Set the consumer key and secret directly, skipping the session exchange.
    pub fn with_consumer(mut self, key: impl Into<String>, secret: impl Into<String>) -> Self {
        self.consumer_key = Some(key.into());
        self.consumer_secret = Some(secret.into());
        self
    }

    /// Set the application key used by the session exchange.
    pub fn with_app_key(mut self, app_key: impl Into<String>) -> Self {
        self.app_key = Some(app_key.into());
        self
    }

    /// Set the login used by the session exchange.
    pub fn with_login(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the session cache file path.
    pub fn with_session_file(mut self, path: impl Into<String>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    /// Set the credential service base url.
    pub fn with_session_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.session_endpoint = endpoint.into();
        self
    }

    /// Set the API host.
    pub fn with_api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = host.into();
        self
    }

    /// Set the application name sent as `x-app-name`.
    pub fn with_application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = Some(name.into());
        self
    }

    /// Consumer key and secret, if both are present and non-empty.
    pub fn consumer(&self) -> Option<(&str, &str)> {
        match (self.consumer_key.as_deref(), self.consumer_secret.as_deref()) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
                Some((key, secret))
            }
            _ => None,
        }
    }

    /// Resolve the session cache file path.
    ///
    /// Returns `None` if the configured path starts with `~` and no home dir is known.
    pub fn session_file_path(&self, ctx: &Context) -> Option<String> {
        match &self.session_file {
            Some(path) => ctx.expand_home_dir(path),
            None => Some(DEFAULT_SESSION_FILE.to_string()),
        }
    }
}
