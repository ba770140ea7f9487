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
use crate::escape::escape_uri;
use crate::response::error_message;
use crate::{Config, Credential};
use async_trait::async_trait;
use bytes::Bytes;
use http::{Method, StatusCode};
use log::{debug, warn};
use semsign_core::{Context, Error, ProvideCredential, Result};
use serde::{Deserialize, Serialize};

/// SessionCredentialProvider exchanges a cached session id or a login for a
/// consumer key and secret.
///
/// Resolution runs as a small state machine:
///
/// 1. Read the session cache file. A missing, unreadable or malformed cache goes
///    straight to login.
/// 2. Refresh: `GET <endpoint>/<id>.json?appkey=<app_key>`. Anything but `200`
///    means the cached id is stale and login follows. The cache is not rewritten.
/// 3. Login: `POST <endpoint>.json?appkey=<app_key>` with `{username, password}`,
///    both `unspecified` if not configured. The new session id is written back to
///    the cache file on a best-effort basis.
///
/// Cache I/O never fails resolution. Transport errors and rejected logins do.
#[derive(Debug, Clone)]
pub struct SessionCredentialProvider {
    config: Config,
}

enum State {
    Unresolved,
    Refreshing(String),
    LoggingIn,
    Resolved(Credential),
}

impl SessionCredentialProvider {
    /// Create a new `SessionCredentialProvider` for the given config.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn app_key(&self) -> Result<&str> {
        self.config
            .app_key
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                Error::config_invalid(format!(
                    "app key is required to exchange a session, set {SEMANTRIA_APP_KEY}"
                ))
            })
    }

    async fn read_session_id(&self, ctx: &Context, path: Option<&str>) -> Option<String> {
        let Some(path) = path else {
            debug!("session cache path could not be resolved, skip cached session");
            return None;
        };

        let content = match ctx.file_read(path).await {
            Ok(v) => v,
            Err(err) => {
                debug!("session cache {path} is not readable: {err}");
                return None;
            }
        };

        match serde_json::from_slice::<CachedSession>(&content) {
            Ok(v) if !v.id.is_empty() => Some(v.id),
            Ok(_) => {
                warn!("session cache {path} carries no session id");
                None
            }
            Err(err) => {
                warn!("session cache {path} is malformed: {err}");
                None
            }
        }
    }

    async fn write_session_id(&self, ctx: &Context, path: Option<&str>, id: &str) {
        let Some(path) = path else {
            return;
        };

        let content = match serde_json::to_vec(&CachedSession { id: id.to_string() }) {
            Ok(v) => v,
            Err(err) => {
                warn!("failed to serialize session cache: {err}");
                return;
            }
        };

        match ctx.file_write(path, &content).await {
            Ok(()) => debug!("session id cached at {path}"),
            Err(err) => warn!("failed to write session cache {path}: {err}"),
        }
    }

    async fn refresh(&self, ctx: &Context, app_key: &str, id: &str) -> Result<Option<Credential>> {
        let url = format!(
            "{}/{id}.json?appkey={app_key}",
            self.config.session_endpoint
        );
        let req = http::Request::builder()
            .method(Method::GET)
            .uri(escape_uri(&url))
            .body(Bytes::new())?;

        let resp = ctx.http_send(req).await?;
        if resp.status() != StatusCode::OK {
            debug!(
                "cached session is stale, refresh returned {}",
                resp.status()
            );
            return Ok(None);
        }

        match serde_json::from_slice::<SessionResponse>(resp.body()) {
            Ok(v) => {
                let cred = v.custom_params.into_credential();
                if cred.is_none() {
                    warn!("session refresh returned no consumer key or secret");
                }
                Ok(cred)
            }
            Err(err) => {
                warn!("session refresh returned a malformed body: {err}");
                Ok(None)
            }
        }
    }

    async fn login(&self, ctx: &Context, app_key: &str, path: Option<&str>) -> Result<Credential> {
        let url = format!("{}.json?appkey={app_key}", self.config.session_endpoint);
        let body = serde_json::to_vec(&LoginRequest {
            username: self.config.username.as_deref().unwrap_or(ANONYMOUS_LOGIN),
            password: self.config.password.as_deref().unwrap_or(ANONYMOUS_LOGIN),
        })?;
        let req = http::Request::builder()
            .method(Method::POST)
            .uri(escape_uri(&url))
            .body(Bytes::from(body))?;

        let resp = ctx.http_send(req).await?;
        let status = resp.status();
        if status != StatusCode::OK {
            let content = String::from_utf8_lossy(resp.body());
            return Err(Error::credential_denied(format!(
                "session login failed: {}",
                error_message(&content)
            ))
            .with_status(status));
        }

        let resp: SessionResponse = serde_json::from_slice(resp.body()).map_err(|e| {
            Error::credential_invalid("session login returned a malformed body").with_source(e)
        })?;

        match resp.id.as_deref() {
            Some(id) if !id.is_empty() => self.write_session_id(ctx, path, id).await,
            _ => warn!("session login returned no session id, nothing to cache"),
        }

        resp.custom_params.into_credential().ok_or_else(|| {
            Error::credential_invalid("session login returned no consumer key or secret")
        })
    }
}

#[async_trait]
impl ProvideCredential for SessionCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let app_key = self.app_key()?;
        let path = self.config.session_file_path(ctx);

        let mut state = State::Unresolved;
        loop {
            state = match state {
                State::Unresolved => match self.read_session_id(ctx, path.as_deref()).await {
                    Some(id) => State::Refreshing(id),
                    None => State::LoggingIn,
                },
                State::Refreshing(id) => match self.refresh(ctx, app_key, &id).await? {
                    Some(cred) => State::Resolved(cred),
                    None => State::LoggingIn,
                },
                State::LoggingIn => {
                    debug!("logging in to obtain a new session");
                    State::Resolved(self.login(ctx, app_key, path.as_deref()).await?)
                }
                State::Resolved(cred) => return Ok(Some(cred)),
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CachedSession {
    #[serde(default)]
    id: String,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default)]
struct SessionResponse {
    id: Option<String>,
    custom_params: CustomParams,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default)]
struct CustomParams {
    key: Option<String>,
    secret: Option<String>,
}

impl CustomParams {
    fn into_credential(self) -> Option<Credential> {
        match (self.key, self.secret) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
                Some(Credential::new(key, secret))
            }
            _ => None,
        }
    }
}
