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
use crate::observer::{NoopObserver, RequestEvent, RequestObserver};
use crate::response::normalize;
use crate::{ApiRequest, ApiResponse, Config, Credential, DefaultCredentialProvider, RequestSigner};
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::Method;
use log::debug;
use semsign_core::{Context, Error, Result, Signer};
use std::sync::Arc;

/// Client runs signed calls against the Semantria API.
///
/// Credentials are resolved on first use and kept by the inner [`Signer`] for
/// the lifetime of the client and all its clones. The [`Config`] is never
/// modified after construction.
///
/// ## Example
///
/// ```no_run
/// use semsign_core::Context;
/// use semsign_semantria::{ApiRequest, Client, Config, LogObserver};
///
/// # async fn example(ctx: Context) -> semsign_core::Result<()> {
/// let config = Config::default().from_env(&ctx);
/// let client = Client::new(ctx, config).with_observer(LogObserver);
///
/// let resp = client.run(&ApiRequest::get("status")).await?;
/// println!("{:?}", resp.as_json());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    signer: Signer<Credential>,
    config: Config,
    observer: Arc<dyn RequestObserver>,
}

impl Client {
    /// Create a client that resolves credentials with [`DefaultCredentialProvider`].
    pub fn new(ctx: Context, config: Config) -> Self {
        let signer = Signer::new(
            ctx,
            DefaultCredentialProvider::new(config.clone()),
            RequestSigner::new(),
        );
        Self::with_signer(signer, config)
    }

    /// Create a client around a custom signer.
    pub fn with_signer(signer: Signer<Credential>, config: Config) -> Self {
        Self {
            signer,
            config,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Set the observer that receives lifecycle events.
    pub fn with_observer(mut self, observer: impl RequestObserver) -> Self {
        self.observer = Arc::new(observer);
        self
    }

    /// The config this client was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve the consumer key and secret.
    ///
    /// Only the first successful call performs I/O.
    pub async fn resolve(&self) -> Result<Credential> {
        self.signer.credential().await?.ok_or_else(|| {
            Error::config_invalid("consumer key and secret are required to use the API")
        })
    }

    /// Sign and send `req`, then normalize the response.
    pub async fn run(&self, req: &ApiRequest) -> Result<ApiResponse> {
        self.resolve().await?;

        let unsigned = req.unsigned_url(&self.config);
        let url = unsigned.to_string();
        let body = req.encoded_body()?;

        let mut builder = http::Request::builder()
            .method(req.method.clone())
            .uri(escape_uri(&url))
            .extension(unsigned);
        if req.method == Method::POST {
            builder = builder.header(CONTENT_TYPE, "application/x-www-form-urlencoded");
        }
        if let Some(name) = &self.config.application_name {
            builder = builder.header(X_APP_NAME, name);
        }
        builder = builder.header(X_API_VERSION, &self.config.api_version);

        let (mut parts, ()) = builder.body(())?.into_parts();
        self.signer.sign(&mut parts).await?;

        self.observer.on_request(&RequestEvent {
            method: &req.method,
            url: &url,
            message: body.as_deref(),
        });

        debug!("sending signed request: {} {}", parts.method, parts.uri);
        let body = body.map(Bytes::from).unwrap_or_default();
        let resp = self
            .signer
            .context()
            .http_send(http::Request::from_parts(parts, body))
            .await?;

        let (parts, body) = resp.into_parts();
        normalize(req, self.observer.as_ref(), parts.status, body)
    }
}
