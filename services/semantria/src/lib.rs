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

//! Semantria signing implementation for semsign.
//!
//! This crate turns logical Semantria API calls into signed HTTP requests and
//! normalizes the responses, acquiring the consumer key and secret on the way.
//!
//! ## Overview
//!
//! Every request carries OAuth-style query parameters and an `Authorization`
//! header. The signature is an HMAC-SHA1 over the uri-component escaped url,
//! keyed by the hex MD5 digest of the consumer secret.
//!
//! Credentials come from:
//!
//! 1. The consumer key and secret on [`Config`]
//! 2. A session id cached on disk, refreshed against the credential service
//! 3. A login against the credential service, which caches the new session id
//!
//! ## Quick Start
//!
//! ```no_run
//! use semsign_core::{Context, OsEnv, Result};
//! use semsign_fs_tokio::{TokioFileRead, TokioFileWrite};
//! use semsign_http_send_reqwest::ReqwestHttpSend;
//! use semsign_semantria::{ApiRequest, ApiResponse, Client, Config};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let ctx = Context::new()
//!         .with_file_read(TokioFileRead)
//!         .with_file_write(TokioFileWrite)
//!         .with_http_send(ReqwestHttpSend::default())
//!         .with_env(OsEnv);
//!
//!     let config = Config::default()
//!         .with_app_key("your-app-key")
//!         .with_login("analyst@example.com", "password")
//!         .from_env(&ctx);
//!     let client = Client::new(ctx, config);
//!
//!     // Queue a document, processing happens asynchronously.
//!     let queued = client
//!         .run(&ApiRequest::post("document").json(json!({"id": "1", "text": "Great service!"}))?)
//!         .await?;
//!     assert_eq!(queued, ApiResponse::Accepted);
//!
//!     // Poll for results.
//!     let processed = client.run(&ApiRequest::get("document/processed")).await?;
//!     println!("{:?}", processed.as_json());
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! ```bash
//! export SEMANTRIA_CONSUMER_KEY=your-consumer-key
//! export SEMANTRIA_CONSUMER_SECRET=your-consumer-secret
//! # Or, to exchange a session instead:
//! export SEMANTRIA_APP_KEY=your-app-key
//! export SEMANTRIA_USERNAME=analyst@example.com
//! export SEMANTRIA_PASSWORD=password
//! ```

mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod escape;
pub use escape::{
    decode_utf8, encode_uri_component, encode_utf8, escape_uri, escape_utf8, unescape_utf8,
};

mod request;
pub use request::{create_query_string, ApiRequest, UnsignedUrl};

mod sign_request;
pub use sign_request::{build_authorization, compute_signature, RequestSigner};

mod observer;
pub use observer::{LogObserver, NoopObserver, RequestEvent, RequestObserver, ResponseEvent};

mod response;
pub use response::{normalize, ApiResponse};

mod provide_credential;
pub use provide_credential::*;

mod client;
pub use client::Client;
