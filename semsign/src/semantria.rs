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

//! Semantria API support with convenience APIs
//!
//! This module re-exports everything from `semsign-semantria` and adds a
//! ready-to-use client built on the default context.

pub use semsign_semantria::*;

#[cfg(feature = "default-context")]
use crate::{default_context, Signer};

/// Default Semantria signer type.
#[cfg(feature = "default-context")]
pub type DefaultSigner = Signer<Credential>;

/// Create a Semantria client with the default context.
///
/// Unset fields of `config` are filled from `SEMANTRIA_*` environment variables.
///
/// # Example
///
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> semsign_core::Result<()> {
/// use semsign::semantria::{default_client, ApiRequest, Config};
///
/// let client = default_client(Config::default().with_app_key("your-app-key"));
/// let resp = client.run(&ApiRequest::get("status")).await?;
/// println!("{:?}", resp.as_json());
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "default-context")]
pub fn default_client(config: Config) -> Client {
    let ctx = default_context();
    let config = config.from_env(&ctx);
    Client::new(ctx, config)
}

/// Create a Semantria signer with the default context.
///
/// The signer resolves credentials like [`default_client`] does, which is
/// useful for callers that bring their own transport.
#[cfg(feature = "default-context")]
pub fn default_signer(config: Config) -> DefaultSigner {
    let ctx = default_context();
    let config = config.from_env(&ctx);
    Signer::new(ctx, DefaultCredentialProvider::new(config), RequestSigner::new())
}
