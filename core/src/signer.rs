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

use crate::{Context, ProvideCredential, Result, SignRequest, SigningCredential};
use log::debug;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Signer is the main struct used to sign the request.
///
/// The first successfully resolved credential is cached and reused for as long
/// as it stays valid. Loading holds the cache lock, so concurrent callers on one
/// signer and its clones wait for a single load instead of racing.
#[derive(Clone, Debug)]
pub struct Signer<K: SigningCredential> {
    ctx: Context,
    loader: Arc<dyn ProvideCredential<Credential = K>>,
    builder: Arc<dyn SignRequest<Credential = K>>,
    credential: Arc<Mutex<Option<K>>>,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer.
    pub fn new(
        ctx: Context,
        loader: impl ProvideCredential<Credential = K>,
        builder: impl SignRequest<Credential = K>,
    ) -> Self {
        Self {
            ctx,

            loader: Arc::new(loader),
            builder: Arc::new(builder),
            credential: Arc::new(Mutex::new(None)),
        }
    }

    /// The context this signer loads credentials with.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Resolve the signing credential, loading it only if nothing valid is cached.
    ///
    /// Returns `None` if the provider has nothing to offer.
    pub async fn credential(&self) -> Result<Option<K>> {
        let mut cached = self.credential.lock().await;
        if cached.is_valid() {
            return Ok(cached.clone());
        }

        let loaded = self.loader.provide_credential(&self.ctx).await?;
        if loaded.is_valid() {
            debug!("credential loaded and cached");
            *cached = loaded.clone();
        } else {
            debug!("no valid credential loaded");
        }
        Ok(loaded)
    }

    /// Signing request.
    pub async fn sign(&self, req: &mut http::request::Parts) -> Result<()> {
        let credential = self.credential().await?;

        self.builder
            .sign_request(&self.ctx, req, credential.as_ref())
            .await
    }
}
