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

use crate::provide_credential::{SessionCredentialProvider, StaticCredentialProvider};
use crate::{Config, Credential};
use async_trait::async_trait;
use log::debug;
use semsign_core::{Context, ProvideCredential, Result};

/// DefaultCredentialProvider resolves credentials the way a configured session expects.
///
/// Resolution order:
///
/// 1. Consumer key and secret set on [`Config`], no I/O at all
/// 2. Session exchange via [`SessionCredentialProvider`]
///
/// Errors from the session exchange are returned as is and never masked.
#[derive(Debug, Clone)]
pub struct DefaultCredentialProvider {
    fixed: Option<StaticCredentialProvider>,
    session: SessionCredentialProvider,
}

impl DefaultCredentialProvider {
    /// Create a new `DefaultCredentialProvider` from config.
    pub fn new(config: Config) -> Self {
        let fixed = config
            .consumer()
            .map(|(key, secret)| StaticCredentialProvider::new(key, secret));

        Self {
            fixed,
            session: SessionCredentialProvider::new(config),
        }
    }
}

#[async_trait]
impl ProvideCredential for DefaultCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        if let Some(fixed) = &self.fixed {
            debug!("using consumer key and secret from config");
            return fixed.provide_credential(ctx).await;
        }

        self.session.provide_credential(ctx).await
    }
}
