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

use semsign_core::{Context, OsEnv};
use semsign_fs_tokio::{TokioFileRead, TokioFileWrite};
use semsign_http_send_reqwest::ReqwestHttpSend;

/// DefaultContext assembles the context most applications need.
///
/// - files are read and written with `tokio::fs`
/// - requests are sent with `reqwest`
/// - env and home dir come from the running process
#[derive(Debug, Default, Clone)]
pub struct DefaultContext {
    client: reqwest::Client,
}

impl DefaultContext {
    /// Create a default context with a fresh `reqwest::Client`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a default context that sends requests with the given client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build the [`Context`].
    pub fn into_context(self) -> Context {
        Context::new()
            .with_file_read(TokioFileRead)
            .with_file_write(TokioFileWrite)
            .with_http_send(ReqwestHttpSend::new(self.client))
            .with_env(OsEnv)
    }
}

impl From<DefaultContext> for Context {
    fn from(ctx: DefaultContext) -> Self {
        ctx.into_context()
    }
}

/// Shorthand for `DefaultContext::new().into_context()`.
pub fn default_context() -> Context {
    DefaultContext::new().into_context()
}
