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

// Env values used in semantria services.
pub const SEMANTRIA_CONSUMER_KEY: &str = "SEMANTRIA_CONSUMER_KEY";
pub const SEMANTRIA_CONSUMER_SECRET: &str = "SEMANTRIA_CONSUMER_SECRET";
pub const SEMANTRIA_APP_KEY: &str = "SEMANTRIA_APP_KEY";
pub const SEMANTRIA_USERNAME: &str = "SEMANTRIA_USERNAME";
pub const SEMANTRIA_PASSWORD: &str = "SEMANTRIA_PASSWORD";
pub const SEMANTRIA_SESSION_FILE: &str = "SEMANTRIA_SESSION_FILE";
pub const SEMANTRIA_API_HOST: &str = "SEMANTRIA_API_HOST";
pub const SEMANTRIA_APPLICATION_NAME: &str = "SEMANTRIA_APPLICATION_NAME";

// Defaults.
pub const DEFAULT_API_HOST: &str = "https://api.semantria.com";
pub const DEFAULT_API_VERSION: &str = "4.2";
pub const DEFAULT_FORMAT: &str = "json";
pub const DEFAULT_SESSION_ENDPOINT: &str = "https://semantria.com/auth/session";
pub const DEFAULT_SESSION_FILE: &str = "/tmp/semantria-session.dat";
pub const ANONYMOUS_LOGIN: &str = "unspecified";

// OAuth-style query parameters injected into every signed url.
pub const OAUTH_VERSION: &str = "1.0";
pub const OAUTH_SIGNATURE_METHOD: &str = "HMAC-SHA1";
pub const OAUTH_CONSUMER_KEY_KEY: &str = "oauth_consumer_key";
pub const OAUTH_NONCE_KEY: &str = "oauth_nonce";
pub const OAUTH_SIGNATURE_METHOD_KEY: &str = "oauth_signature_method";
pub const OAUTH_TIMESTAMP_KEY: &str = "oauth_timestamp";
pub const OAUTH_VERSION_KEY: &str = "oauth_version";
pub const OAUTH_SIGNATURE_KEY: &str = "oauth_signature";

// Headers.
pub const X_APP_NAME: &str = "x-app-name";
pub const X_API_VERSION: &str = "x-api-version";

/// Nonces are drawn from `0..NONCE_UPPER_BOUND`.
pub const NONCE_UPPER_BOUND: u32 = 9_999_999;
