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
use crate::credential::Credential;
use crate::escape::{encode_uri_component, escape_uri};
use crate::request::{upsert_param, UnsignedUrl};
use async_trait::async_trait;
use http::header::AUTHORIZATION;
use http::HeaderValue;
use log::debug;
use rand::Rng;
use semsign_core::hash::{base64_hmac_sha1, hex_md5};
use semsign_core::time::now_millis;
use semsign_core::{Context, Error, Result, SignRequest};

/// RequestSigner for Semantria OAuth-style signature.
///
/// Signing injects `oauth_consumer_key`, `oauth_nonce`, `oauth_signature_method`,
/// `oauth_timestamp` and `oauth_version` into the query, rewrites the request uri
/// to the resulting signed url and sets the `Authorization` header.
///
/// The signature covers the unescaped signed url. It is taken from an
/// [`UnsignedUrl`] in the request extensions when present, otherwise from the
/// request uri as is.
#[derive(Debug, Default)]
pub struct RequestSigner {
    nonce: Option<u32>,
    timestamp: Option<i64>,
}

impl RequestSigner {
    /// Create a new signer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the nonce.
    ///
    /// # Note
    ///
    /// We should always take a random nonce to sign requests.
    /// Only use this function for testing.
    pub fn with_nonce(mut self, nonce: u32) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Specify the signing timestamp in milliseconds.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    fn get_nonce(&self) -> u32 {
        self.nonce
            .unwrap_or_else(|| rand::thread_rng().gen_range(0..NONCE_UPPER_BOUND))
    }

    fn get_timestamp(&self) -> i64 {
        self.timestamp.unwrap_or_else(now_millis)
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _ctx: &Context,
        req: &mut http::request::Parts,
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Err(Error::config_invalid(
                "consumer key and secret are required to sign requests",
            ));
        };

        let nonce = self.get_nonce().to_string();
        let timestamp = self.get_timestamp().to_string();

        let unsigned = match req.extensions.remove::<UnsignedUrl>() {
            Some(url) => url,
            None => split_uri(&req.uri)?,
        };
        let UnsignedUrl { base, mut params } = unsigned;
        for (k, v) in [
            (OAUTH_CONSUMER_KEY_KEY, cred.consumer_key.as_str()),
            (OAUTH_NONCE_KEY, nonce.as_str()),
            (OAUTH_SIGNATURE_METHOD_KEY, OAUTH_SIGNATURE_METHOD),
            (OAUTH_TIMESTAMP_KEY, timestamp.as_str()),
            (OAUTH_VERSION_KEY, OAUTH_VERSION),
        ] {
            upsert_param(&mut params, k.to_string(), Some(v.to_string()));
        }

        let signed_url = UnsignedUrl { base, params }.to_string();
        let signature = compute_signature(&cred.consumer_secret, &signed_url);
        debug!("signed url: {signed_url}");

        req.uri = escape_uri(&signed_url).parse()?;

        let mut value: HeaderValue =
            build_authorization(&nonce, &cred.consumer_key, &timestamp, &signature).parse()?;
        value.set_sensitive(true);
        req.headers.insert(AUTHORIZATION, value);

        Ok(())
    }
}

/// Compute the request signature for a signed url.
///
/// The signing key is the hex MD5 digest of the consumer secret. The url is
/// uri-component escaped, HMAC-SHA1 signed, base64 encoded and escaped again.
pub fn compute_signature(consumer_secret: &str, signed_url: &str) -> String {
    let key = hex_md5(consumer_secret.as_bytes());
    let signature = base64_hmac_sha1(
        key.as_bytes(),
        encode_uri_component(signed_url).as_bytes(),
    );
    encode_uri_component(&signature)
}

/// Build the `Authorization` header value.
///
/// Version and signature method go unquoted, everything else is quoted.
pub fn build_authorization(
    nonce: &str,
    consumer_key: &str,
    timestamp: &str,
    signature: &str,
) -> String {
    format!(
        "OAuth,{OAUTH_VERSION_KEY}={OAUTH_VERSION},\
         {OAUTH_SIGNATURE_METHOD_KEY}={OAUTH_SIGNATURE_METHOD},\
         {OAUTH_NONCE_KEY}=\"{nonce}\",\
         {OAUTH_CONSUMER_KEY_KEY}=\"{consumer_key}\",\
         {OAUTH_TIMESTAMP_KEY}=\"{timestamp}\",\
         {OAUTH_SIGNATURE_KEY}=\"{signature}\""
    )
}

/// Split a uri into `scheme://authority/path` and its query pairs.
fn split_uri(uri: &http::Uri) -> Result<UnsignedUrl> {
    let (Some(scheme), Some(authority)) = (uri.scheme_str(), uri.authority()) else {
        return Err(Error::request_invalid(format!(
            "request uri must be absolute: {uri}"
        )));
    };

    let params = uri
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.to_string(), Some(v.to_string())),
            None => (pair.to_string(), Some(String::new())),
        })
        .collect();

    Ok(UnsignedUrl {
        base: format!("{scheme}://{authority}{}", uri.path()),
        params,
    })
}
