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

mod common;

use common::*;
use http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use semsign_core::{ErrorKind, Result};
use semsign_semantria::{ApiRequest, Client, Config, Credential};
use std::path::Path;
use tempfile::TempDir;

const LOGIN_OK: &str =
    r#"{"id":"fresh-session","custom_params":{"key":"login-key","secret":"login-secret"}}"#;
const REFRESH_OK: &str = r#"{"custom_params":{"key":"cached-key","secret":"cached-secret"}}"#;

fn login_url() -> String {
    format!("{SESSION_ENDPOINT}.json?appkey=app")
}

fn refresh_url(id: &str) -> String {
    format!("{SESSION_ENDPOINT}/{id}.json?appkey=app")
}

fn config(session_file: &Path) -> Config {
    Config::default()
        .with_app_key("app")
        .with_session_endpoint(SESSION_ENDPOINT)
        .with_api_host(API_HOST)
        .with_session_file(session_file.to_string_lossy())
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[tokio::test]
async fn test_preset_credentials_need_no_network() -> Result<()> {
    let http = MockHttpSend::new();
    let client = Client::new(
        context(http.clone()),
        Config::default().with_consumer("K", "S"),
    );

    let cred = client.resolve().await?;

    assert_eq!(cred, Credential::new("K", "S"));
    assert!(http.requests().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_cached_session_is_refreshed_without_login() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("session.dat");
    std::fs::write(&path, r#"{"id":"cached-session"}"#)?;

    let http = MockHttpSend::new()
        .route(Method::GET, &refresh_url("cached-session"), StatusCode::OK, REFRESH_OK)
        .route(Method::POST, &login_url(), StatusCode::OK, LOGIN_OK);
    let client = Client::new(context(http.clone()), config(&path));

    let cred = client.resolve().await?;

    assert_eq!(cred, Credential::new("cached-key", "cached-secret"));
    assert_eq!(http.requests().len(), 1);
    assert_eq!(http.requests()[0].uri, refresh_url("cached-session"));
    assert_eq!(http.count(&Method::POST, SESSION_ENDPOINT), 0);
    assert_eq!(read(&path), r#"{"id":"cached-session"}"#);
    Ok(())
}

#[tokio::test]
async fn test_missing_cache_goes_to_login() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("session.dat");

    let http = MockHttpSend::new().route(Method::POST, &login_url(), StatusCode::OK, LOGIN_OK);
    let client = Client::new(context(http.clone()), config(&path));

    let cred = client.resolve().await?;

    assert_eq!(cred, Credential::new("login-key", "login-secret"));
    let requests = http.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::POST);
    assert_eq!(requests[0].uri, login_url());
    assert_eq!(
        requests[0].body.as_ref(),
        br#"{"username":"unspecified","password":"unspecified"}"#
    );
    assert_eq!(read(&path), r#"{"id":"fresh-session"}"#);
    Ok(())
}

#[tokio::test]
async fn test_login_uses_configured_credentials() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("session.dat");

    let http = MockHttpSend::new().route(Method::POST, &login_url(), StatusCode::OK, LOGIN_OK);
    let client = Client::new(
        context(http.clone()),
        config(&path).with_login("analyst@example.com", "hunter2"),
    );

    client.resolve().await?;

    assert_eq!(
        http.requests()[0].body.as_ref(),
        br#"{"username":"analyst@example.com","password":"hunter2"}"#
    );
    Ok(())
}

#[tokio::test]
async fn test_malformed_cache_is_overwritten_by_login() -> Result<()> {
    for content in ["not json", "{}", r#"{"id":""}"#, r#"{"id":42}"#] {
        let dir = TempDir::new()?;
        let path = dir.path().join("session.dat");
        std::fs::write(&path, content)?;

        let http =
            MockHttpSend::new().route(Method::POST, &login_url(), StatusCode::OK, LOGIN_OK);
        let client = Client::new(context(http.clone()), config(&path));

        let cred = client.resolve().await?;

        assert_eq!(cred, Credential::new("login-key", "login-secret"));
        assert_eq!(http.requests().len(), 1, "cache content: {content}");
        assert_eq!(read(&path), r#"{"id":"fresh-session"}"#);
    }
    Ok(())
}

#[tokio::test]
async fn test_unreadable_cache_is_not_an_error() -> Result<()> {
    // A directory can be neither read nor written as a file.
    let dir = TempDir::new()?;

    let http = MockHttpSend::new().route(Method::POST, &login_url(), StatusCode::OK, LOGIN_OK);
    let client = Client::new(context(http.clone()), config(dir.path()));

    let cred = client.resolve().await?;

    assert_eq!(cred, Credential::new("login-key", "login-secret"));
    assert!(dir.path().is_dir());
    Ok(())
}

#[tokio::test]
async fn test_stale_session_falls_back_to_login() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("session.dat");
    std::fs::write(&path, r#"{"id":"expired-session"}"#)?;

    let http = MockHttpSend::new()
        .route(
            Method::GET,
            &refresh_url("expired-session"),
            StatusCode::NOT_FOUND,
            r#"{"error_message":"session not found"}"#,
        )
        .route(Method::POST, &login_url(), StatusCode::OK, LOGIN_OK);
    let client = Client::new(context(http.clone()), config(&path));

    let cred = client.resolve().await?;

    assert_eq!(cred, Credential::new("login-key", "login-secret"));
    let methods: Vec<Method> = http.requests().into_iter().map(|r| r.method).collect();
    assert_eq!(methods, vec![Method::GET, Method::POST]);
    assert_eq!(read(&path), r#"{"id":"fresh-session"}"#);
    Ok(())
}

#[tokio::test]
async fn test_malformed_refresh_falls_back_to_login() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("session.dat");
    std::fs::write(&path, r#"{"id":"cached-session"}"#)?;

    let http = MockHttpSend::new()
        .route(Method::GET, &refresh_url("cached-session"), StatusCode::OK, "<html>")
        .route(Method::POST, &login_url(), StatusCode::OK, LOGIN_OK);
    let client = Client::new(context(http.clone()), config(&path));

    let cred = client.resolve().await?;

    assert_eq!(cred, Credential::new("login-key", "login-secret"));
    assert_eq!(http.count(&Method::POST, SESSION_ENDPOINT), 1);
    Ok(())
}

#[tokio::test]
async fn test_rejected_login() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("session.dat");

    let http = MockHttpSend::new().route(
        Method::POST,
        &login_url(),
        StatusCode::UNAUTHORIZED,
        r#"{"error_message":"Invalid application key"}"#,
    );
    let client = Client::new(context(http.clone()), config(&path));

    let err = client.resolve().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CredentialDenied);
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert!(err.message().contains("Invalid application key"));
    assert!(err.is_credential_error());
    assert!(!path.exists());
    Ok(())
}

#[tokio::test]
async fn test_login_without_credentials_in_body() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("session.dat");

    let http = MockHttpSend::new().route(
        Method::POST,
        &login_url(),
        StatusCode::OK,
        r#"{"id":"fresh-session"}"#,
    );
    let client = Client::new(context(http), config(&path));

    let err = client.resolve().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    Ok(())
}

#[tokio::test]
async fn test_transport_error_during_refresh_propagates() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("session.dat");
    std::fs::write(&path, r#"{"id":"cached-session"}"#)?;

    // Only login is reachable, refresh hits a dead connection.
    let http = MockHttpSend::new().route(Method::POST, &login_url(), StatusCode::OK, LOGIN_OK);
    let client = Client::new(context(http.clone()), config(&path));

    let err = client.resolve().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(http.count(&Method::POST, SESSION_ENDPOINT), 0);
    Ok(())
}

#[tokio::test]
async fn test_missing_app_key() -> Result<()> {
    let http = MockHttpSend::new();
    let client = Client::new(context(http.clone()), Config::default());

    let err = client.resolve().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert!(http.requests().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_session_is_exchanged_once_per_client() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("session.dat");

    let http = MockHttpSend::new()
        .route(Method::POST, &login_url(), StatusCode::OK, LOGIN_OK)
        .route(Method::GET, &format!("{API_HOST}/status.json"), StatusCode::OK, "{}");
    let client = Client::new(context(http.clone()), config(&path));

    client.run(&ApiRequest::get("status")).await?;
    client.clone().run(&ApiRequest::get("status")).await?;
    client.resolve().await?;

    assert_eq!(http.count(&Method::POST, SESSION_ENDPOINT), 1);
    assert_eq!(http.count(&Method::GET, API_HOST), 2);
    Ok(())
}

#[tokio::test]
async fn test_concurrent_calls_share_one_login() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("session.dat");

    let http = MockHttpSend::new()
        .route(Method::POST, &login_url(), StatusCode::OK, LOGIN_OK)
        .route(Method::GET, &format!("{API_HOST}/status.json"), StatusCode::OK, "{}");
    let client = Client::new(context(http.clone()), config(&path));
    let cloned = client.clone();

    let req = ApiRequest::get("status");
    let (a, b, c) = tokio::join!(client.run(&req), cloned.run(&req), client.resolve());
    a?;
    b?;
    assert_eq!(c?, Credential::new("login-key", "login-secret"));

    assert_eq!(http.count(&Method::POST, SESSION_ENDPOINT), 1);
    assert_eq!(http.count(&Method::GET, API_HOST), 2);
    Ok(())
}
