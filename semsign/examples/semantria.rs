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

use anyhow::Result;
use semsign::semantria::{ApiRequest, ApiResponse, Client, Config, LogObserver};
use semsign::DefaultContext;
use serde_json::json;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // Create a Context from the default implementation
    let ctx = DefaultContext::new().into_context();

    // Load config from SEMANTRIA_* env
    let config = Config::default()
        .with_application_name("semsign-example")
        .from_env(&ctx);

    let client = Client::new(ctx, config).with_observer(LogObserver);

    // Queue a document for analysis
    let req = ApiRequest::post("document").json(json!({
        "id": "semsign-example-1",
        "text": "The support team answered within minutes. Great experience!",
    }))?;
    match client.run(&req).await? {
        ApiResponse::Accepted => println!("document queued"),
        other => println!("unexpected response: {other:?}"),
    }

    // Poll processed documents
    let resp = client
        .run(&ApiRequest::get("document/processed").with_after_response_hook())
        .await?;
    println!("processed: {}", resp.as_json().cloned().unwrap_or_default());

    Ok(())
}
