use reqwest::Client;
use serde::Serialize;
use anyhow::{Result, anyhow};

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// Talks to the remote chat endpoint
#[derive(Clone, Debug)]
pub struct ChatClient {
    client: Client,
    endpoint: String,
}

impl ChatClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST `{ "message": ... }` and return the reply as display text.
    ///
    /// The reply body is opaque. A JSON string literal is unwrapped, anything
    /// else is returned verbatim.
    pub async fn send(&self, message: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest { message })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Chat request failed with status: {}",
                response.status()
            ));
        }

        let body = response.text().await?;
        Ok(reply_text(body))
    }
}

fn reply_text(body: String) -> String {
    match serde_json::from_str::<String>(&body) {
        Ok(text) => text,
        Err(_) => body,
    }
}
