// RPC client for making JSON-RPC requests against a network node
use reqwest::Client;
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::SextantError;

pub struct RpcClient {
    network: String,
    url: String,
    client: Client,
    request_id: AtomicU64,
}

impl RpcClient {
    pub fn new(network: String, url: String) -> Self {
        Self {
            network,
            url,
            client: Client::new(),
            request_id: AtomicU64::new(1),
        }
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, SextantError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);

        let request = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": id,
        });

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SextantError::Client(format!("RPC request failed: {}", e)))?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SextantError::Client(format!("Failed to parse response: {}", e)))?;

        if let Some(error) = body.get("error") {
            let message = error["message"].as_str().unwrap_or("Unknown error");
            return Err(SextantError::Client(message.to_string()));
        }

        Ok(body["result"].clone())
    }

    pub async fn chain_height(&self) -> Result<u64, SextantError> {
        let result = self.call("getChainHeight", json!({})).await?;
        Ok(result["height"].as_u64().unwrap_or(0))
    }

    pub async fn submit_transfer(
        &self,
        from: &str,
        to: &str,
        amount: u64,
        signature_hex: &str,
    ) -> Result<String, SextantError> {
        let result = self
            .call(
                "submitTransfer",
                json!({
                    "from": from,
                    "to": to,
                    "amount": amount,
                    "signature": signature_hex,
                }),
            )
            .await?;
        Ok(result["txid"].as_str().unwrap_or_default().to_string())
    }
}
