//! JSON-RPC quote source for Uniswap-V2-style routers.

use crate::abi::{decode_amounts, decode_hex, encode_get_amounts_out};
use crate::{QuoteError, QuoteSource};
use async_trait::async_trait;
use scanner_core::Address;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::trace;

#[derive(Debug, Serialize)]
struct CallObject {
    to: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: (CallObject, &'a str),
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<JsonRpcErrorObject>,
}

/// Calls `getAmountsOut` via `eth_call` against a network's RPC endpoint.
pub struct RpcQuoteSource {
    client: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl RpcQuoteSource {
    /// `timeout` bounds each request, including connect.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, QuoteError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| QuoteError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    async fn eth_call(&self, to: Address, data: &[u8]) -> Result<Vec<u8>, QuoteError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method: "eth_call",
            params: (
                CallObject {
                    to: to.to_string(),
                    data: format!("0x{}", hex::encode(data)),
                },
                "latest",
            ),
        };

        let response = self.client.post(&self.url).json(&request).send().await?;
        if !response.status().is_success() {
            return Err(QuoteError::Transport(format!("HTTP {}", response.status())));
        }

        let body: JsonRpcResponse = response.json().await?;
        if let Some(err) = body.error {
            return Err(QuoteError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        let result = body
            .result
            .ok_or_else(|| QuoteError::Malformed("response has neither result nor error".into()))?;
        decode_hex(&result)
    }
}

#[async_trait]
impl QuoteSource for RpcQuoteSource {
    async fn amounts_out(
        &self,
        router: Address,
        token_in: Address,
        token_out: Address,
        amount_in: u128,
    ) -> Result<u128, QuoteError> {
        let calldata = encode_get_amounts_out(amount_in, &[token_in, token_out]);
        let output = self.eth_call(router, &calldata).await?;
        let amounts = decode_amounts(&output)?;

        trace!(router = %router, amounts = ?amounts, "getAmountsOut");

        if amounts.len() < 2 {
            return Err(QuoteError::Malformed(format!(
                "expected at least 2 amounts, got {}",
                amounts.len()
            )));
        }
        Ok(amounts[amounts.len() - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: 7,
            method: "eth_call",
            params: (
                CallObject {
                    to: Address::ZERO.to_string(),
                    data: "0xd06ca61f".into(),
                },
                "latest",
            ),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["method"], "eth_call");
        assert_eq!(json["id"], 7);
        assert_eq!(json["params"][0]["to"], "0x0000000000000000000000000000000000000000");
        assert_eq!(json["params"][0]["data"], "0xd06ca61f");
        assert_eq!(json["params"][1], "latest");
    }

    #[test]
    fn test_response_parsing() {
        let ok: JsonRpcResponse = serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":"0x00"}"#).unwrap();
        assert_eq!(ok.result.as_deref(), Some("0x00"));
        assert!(ok.error.is_none());

        let reverted: JsonRpcResponse = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":3,"message":"execution reverted"}}"#,
        )
        .unwrap();
        let err = reverted.error.unwrap();
        assert_eq!(err.code, 3);
        assert_eq!(err.message, "execution reverted");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        // Port 9 (discard) on localhost is not an HTTP server.
        let source = RpcQuoteSource::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let err = source
            .amounts_out(Address::ZERO, Address::ZERO, Address::ZERO, 1)
            .await
            .unwrap_err();
        assert!(err.is_unreachable(), "unexpected error: {err}");
    }
}
