//! HTTP client for a ballot node.

use crate::channel::TransactionChannel;
use crate::error::WalletError;
use ballot_rpc::handlers::{
    ChairpersonResponse, ProposalsResponse, WinnerNameResponse, WinningProposalResponse,
};
use ballot_rpc::{ProposalInfo, VoterInfo};
use ballot_transactions::{Receipt, SignedTransaction};
use ballot_types::{BallotId, ProposalName, VoterId};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Wraps `reqwest::Client` with the node's URL and provides typed methods
/// for each action the wallet needs.
#[derive(Clone)]
pub struct NodeClient {
    http: reqwest::Client,
    node_url: String,
}

impl NodeClient {
    /// Create a client for the node at `node_url` (e.g. `http://127.0.0.1:7070`).
    pub fn new(node_url: impl Into<String>) -> Result<Self, WalletError> {
        Self::with_timeout(node_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(node_url: impl Into<String>, timeout: Duration) -> Result<Self, WalletError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .build()
            .map_err(|e| WalletError::Node(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            node_url: node_url.into(),
        })
    }

    pub fn node_url(&self) -> &str {
        &self.node_url
    }

    /// Post one action and return the `result` field.
    async fn rpc_call(&self, action: &str, params: Value) -> Result<Value, WalletError> {
        let mut body = params;
        body.as_object_mut()
            .ok_or_else(|| WalletError::Node("params must be a JSON object".into()))?
            .insert("action".to_string(), json!(action));

        debug!(action, url = %self.node_url, "rpc call");
        let response = self
            .http
            .post(&self.node_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    WalletError::Unreachable(format!("request timed out: {e}"))
                } else if e.is_connect() {
                    WalletError::Unreachable(format!("connection failed: {e}"))
                } else {
                    WalletError::Node(format!("request failed: {e}"))
                }
            })?;

        if !response.status().is_success() {
            return Err(WalletError::Node(format!(
                "node returned HTTP {}",
                response.status()
            )));
        }

        let mut json: Value = response
            .json()
            .await
            .map_err(|e| WalletError::Node(format!("invalid JSON response: {e}")))?;

        if let Some(err) = json.get("error").and_then(|e| e.as_str()) {
            let message = err.to_string();
            return Err(match json.get("code").and_then(|c| c.as_str()) {
                Some(code) => WalletError::Rejected {
                    code: code.to_string(),
                    message,
                },
                None => WalletError::Node(message),
            });
        }

        json.get_mut("result")
            .map(Value::take)
            .ok_or_else(|| WalletError::Node(format!("{action}: response has no result")))
    }

    async fn typed_call<T: DeserializeOwned>(
        &self,
        action: &str,
        params: Value,
    ) -> Result<T, WalletError> {
        let result = self.rpc_call(action, params).await?;
        serde_json::from_value(result)
            .map_err(|e| WalletError::Node(format!("invalid {action} response: {e}")))
    }

    pub async fn proposal(
        &self,
        ballot: &BallotId,
        index: usize,
    ) -> Result<ProposalInfo, WalletError> {
        self.typed_call("proposal", json!({ "ballot": ballot, "index": index }))
            .await
    }

    /// One page of hosted ballot ids, plus the cursor for the next page.
    pub async fn ballots(
        &self,
        cursor: Option<&str>,
        count: Option<u32>,
    ) -> Result<(Vec<BallotId>, Option<String>), WalletError> {
        #[derive(serde::Deserialize)]
        struct Page {
            ballots: Vec<BallotId>,
            cursor: Option<String>,
        }
        let page: Page = self
            .typed_call("ballots", json!({ "cursor": cursor, "count": count }))
            .await?;
        Ok((page.ballots, page.cursor))
    }
}

impl TransactionChannel for NodeClient {
    async fn submit(&self, tx: SignedTransaction) -> Result<Receipt, WalletError> {
        self.typed_call("submit", json!({ "transaction": tx })).await
    }

    async fn chairperson(&self, ballot: &BallotId) -> Result<VoterId, WalletError> {
        let resp: ChairpersonResponse = self
            .typed_call("chairperson", json!({ "ballot": ballot }))
            .await?;
        Ok(resp.chairperson)
    }

    async fn proposals(&self, ballot: &BallotId) -> Result<Vec<ProposalInfo>, WalletError> {
        let resp: ProposalsResponse = self
            .typed_call("proposals", json!({ "ballot": ballot }))
            .await?;
        Ok(resp.proposals)
    }

    async fn voter(&self, ballot: &BallotId, voter: &VoterId) -> Result<VoterInfo, WalletError> {
        self.typed_call("voter", json!({ "ballot": ballot, "voter": voter }))
            .await
    }

    async fn winning_proposal(&self, ballot: &BallotId) -> Result<usize, WalletError> {
        let resp: WinningProposalResponse = self
            .typed_call("winning_proposal", json!({ "ballot": ballot }))
            .await?;
        Ok(resp.index)
    }

    async fn winner_name(&self, ballot: &BallotId) -> Result<ProposalName, WalletError> {
        let resp: WinnerNameResponse = self
            .typed_call("winner_name", json!({ "ballot": ballot }))
            .await?;
        Ok(resp.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_node_is_reported() {
        // Port 9 (discard) is not expected to host an HTTP server.
        let client = NodeClient::with_timeout("http://127.0.0.1:9/", Duration::from_secs(2)).unwrap();
        let err = client.winning_proposal(&BallotId::new([1; 20])).await.unwrap_err();
        assert!(matches!(err, WalletError::Unreachable(_)), "{err}");
    }
}
