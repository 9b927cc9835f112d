use ballot_crypto::{derive_voter_id, keypair_from_seed};
use ballot_rpc::{RpcConfig, RpcServer};
use ballot_transactions::{BallotCall, SignedTransaction};
use ballot_types::{BallotId, KeyPair, ProposalName};
use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

struct TestNode {
    url: String,
    http: reqwest::Client,
    stop: Option<oneshot::Sender<()>>,
    task: tokio::task::JoinHandle<()>,
}

impl TestNode {
    async fn start(config: RpcConfig) -> Self {
        let server = RpcServer::new(config).unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            server
                .serve(listener, async move {
                    let _ = stopped.await;
                })
                .await
                .unwrap();
        });
        Self {
            url: format!("http://{addr}/"),
            http: reqwest::Client::new(),
            stop: Some(stop),
            task,
        }
    }

    async fn call(&self, body: Value) -> Value {
        self.http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    async fn submit(&self, tx: &SignedTransaction) -> Value {
        self.call(json!({ "action": "submit", "transaction": tx }))
            .await
    }

    async fn shutdown(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        self.task.await.unwrap();
    }
}

fn keys(seed: u8) -> KeyPair {
    keypair_from_seed(&[seed; 32])
}

fn deploy(chair: &KeyPair) -> SignedTransaction {
    let proposals = ["Proposal 1", "Proposal 2"]
        .map(|n| ProposalName::new(n).unwrap())
        .to_vec();
    SignedTransaction::sign(None, BallotCall::Deploy { proposals, salt: 0 }, chair).unwrap()
}

fn signed(ballot: BallotId, call: BallotCall, keys: &KeyPair) -> SignedTransaction {
    SignedTransaction::sign(Some(ballot), call, keys).unwrap()
}

#[tokio::test]
async fn full_ballot_over_http() {
    let node = TestNode::start(RpcConfig::default()).await;
    let (chair, b, c) = (keys(1), keys(2), keys(3));
    let b_id = derive_voter_id(&b.public);
    let c_id = derive_voter_id(&c.public);

    let receipt = node.submit(&deploy(&chair)).await;
    assert_eq!(receipt["result"]["status"], "applied");
    let ballot: BallotId = receipt["result"]["ballot"].as_str().unwrap().parse().unwrap();

    for voter in [b_id, c_id] {
        let r = node
            .submit(&signed(ballot, BallotCall::GiveRightToVote { voter }, &chair))
            .await;
        assert_eq!(r["result"]["status"], "applied");
    }
    node.submit(&signed(ballot, BallotCall::Vote { proposal: 1 }, &b))
        .await;
    let r = node
        .submit(&signed(ballot, BallotCall::Delegate { to: b_id }, &c))
        .await;
    assert_eq!(r["result"]["status"], "applied");

    let proposals = node
        .call(json!({ "action": "proposals", "ballot": ballot }))
        .await;
    assert_eq!(proposals["result"]["proposals"][1]["vote_count"], 2);
    assert_eq!(proposals["result"]["proposals"][1]["name"], "Proposal 2");

    let winner = node
        .call(json!({ "action": "winner_name", "ballot": ballot }))
        .await;
    assert_eq!(winner["result"]["name"], "Proposal 2");

    let voter = node
        .call(json!({ "action": "voter", "ballot": ballot, "voter": c_id }))
        .await;
    assert_eq!(voter["result"]["voted"], true);
    assert_eq!(voter["result"]["delegate"], json!(b_id));

    let chairperson = node
        .call(json!({ "action": "chairperson", "ballot": ballot }))
        .await;
    assert_eq!(
        chairperson["result"]["chairperson"],
        json!(derive_voter_id(&chair.public))
    );

    node.shutdown().await;
}

#[tokio::test]
async fn reverted_and_failed_requests() {
    let node = TestNode::start(RpcConfig::default()).await;
    let chair = keys(1);
    let receipt = node.submit(&deploy(&chair)).await;
    let ballot: BallotId = receipt["result"]["ballot"].as_str().unwrap().parse().unwrap();

    let r = node
        .submit(&signed(ballot, BallotCall::Delegate { to: derive_voter_id(&chair.public) }, &chair))
        .await;
    assert_eq!(r["result"]["status"], "reverted");
    assert_eq!(r["result"]["code"], "SelfDelegation");

    let r = node
        .call(json!({ "action": "proposal", "ballot": ballot, "index": 7 }))
        .await;
    assert_eq!(r["code"], "InvalidRequest");

    let r = node
        .call(json!({ "action": "winner_name", "ballot": BallotId::new([9; 20]) }))
        .await;
    assert_eq!(r["code"], "BallotNotFound");

    let r = node.call(json!({ "action": "shutdown" })).await;
    assert_eq!(r["code"], "InvalidRequest");

    node.shutdown().await;
}

#[tokio::test]
async fn ballots_are_listed_and_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let config = RpcConfig {
        state_dir: Some(dir.path().to_path_buf()),
        ..RpcConfig::default()
    };

    let node = TestNode::start(config.clone()).await;
    for seed in 1..=3 {
        node.submit(&deploy(&keys(seed))).await;
    }
    let page = node
        .call(json!({ "action": "ballots", "count": 2 }))
        .await;
    assert_eq!(page["result"]["ballots"].as_array().unwrap().len(), 2);
    let cursor = page["result"]["cursor"].as_str().unwrap().to_string();
    let rest = node
        .call(json!({ "action": "ballots", "count": 2, "cursor": cursor }))
        .await;
    assert_eq!(rest["result"]["ballots"].as_array().unwrap().len(), 1);
    assert!(rest["result"].get("cursor").is_none());
    node.shutdown().await;

    let reopened = TestNode::start(config).await;
    let all = reopened.call(json!({ "action": "ballots" })).await;
    assert_eq!(all["result"]["ballots"].as_array().unwrap().len(), 3);
    reopened.shutdown().await;
}

#[tokio::test]
async fn health_reports_ballot_count() {
    let node = TestNode::start(RpcConfig::default()).await;
    node.submit(&deploy(&keys(1))).await;
    let health: Value = node
        .http
        .get(format!("{}health", node.url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["ballots"], 1);
    node.shutdown().await;
}
