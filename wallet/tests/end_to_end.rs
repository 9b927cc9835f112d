use ballot_rpc::{RpcConfig, RpcServer};
use ballot_types::{BallotId, ProposalName};
use ballot_wallet::{BallotHandle, LocalChannel, NodeClient, Signer, TransactionChannel, WalletError};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

fn names() -> Vec<ProposalName> {
    ["Proposal 1", "Proposal 2", "Proposal 3"]
        .iter()
        .map(|n| ProposalName::new(*n).unwrap())
        .collect()
}

async fn spawn_node() -> (String, oneshot::Sender<()>) {
    let server = RpcServer::new(RpcConfig::default()).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    let (stop, stopped) = oneshot::channel::<()>();
    tokio::spawn(async move {
        server
            .serve(listener, async move {
                let _ = stopped.await;
            })
            .await
            .unwrap();
    });
    (url, stop)
}

/// B votes, then C delegates to B: C's weight lands on B's proposal.
async fn delegate_to_decided_voter<C: TransactionChannel + Clone>(channel: C) {
    let chair = BallotHandle::deploy(channel, Signer::generate(), names())
        .await
        .unwrap();
    let b = chair.with_signer(Signer::generate());
    let c = chair.with_signer(Signer::generate());
    let b_id = b.signer().identity();
    let c_id = c.signer().identity();

    chair.give_right_to_vote(&b_id).await.unwrap();
    chair.give_right_to_vote(&c_id).await.unwrap();

    b.vote(0).await.unwrap();
    assert_eq!(chair.proposals().await.unwrap()[0].vote_count, 1);

    c.delegate(&b_id).await.unwrap();
    assert_eq!(chair.proposals().await.unwrap()[0].vote_count, 2);

    let c_state = c.voter(None).await.unwrap();
    assert!(c_state.voted);
    assert_eq!(c_state.delegate, Some(b_id));
    assert_eq!(chair.winner_name().await.unwrap().as_str(), "Proposal 1");
}

/// B delegates to C, who has not voted: C's weight grows instead.
async fn delegate_to_undecided_voter<C: TransactionChannel + Clone>(channel: C) {
    let chair = BallotHandle::deploy(channel, Signer::generate(), names())
        .await
        .unwrap();
    let b = chair.with_signer(Signer::generate());
    let c = chair.with_signer(Signer::generate());
    let b_id = b.signer().identity();
    let c_id = c.signer().identity();

    chair.give_right_to_vote(&b_id).await.unwrap();
    b.delegate(&c_id).await.unwrap();

    let c_state = chair.voter(Some(&c_id)).await.unwrap();
    assert_eq!(c_state.weight, 1);
    assert!(!c_state.voted);
    assert!(chair.voter(Some(&b_id)).await.unwrap().voted);
    assert!(chair
        .proposals()
        .await
        .unwrap()
        .iter()
        .all(|p| p.vote_count == 0));
}

/// A -> B -> C, then C -> A fails.
async fn delegation_loop_rejected<C: TransactionChannel + Clone>(channel: C) {
    let chair = BallotHandle::deploy(channel, Signer::generate(), names())
        .await
        .unwrap();
    let voters: Vec<_> = (0..3).map(|_| chair.with_signer(Signer::generate())).collect();
    for v in &voters {
        chair.give_right_to_vote(&v.signer().identity()).await.unwrap();
    }
    voters[0].delegate(&voters[1].signer().identity()).await.unwrap();
    voters[1].delegate(&voters[2].signer().identity()).await.unwrap();

    let err = voters[2]
        .delegate(&voters[0].signer().identity())
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::Reverted { ref code, .. } if code == "DelegationLoop"));

    // The final delegate carries all three units and can still vote.
    assert_eq!(voters[2].voter(None).await.unwrap().weight, 3);
    voters[2].vote(2).await.unwrap();
    assert_eq!(chair.proposals().await.unwrap()[2].vote_count, 3);
    assert_eq!(chair.winning_proposal().await.unwrap(), 2);
}

#[tokio::test]
async fn scenarios_in_process() {
    delegate_to_decided_voter(LocalChannel::in_memory()).await;
    delegate_to_undecided_voter(LocalChannel::in_memory()).await;
    delegation_loop_rejected(LocalChannel::in_memory()).await;
}

#[tokio::test]
async fn scenarios_over_http() {
    let (url, stop) = spawn_node().await;
    let client = NodeClient::new(url).unwrap();
    delegate_to_decided_voter(client.clone()).await;
    delegate_to_undecided_voter(client.clone()).await;
    delegation_loop_rejected(client.clone()).await;

    let (ballots, cursor) = client.ballots(None, None).await.unwrap();
    assert_eq!(ballots.len(), 3);
    assert!(cursor.is_none());
    let _ = stop.send(());
}

#[tokio::test]
async fn node_errors_surface_over_http() {
    let (url, stop) = spawn_node().await;
    let client = NodeClient::new(url).unwrap();
    let chair = BallotHandle::deploy(client.clone(), Signer::generate(), names())
        .await
        .unwrap();

    let stranger = chair.with_signer(Signer::generate());
    let err = stranger
        .give_right_to_vote(&Signer::generate().identity())
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::Reverted { ref code, .. } if code == "Unauthorized"));

    let err = client.proposal(chair.id(), 99).await.unwrap_err();
    assert!(matches!(err, WalletError::Rejected { ref code, .. } if code == "InvalidRequest"));
    let _ = stop.send(());
}

/// Node rejections carry the same code over HTTP and in process.
async fn rejection_codes<C: TransactionChannel + Clone>(channel: C) {
    let key = "4444444444444444444444444444444444444444444444444444444444444444";
    let signer = || Signer::from_private_key_hex(key).unwrap();
    let first = BallotHandle::deploy_with_salt(channel.clone(), signer(), names(), 5)
        .await
        .unwrap();

    let err = BallotHandle::deploy_with_salt(channel.clone(), signer(), names(), 5)
        .await
        .unwrap_err();
    assert_eq!(err.rejection_code(), Some("BallotExists"));

    assert_ne!(*first.id(), BallotId::new([0xEE; 20]));
    let missing = BallotHandle::new(channel, signer(), BallotId::new([0xEE; 20]));
    let err = missing.winner_name().await.unwrap_err();
    assert_eq!(err.rejection_code(), Some("BallotNotFound"));
}

#[tokio::test]
async fn rejection_codes_match_across_channels() {
    rejection_codes(LocalChannel::in_memory()).await;

    let (url, stop) = spawn_node().await;
    rejection_codes(NodeClient::new(url).unwrap()).await;
    let _ = stop.send(());
}
