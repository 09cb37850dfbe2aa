//! The mutual challenge-response exchange against a real gateway service.

use auction_house::authenticate;
use auction_house::crypto::generate_keypair;
use auction_house::gateway::{ClientRequest, ClientResponse};
use auction_house::{NewAuction, Session, ThreadRng};
use tokio::sync::Mutex;

use crate::common::harness::{GatewayHarness, LocalGateway};

#[tokio::test]
async fn test_full_exchange_authenticates_the_session() {
    let harness = GatewayHarness::new(1).await;
    let caller_key = generate_keypair();
    let session = harness.authenticated_session(&caller_key).await;
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn test_wrong_gateway_key_fails_before_step_four() {
    let harness = GatewayHarness::new(1).await;
    let caller_key = generate_keypair();
    // The caller knows the gateway by a key it does not actually hold.
    let impostor_key = generate_keypair().verifying_key();

    let session = Mutex::new(Session::new());
    let local = LocalGateway {
        gateway: &harness.gateway,
        session: &session,
    };
    let ok = authenticate(&local, &caller_key, &impostor_key, &ThreadRng::new())
        .await
        .unwrap();
    assert!(!ok);
    assert!(!session.into_inner().is_authenticated());
}

#[tokio::test]
async fn test_failed_exchange_leaves_operations_rejected() {
    let harness = GatewayHarness::new(1).await;
    let caller_key = generate_keypair();
    let impostor_key = generate_keypair().verifying_key();

    let session = Mutex::new(Session::new());
    let local = LocalGateway {
        gateway: &harness.gateway,
        session: &session,
    };
    let ok = authenticate(&local, &caller_key, &impostor_key, &ThreadRng::new())
        .await
        .unwrap();
    assert!(!ok);

    let mut session = session.into_inner();
    let response = harness
        .gateway
        .handle_request(
            ClientRequest::CreateAuction {
                request: NewAuction::new(10, 20, "lamp", GatewayHarness::make_user("S")),
            },
            &mut session,
        )
        .await;
    assert!(matches!(response, ClientResponse::Unauthenticated));
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let harness = GatewayHarness::new(1).await;
    let caller_key = generate_keypair();
    let authenticated = harness.authenticated_session(&caller_key).await;
    assert!(authenticated.is_authenticated());

    // A second session over its own "connection" starts unauthenticated.
    let mut fresh = Session::new();
    let response = harness
        .gateway
        .handle_request(ClientRequest::ListActive, &mut fresh)
        .await;
    assert!(matches!(response, ClientResponse::Unauthenticated));
}

#[tokio::test]
async fn test_auth_messages_are_exempt_from_the_session_guard() {
    let harness = GatewayHarness::new(1).await;
    let mut session = Session::new();
    let response = harness
        .gateway
        .handle_request(ClientRequest::RequestChallenge, &mut session)
        .await;
    assert!(matches!(response, ClientResponse::Challenge(_)));
}
