mod support;

use redispack::cmd::{HSet, SAdd, SCard, SMembers};
use redispack::collections::Hash;
use redispack::{clients, BlockingClient, Client, Frame};
use bytes::Bytes;

#[test]
fn connect_failure_is_an_error() {
    // grab a free port and release it again
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    assert!(clients::connect("127.0.0.1", port).is_err());
}

#[test]
fn oversized_bulk_reply_is_an_error() {
    let addr = support::start_canned_server(b"$18446744073709551615\r\nabc\r\n");
    let client = clients::connect(&addr.ip().to_string(), addr.port()).unwrap();
    let hash: Hash<u32, String> = Hash::new(&client, "hash");

    assert!(hash.get(&1).is_err());
}

#[test]
fn negative_integer_reply_reads_as_zero() {
    let addr = support::start_canned_server(b":-1\r\n");
    let client = clients::connect(&addr.ip().to_string(), addr.port()).unwrap();
    let hash: Hash<u32, String> = Hash::new(&client, "hash");

    assert_eq!(hash.len().unwrap(), 0);
    // the session survives
    assert!(!hash.exists(&1).unwrap());
}

#[test]
fn ping_pong() {
    let addr = support::start_server();
    let mut client = BlockingClient::connect(addr).unwrap();

    assert_eq!(client.ping(None).unwrap(), "PONG");
    assert_eq!(client.ping(Some("hello".into())).unwrap(), "hello");
}

#[test]
fn sync_commit_returns_replies_in_order() {
    let addr = support::start_server();
    let mut client = BlockingClient::connect(addr).unwrap();

    assert!(client.sync_commit().unwrap().is_empty());

    client.queue(SAdd::new("s", vec!["a".into(), "b".into()])).unwrap();
    client.queue(SCard::new("s")).unwrap();
    client
        .queue(HSet::new("s", "field".into(), "value".into()))
        .unwrap();
    client.queue(SMembers::new("missing")).unwrap();

    let replies = client.sync_commit().unwrap();

    assert_eq!(replies.len(), 4);
    assert_eq!(replies[0], Frame::Integer(2));
    assert_eq!(replies[1], Frame::Integer(2));
    assert!(matches!(&replies[2], Frame::Error(msg) if msg.starts_with("WRONGTYPE")));
    assert_eq!(replies[3], Frame::Array(vec![]));

    // the connection is still usable after an error reply
    client.queue(SCard::new("s")).unwrap();
    assert_eq!(client.sync_commit().unwrap(), vec![Frame::Integer(2)]);
}

#[tokio::test]
async fn async_client_pipelines() {
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { redispack::server::run(listener, std::future::pending::<()>()).await });
        addr
    };
    let mut client = Client::connect(addr).await.unwrap();

    client.queue(SAdd::new("s", vec![Bytes::from("a")])).await.unwrap();
    client.queue(SMembers::new("s")).await.unwrap();

    // ping commits whatever is still queued first
    assert_eq!(client.ping(None).await.unwrap(), "PONG");
    assert!(client.commit().await.unwrap().is_empty());

    client.queue(SMembers::new("s")).await.unwrap();
    assert_eq!(
        client.commit().await.unwrap(),
        vec![Frame::Array(vec![Frame::Bulk(Bytes::from("a"))])]
    );
}
