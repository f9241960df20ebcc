#![allow(dead_code)]

use redispack::{clients, server, SharedClient};
use std::io::{Read, Write};
use std::net::SocketAddr;
use std::sync::mpsc;
use std::thread;
use tokio::net::TcpListener;

/// Run a server on an ephemeral port, on its own thread and runtime.
///
/// The blocking facades cannot be used from inside a Tokio runtime, so the
/// server must not share one with the test.
pub fn start_server() -> SocketAddr {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().unwrap();

        rt.block_on(async move {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();

            server::run(listener, std::future::pending::<()>()).await;
        });
    });

    rx.recv().unwrap()
}

/// A fresh server and a shared client connected to it.
pub fn connect() -> SharedClient {
    let addr = start_server();
    clients::connect(&addr.ip().to_string(), addr.port()).unwrap()
}

/// A stand-in server that answers every request on its first connection with
/// the same raw `reply`, whatever the request was.
pub fn start_canned_server(reply: &'static [u8]) -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        let (mut socket, _) = listener.accept().unwrap();
        let mut buf = [0; 1024];

        while socket.read(&mut buf).is_ok_and(|n| n > 0) {
            if socket.write_all(reply).is_err() {
                break;
            }
        }
    });

    addr
}
