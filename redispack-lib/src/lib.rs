//! Typed hash and set facades over a Redis connection.
//!
//! The major components are:
//! * `collections`: [`Hash`](collections::Hash) and [`Set`](collections::Set),
//!   the typed facades.
//! * `codec`: conversion between typed values and stored byte strings.
//! * `clients`: the async and blocking clients, and [`clients::connect`].
//! * `cmd`: implementations of the supported Redis commands.
//! * `frame`: represents a single Redis protocol frame.
//! * `server`: an in-memory server for the hash and set commands.

#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]

pub mod clients;
pub use clients::{BlockingClient, Client, SharedClient};

pub mod cmd;
pub use cmd::Command;

pub mod codec;

pub mod collections;

mod connection;
pub use connection::Connection;

pub mod frame;
pub use frame::Frame;

mod db;
use db::Db;

mod parse;
use parse::{Parse, ParseError};

pub mod server;

/// Default host a client connects to.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default port that a redis server listens on.
pub const DEFAULT_PORT: u16 = 6379;

/// simple Error. It should be specifically defined by enum.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T> = std::result::Result<T, Error>;
