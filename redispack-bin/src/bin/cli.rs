#![warn(clippy::pedantic)]

use clap::{Parser, Subcommand};
use redispack::clients;
use redispack::collections::{Hash, Set};
use redispack::{DEFAULT_HOST, DEFAULT_PORT};
use std::fmt::Display;
use std::str;

/// Keys and values are stored as encoded strings, so they can be read back by
/// any program using `Hash<String, String>` or `Set<String>`.
#[derive(Parser, Debug)]
#[command(name = "redispack-cli", version, author, about = "Issue typed hash and set commands")]
struct CliCommand {
    #[clap(subcommand)]
    sub_cmd: Command,

    #[clap(long, default_value = DEFAULT_HOST)]
    host: String,

    #[clap(long, default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// [Ping]: redispack::cmd::Ping
    Ping { echo: Option<String> },
    /// Operate on the hash stored at `name`
    Hash {
        name: String,
        #[clap(subcommand)]
        op: HashOp,
    },
    /// Operate on the set stored at `name`
    Set {
        name: String,
        #[clap(subcommand)]
        op: SetOp,
    },
}

#[derive(Subcommand, Debug)]
enum HashOp {
    Set { key: String, value: String },
    Setnx { key: String, value: String },
    Get { key: String },
    Exists { key: String },
    Del { key: String },
    Keys,
    Vals,
    Len,
    /// Every key with its value
    All,
}

#[derive(Subcommand, Debug)]
enum SetOp {
    Add { members: Vec<String> },
    Rem { members: Vec<String> },
    Card,
    IsMember { member: String },
    Members,
    Clear,
    Diff { other: String },
    Inter { other: String },
    Union { other: String },
}

fn main() -> redispack::Result<()> {
    // Enable logging
    tracing_subscriber::fmt::try_init()?;

    let cmd = CliCommand::parse();

    // The blocking client drives its own runtime, so `main` stays synchronous.
    let client = clients::connect(&cmd.host, cmd.port)?;

    match cmd.sub_cmd {
        Command::Ping { echo } => {
            let bytes = client
                .lock()
                .map_err(|_| "client lock poisoned")?
                .ping(echo.map(Into::into))?;
            if let Ok(string) = str::from_utf8(&bytes) {
                println!("\"{string}\"");
            } else {
                println!("{bytes:?}");
            }
        }
        Command::Hash { name, op } => {
            let hash: Hash<String, String> = Hash::new(&client, name);
            run_hash(&hash, op)?;
        }
        Command::Set { name, op } => {
            let set: Set<String> = Set::new(&client, name);
            run_set(&set, op, &client)?;
        }
    }

    Ok(())
}

fn run_hash(hash: &Hash<String, String>, op: HashOp) -> redispack::Result<()> {
    match op {
        HashOp::Set { key, value } => println!("{}", hash.set(&key, &value)?),
        HashOp::Setnx { key, value } => println!("{}", hash.setnx(&key, &value)?),
        HashOp::Get { key } => match hash.get(&key)? {
            Some(value) => println!("\"{value}\""),
            None => println!("(nil)"),
        },
        HashOp::Exists { key } => println!("{}", hash.exists(&key)?),
        HashOp::Del { key } => println!("{}", hash.del(&key)?),
        HashOp::Keys => print_all(hash.keys()?),
        HashOp::Vals => print_all(hash.vals()?),
        HashOp::Len => println!("{}", hash.len()?),
        HashOp::All => {
            for (key, value) in hash.key_vals()? {
                println!("\"{key}\" => \"{value}\"");
            }
        }
    }

    Ok(())
}

fn run_set(set: &Set<String>, op: SetOp, client: &redispack::SharedClient) -> redispack::Result<()> {
    match op {
        SetOp::Add { members } => println!("{}", set.add_all(&members)?),
        SetOp::Rem { members } => println!("{}", set.rem_all(&members)?),
        SetOp::Card => println!("{}", set.card()?),
        SetOp::IsMember { member } => println!("{}", set.is_member(&member)?),
        SetOp::Members => print_all(set.members()?),
        SetOp::Clear => println!("{}", set.clear()?),
        SetOp::Diff { other } => print_all(set.diff(&Set::<String>::new(client, other))?),
        SetOp::Inter { other } => print_all(set.inter(&Set::<String>::new(client, other))?),
        SetOp::Union { other } => print_all(set.union(&Set::<String>::new(client, other))?),
    }

    Ok(())
}

fn print_all<T: Display>(items: impl IntoIterator<Item = T>) {
    let mut empty = true;
    for (i, item) in items.into_iter().enumerate() {
        println!("{}) \"{item}\"", i + 1);
        empty = false;
    }

    if empty {
        println!("(empty)");
    }
}
