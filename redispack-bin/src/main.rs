#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]

//! Walks through both facades against a server on the default address.
//!
//! Start `redispack-server` first.

use redispack::clients;
use redispack::collections::{Hash, Set};
use redispack::Result;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
struct Account {
    owner: String,
    balance: i64,
}

pub fn main() -> Result<()> {
    tracing_subscriber::fmt::try_init()?;

    let client = clients::connect_default()?;

    let hash: Hash<u32, String> = Hash::new(&client, "hash");
    println!("set new field: {}", hash.set(&777, &"Hello World!".to_string())?);
    println!("exists: {}", hash.exists(&777)?);
    match hash.get(&777)? {
        Some(value) => println!("(777: {value})"),
        None => println!("(NIL)"),
    }

    hash.setnx(&888, &"EightX3".to_string())?;
    for (key, value) in hash.key_vals()? {
        println!("(Key: {key}, Val: {value})");
    }
    println!("length: {}", hash.len()?);
    println!("deleted: {}", hash.del(&777)?);
    println!("length: {}", hash.len()?);

    // any serde type works as a value
    let accounts: Hash<String, Account> = Hash::new(&client, "accounts");
    accounts.set(
        &"alice".to_string(),
        &Account {
            owner: "Alice".into(),
            balance: 42,
        },
    )?;
    if let Some(account) = accounts.get(&"alice".to_string())? {
        println!("{} has {}", account.owner, account.balance);
    }

    let lhs: Set<String> = Set::new(&client, "lhs");
    let rhs: Set<String> = Set::new(&client, "rhs");
    lhs.add_all(["Hello", "how", "are", "you"].map(String::from))?;
    rhs.add_all(["how", "are", "these?"].map(String::from))?;

    println!("diff: {:?}", lhs.diff(&rhs)?);
    println!("inter: {:?}", lhs.inter(&rhs)?);
    println!("union: {:?}", lhs.union(&rhs)?);

    println!("cleared: {} + {}", lhs.clear()?, rhs.clear()?);

    Ok(())
}
