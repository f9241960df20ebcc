mod support;

use redispack::collections::{Hash, Set};
use std::collections::{HashMap, HashSet};

#[test]
fn set_get_del_scenario() {
    let client = support::connect();
    let h: Hash<i32, String> = Hash::new(&client, "h");

    assert!(h.set(&1, &"a".to_string()).unwrap());
    assert!(!h.set(&1, &"b".to_string()).unwrap());
    assert_eq!(h.get(&1).unwrap(), Some("b".to_string()));
    assert!(h.del(&1).unwrap());
    assert_eq!(h.get(&1).unwrap(), None);
}

#[test]
fn setnx_leaves_existing_value() {
    let client = support::connect();
    let h: Hash<String, u64> = Hash::new(&client, "counters");
    let key = "visits".to_string();

    assert!(h.setnx(&key, &1).unwrap());
    assert!(!h.setnx(&key, &2).unwrap());
    assert_eq!(h.get(&key).unwrap(), Some(1));
}

#[test]
fn del_and_exists() {
    let client = support::connect();
    let h: Hash<u32, String> = Hash::new(&client, "hash");

    assert!(!h.del(&777).unwrap());
    assert!(!h.exists(&777).unwrap());

    h.set(&777, &"Hello World!".to_string()).unwrap();
    assert!(h.exists(&777).unwrap());
    assert!(h.del(&777).unwrap());
    assert!(!h.exists(&777).unwrap());
}

#[test]
fn listings() {
    let client = support::connect();
    let h: Hash<u32, String> = Hash::new(&client, "hash");

    assert_eq!(h.len().unwrap(), 0);
    assert!(h.is_empty().unwrap());
    assert!(h.keys().unwrap().is_empty());
    assert!(h.vals().unwrap().is_empty());
    assert!(h.key_vals().unwrap().is_empty());

    h.set(&777, &"Hello World!".to_string()).unwrap();
    h.setnx(&888, &"EightX3".to_string()).unwrap();

    assert_eq!(h.len().unwrap(), 2);
    assert_eq!(h.keys().unwrap(), HashSet::from([777, 888]));

    let mut vals = h.vals().unwrap();
    vals.sort();
    assert_eq!(vals, vec!["EightX3".to_string(), "Hello World!".to_string()]);

    assert_eq!(
        h.key_vals().unwrap(),
        HashMap::from([
            (777, "Hello World!".to_string()),
            (888, "EightX3".to_string()),
        ])
    );
}

#[test]
fn undecodable_entries_are_dropped() {
    let client = support::connect();
    let strings: Hash<u32, String> = Hash::new(&client, "mixed");
    let numbers: Hash<u32, u64> = Hash::new(&client, "mixed");

    strings.set(&1, &"one".to_string()).unwrap();
    numbers.set(&2, &7).unwrap();

    // present, but not a u64
    assert!(numbers.exists(&1).unwrap());
    assert_eq!(numbers.get(&1).unwrap(), None);

    assert_eq!(numbers.vals().unwrap(), vec![7]);
    assert_eq!(strings.vals().unwrap(), vec!["one".to_string()]);
    assert_eq!(numbers.key_vals().unwrap(), HashMap::from([(2, 7)]));
    assert_eq!(numbers.len().unwrap(), 2);
}

#[test]
fn wrong_type_reads_as_no_effect() {
    let client = support::connect();
    let h: Hash<u32, u32> = Hash::new(&client, "taken");
    let s: Set<u32> = Set::new(&client, "taken");

    assert_eq!(s.add(&1).unwrap(), 1);

    assert!(!h.set(&1, &1).unwrap());
    assert_eq!(h.get(&1).unwrap(), None);
    assert_eq!(h.len().unwrap(), 0);
    assert_eq!(s.members().unwrap(), HashSet::from([1]));
}

#[test]
fn facades_share_one_connection() {
    let client = support::connect();
    let first: Hash<u32, String> = Hash::new(&client, "shared");
    let second = first.clone();
    let other: Hash<u32, String> = Hash::new(&client, "other");

    assert_eq!(second.name(), "shared");

    first.set(&1, &"from first".to_string()).unwrap();
    assert_eq!(second.get(&1).unwrap(), Some("from first".to_string()));
    assert_eq!(other.len().unwrap(), 0);
}

#[test]
fn facades_across_threads() {
    let client = support::connect();

    let handles: Vec<_> = (0..4_u32)
        .map(|worker| {
            let h: Hash<u32, u32> = Hash::new(&client, "workers");
            std::thread::spawn(move || {
                for i in 0..10 {
                    h.set(&(worker * 100 + i), &worker).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let h: Hash<u32, u32> = Hash::new(&client, "workers");
    assert_eq!(h.len().unwrap(), 40);
}
