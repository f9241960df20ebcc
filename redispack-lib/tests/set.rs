mod support;

use redispack::collections::Set;
use std::collections::HashSet;

fn strings(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn add_rem_card_scenario() {
    let client = support::connect();
    let s: Set<String> = Set::new(&client, "s");

    assert_eq!(s.add_all(["x", "y", "x"].map(String::from)).unwrap(), 2);
    assert_eq!(s.card().unwrap(), 2);
    assert_eq!(s.rem(&"x".to_string()).unwrap(), 1);
    assert_eq!(s.card().unwrap(), 1);
}

#[test]
fn add_counts_only_new_members() {
    let client = support::connect();
    let s: Set<u32> = Set::new(&client, "numbers");

    assert_eq!(s.add_all(1..=5_u32).unwrap(), 5);
    assert_eq!(s.add_all([4_u32, 5, 6]).unwrap(), 1);
    assert_eq!(s.add(&6).unwrap(), 0);
    assert_eq!(s.rem_all(2..4_u32).unwrap(), 2);
    assert_eq!(s.rem(&42).unwrap(), 0);
    assert_eq!(s.members().unwrap(), HashSet::from([1, 4, 5, 6]));
}

#[test]
fn empty_input_is_a_no_op() {
    let client = support::connect();
    let s: Set<u32> = Set::new(&client, "numbers");

    assert_eq!(s.add_all(Vec::<u32>::new()).unwrap(), 0);
    assert_eq!(s.rem_all(Vec::<u32>::new()).unwrap(), 0);
    assert_eq!(s.card().unwrap(), 0);
}

#[test]
fn membership() {
    let client = support::connect();
    let s: Set<String> = Set::new(&client, "s");

    assert!(!s.is_member(&"x".to_string()).unwrap());
    assert!(s.members().unwrap().is_empty());

    s.add(&"x".to_string()).unwrap();
    assert!(s.is_member(&"x".to_string()).unwrap());
    assert!(!s.is_member(&"y".to_string()).unwrap());
    assert_eq!(s.members().unwrap(), strings(&["x"]));
}

#[test]
fn clear_removes_everything() {
    let client = support::connect();
    let s: Set<String> = Set::new(&client, "s");

    assert_eq!(s.clear().unwrap(), 0);

    s.add_all(["a", "b", "c"].map(String::from)).unwrap();
    assert_eq!(s.clear().unwrap(), 3);
    assert_eq!(s.card().unwrap(), 0);
}

#[test]
fn algebra_scenario() {
    let client = support::connect();
    let lhs: Set<String> = Set::new(&client, "lhs");
    let rhs: Set<String> = Set::new(&client, "rhs");

    lhs.add_all(["Hello", "how", "are", "you"].map(String::from)).unwrap();
    rhs.add_all(["how", "are", "these?"].map(String::from)).unwrap();

    assert_eq!(lhs.diff(&rhs).unwrap(), strings(&["Hello", "you"]));
    assert_eq!(lhs.inter(&rhs).unwrap(), strings(&["how", "are"]));
    assert_eq!(
        lhs.union(&rhs).unwrap(),
        strings(&["Hello", "how", "are", "you", "these?"])
    );
    assert_eq!(rhs.diff(&lhs).unwrap(), strings(&["these?"]));
}

#[test]
fn algebra_with_absent_rhs() {
    let client = support::connect();
    let lhs: Set<String> = Set::new(&client, "lhs");
    let missing: Set<String> = Set::new(&client, "missing");

    lhs.add(&"a".to_string()).unwrap();

    assert_eq!(lhs.diff(&missing).unwrap(), strings(&["a"]));
    assert!(lhs.inter(&missing).unwrap().is_empty());
    assert_eq!(missing.union(&lhs).unwrap(), strings(&["a"]));
}

#[test]
fn algebra_with_other_element_type() {
    let client = support::connect();
    let words: Set<String> = Set::new(&client, "words");
    let numbers: Set<u32> = Set::new(&client, "numbers");

    words.add_all(["a", "b"].map(String::from)).unwrap();
    numbers.add_all([1_u32, 2]).unwrap();

    // the numbers do not decode as strings and the other way around
    assert_eq!(words.union(&numbers).unwrap(), strings(&["a", "b"]));
    assert_eq!(numbers.union(&words).unwrap(), HashSet::from([1, 2]));
    assert_eq!(words.diff(&numbers).unwrap(), strings(&["a", "b"]));
    assert!(words.inter(&numbers).unwrap().is_empty());
}
