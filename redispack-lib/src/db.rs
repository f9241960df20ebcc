use crate::Frame;
use bytes::Bytes;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Server state shared across all connections.
///
/// `Db` maps each key to either a hash or a set. A key whose collection
/// becomes empty is removed, so an absent key and an empty collection are
/// indistinguishable, as in Redis.
///
/// Cloning `Db` is shallow and only incurs an atomic ref count increment.
#[derive(Debug, Clone, Default)]
pub(crate) struct Db {
    shared: Arc<Mutex<State>>,
}

#[derive(Debug, Default)]
struct State {
    entries: HashMap<String, Value>,
}

#[derive(Debug)]
enum Value {
    Hash(HashMap<Bytes, Bytes>),
    Set(HashSet<Bytes>),
}

/// The key holds a value of the other kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WrongType;

impl From<WrongType> for Frame {
    fn from(_: WrongType) -> Frame {
        Frame::Error("WRONGTYPE Operation against a key holding the wrong kind of value".to_string())
    }
}

impl Db {
    pub(crate) fn new() -> Db {
        Db::default()
    }

    /// Set each field of the hash stored at `key`.
    ///
    /// Returns the number of fields that were newly created.
    pub(crate) fn hset(&self, key: &str, pairs: Vec<(Bytes, Bytes)>) -> Result<usize, WrongType> {
        let mut state = self.shared.lock().unwrap();
        let hash = state.hash_or_insert(key)?;

        Ok(pairs
            .into_iter()
            .map(|(field, value)| hash.insert(field, value))
            .filter(Option::is_none)
            .count())
    }

    /// Set `field` only if it does not exist yet. Returns `true` if it was set.
    pub(crate) fn hsetnx(&self, key: &str, field: Bytes, value: Bytes) -> Result<bool, WrongType> {
        use std::collections::hash_map::Entry;

        let mut state = self.shared.lock().unwrap();

        match state.hash_or_insert(key)?.entry(field) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(e) => {
                e.insert(value);
                Ok(true)
            }
        }
    }

    pub(crate) fn hget(&self, key: &str, field: &Bytes) -> Result<Option<Bytes>, WrongType> {
        let state = self.shared.lock().unwrap();
        // `Bytes::clone` is a shallow clone
        Ok(state.hash(key)?.and_then(|hash| hash.get(field).cloned()))
    }

    pub(crate) fn hexists(&self, key: &str, field: &Bytes) -> Result<bool, WrongType> {
        let state = self.shared.lock().unwrap();
        Ok(state.hash(key)?.is_some_and(|hash| hash.contains_key(field)))
    }

    /// Remove `fields` from the hash. Returns how many of them existed.
    pub(crate) fn hdel(&self, key: &str, fields: &[Bytes]) -> Result<usize, WrongType> {
        let mut state = self.shared.lock().unwrap();

        let Some(hash) = state.hash_mut(key)? else {
            return Ok(0);
        };
        let removed = fields.iter().filter(|field| hash.remove(*field).is_some()).count();
        let now_empty = hash.is_empty();

        if now_empty {
            state.entries.remove(key);
        }

        Ok(removed)
    }

    pub(crate) fn hkeys(&self, key: &str) -> Result<Vec<Bytes>, WrongType> {
        let state = self.shared.lock().unwrap();
        Ok(state
            .hash(key)?
            .map(|hash| hash.keys().cloned().collect())
            .unwrap_or_default())
    }

    pub(crate) fn hvals(&self, key: &str) -> Result<Vec<Bytes>, WrongType> {
        let state = self.shared.lock().unwrap();
        Ok(state
            .hash(key)?
            .map(|hash| hash.values().cloned().collect())
            .unwrap_or_default())
    }

    pub(crate) fn hlen(&self, key: &str) -> Result<usize, WrongType> {
        let state = self.shared.lock().unwrap();
        Ok(state.hash(key)?.map_or(0, HashMap::len))
    }

    /// Add `members` to the set. Returns the number of members that were not
    /// already present.
    pub(crate) fn sadd(&self, key: &str, members: Vec<Bytes>) -> Result<usize, WrongType> {
        let mut state = self.shared.lock().unwrap();
        let set = state.set_or_insert(key)?;

        Ok(members
            .into_iter()
            .map(|member| set.insert(member))
            .filter(|added| *added)
            .count())
    }

    /// Remove `members` from the set. Returns how many of them were present.
    pub(crate) fn srem(&self, key: &str, members: &[Bytes]) -> Result<usize, WrongType> {
        let mut state = self.shared.lock().unwrap();

        let Some(set) = state.set_mut(key)? else {
            return Ok(0);
        };
        let removed = members.iter().filter(|member| set.remove(*member)).count();
        let now_empty = set.is_empty();

        if now_empty {
            state.entries.remove(key);
        }

        Ok(removed)
    }

    pub(crate) fn scard(&self, key: &str) -> Result<usize, WrongType> {
        let state = self.shared.lock().unwrap();
        Ok(state.set(key)?.map_or(0, HashSet::len))
    }

    pub(crate) fn sismember(&self, key: &str, member: &Bytes) -> Result<bool, WrongType> {
        let state = self.shared.lock().unwrap();
        Ok(state.set(key)?.is_some_and(|set| set.contains(member)))
    }

    pub(crate) fn smembers(&self, key: &str) -> Result<Vec<Bytes>, WrongType> {
        let state = self.shared.lock().unwrap();
        Ok(state
            .set(key)?
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }

    /// Members of the first set that are in none of the following sets.
    pub(crate) fn sdiff(&self, keys: &[String]) -> Result<Vec<Bytes>, WrongType> {
        let state = self.shared.lock().unwrap();
        let sets = state.sets(keys)?;

        let Some((Some(first), rest)) = sets.split_first() else {
            return Ok(vec![]);
        };

        Ok(first
            .iter()
            .filter(|member| !rest.iter().flatten().any(|set| set.contains(*member)))
            .cloned()
            .collect())
    }

    /// Members present in every one of the sets. An absent key empties the result.
    pub(crate) fn sinter(&self, keys: &[String]) -> Result<Vec<Bytes>, WrongType> {
        let state = self.shared.lock().unwrap();
        let sets = state.sets(keys)?;

        let Some((Some(first), rest)) = sets.split_first() else {
            return Ok(vec![]);
        };

        Ok(first
            .iter()
            .filter(|member| rest.iter().all(|set| set.is_some_and(|set| set.contains(*member))))
            .cloned()
            .collect())
    }

    pub(crate) fn sunion(&self, keys: &[String]) -> Result<Vec<Bytes>, WrongType> {
        let state = self.shared.lock().unwrap();
        let sets = state.sets(keys)?;

        let union: HashSet<&Bytes> = sets.iter().flatten().flat_map(|set| set.iter()).collect();

        Ok(union.into_iter().cloned().collect())
    }
}

impl State {
    fn hash(&self, key: &str) -> Result<Option<&HashMap<Bytes, Bytes>>, WrongType> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(Value::Hash(hash)) => Ok(Some(hash)),
            Some(Value::Set(_)) => Err(WrongType),
        }
    }

    fn hash_mut(&mut self, key: &str) -> Result<Option<&mut HashMap<Bytes, Bytes>>, WrongType> {
        match self.entries.get_mut(key) {
            None => Ok(None),
            Some(Value::Hash(hash)) => Ok(Some(hash)),
            Some(Value::Set(_)) => Err(WrongType),
        }
    }

    fn hash_or_insert(&mut self, key: &str) -> Result<&mut HashMap<Bytes, Bytes>, WrongType> {
        match self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Value::Hash(HashMap::new()))
        {
            Value::Hash(hash) => Ok(hash),
            Value::Set(_) => Err(WrongType),
        }
    }

    fn set(&self, key: &str) -> Result<Option<&HashSet<Bytes>>, WrongType> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(Value::Set(set)) => Ok(Some(set)),
            Some(Value::Hash(_)) => Err(WrongType),
        }
    }

    fn set_mut(&mut self, key: &str) -> Result<Option<&mut HashSet<Bytes>>, WrongType> {
        match self.entries.get_mut(key) {
            None => Ok(None),
            Some(Value::Set(set)) => Ok(Some(set)),
            Some(Value::Hash(_)) => Err(WrongType),
        }
    }

    fn set_or_insert(&mut self, key: &str) -> Result<&mut HashSet<Bytes>, WrongType> {
        match self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Value::Set(HashSet::new()))
        {
            Value::Set(set) => Ok(set),
            Value::Hash(_) => Err(WrongType),
        }
    }

    /// Look up every key as a set, failing if any of them holds a hash.
    fn sets(&self, keys: &[String]) -> Result<Vec<Option<&HashSet<Bytes>>>, WrongType> {
        keys.iter().map(|key| self.set(key)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(s: &'static str) -> Bytes {
        Bytes::from_static(s.as_bytes())
    }

    fn sorted(mut v: Vec<Bytes>) -> Vec<Bytes> {
        v.sort();
        v
    }

    #[test]
    fn hset_counts_only_new_fields() {
        let db = Db::new();

        assert_eq!(db.hset("h", vec![(b("a"), b("1")), (b("b"), b("2"))]), Ok(2));
        assert_eq!(db.hset("h", vec![(b("a"), b("3"))]), Ok(0));
        assert_eq!(db.hget("h", &b("a")), Ok(Some(b("3"))));
        assert_eq!(db.hlen("h"), Ok(2));
    }

    #[test]
    fn hsetnx_keeps_existing_value() {
        let db = Db::new();

        assert_eq!(db.hsetnx("h", b("a"), b("1")), Ok(true));
        assert_eq!(db.hsetnx("h", b("a"), b("2")), Ok(false));
        assert_eq!(db.hget("h", &b("a")), Ok(Some(b("1"))));
    }

    #[test]
    fn deleting_last_field_removes_key() {
        let db = Db::new();

        db.hset("h", vec![(b("a"), b("1"))]).unwrap();
        assert_eq!(db.hdel("h", &[b("a"), b("missing")]), Ok(1));
        assert_eq!(db.hdel("h", &[b("a")]), Ok(0));

        // the key is free to hold a set now
        assert_eq!(db.sadd("h", vec![b("x")]), Ok(1));
    }

    #[test]
    fn wrong_type_is_reported() {
        let db = Db::new();

        db.sadd("s", vec![b("x")]).unwrap();
        assert_eq!(db.hget("s", &b("x")), Err(WrongType));
        assert_eq!(db.hset("s", vec![(b("a"), b("1"))]), Err(WrongType));
        assert_eq!(db.sunion(&["s".to_string()]).map(sorted), Ok(vec![b("x")]));

        db.hset("h", vec![(b("a"), b("1"))]).unwrap();
        assert_eq!(db.sdiff(&["s".to_string(), "h".to_string()]), Err(WrongType));
    }

    #[test]
    fn set_algebra() {
        let db = Db::new();
        let keys = ["lhs".to_string(), "rhs".to_string()];

        db.sadd("lhs", vec![b("Hello"), b("how"), b("are"), b("you")]).unwrap();
        db.sadd("rhs", vec![b("how"), b("are"), b("these?")]).unwrap();

        assert_eq!(db.sdiff(&keys).map(sorted), Ok(vec![b("Hello"), b("you")]));
        assert_eq!(db.sinter(&keys).map(sorted), Ok(vec![b("are"), b("how")]));
        assert_eq!(
            db.sunion(&keys).map(sorted),
            Ok(vec![b("Hello"), b("are"), b("how"), b("these?"), b("you")])
        );
    }

    #[test]
    fn set_algebra_with_absent_keys() {
        let db = Db::new();

        db.sadd("lhs", vec![b("a")]).unwrap();

        let with_missing = ["lhs".to_string(), "missing".to_string()];
        assert_eq!(db.sdiff(&with_missing), Ok(vec![b("a")]));
        assert_eq!(db.sinter(&with_missing), Ok(vec![]));

        let missing_first = ["missing".to_string(), "lhs".to_string()];
        assert_eq!(db.sdiff(&missing_first), Ok(vec![]));
        assert_eq!(db.sunion(&missing_first), Ok(vec![b("a")]));
    }
}
