use crate::clients::SharedClient;
use crate::cmd::{HDel, HExists, HGet, HKeys, HLen, HSet, HSetNx, HVals};
use crate::codec::{decode, encode};
use crate::collections::reply;
use crate::collections::util::sync_commit;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::marker::PhantomData;
use tracing::{debug, instrument};

/// A remote Redis hash seen as a map from `K` to `V`.
///
/// All data lives on the server. Every method is one round trip on the
/// shared connection, apart from [`key_vals`](Hash::key_vals).
///
/// ```no_run
/// use redispack::clients;
/// use redispack::collections::Hash;
///
/// # fn main() -> redispack::Result<()> {
/// let client = clients::connect_default()?;
/// let hash: Hash<u32, String> = Hash::new(&client, "hash");
///
/// assert!(hash.set(&777, &"Hello World!".to_string())?);
/// assert_eq!(hash.get(&777)?.as_deref(), Some("Hello World!"));
/// # Ok(())
/// # }
/// ```
pub struct Hash<K, V> {
    client: SharedClient,
    name: String,
    _types: PhantomData<fn() -> (K, V)>,
}

impl<K, V> Hash<K, V> {
    /// Bind a facade to the hash stored at `name`.
    pub fn new(client: &SharedClient, name: impl ToString) -> Hash<K, V> {
        Hash {
            client: client.clone(),
            name: name.to_string(),
            _types: PhantomData,
        }
    }

    /// The key of the hash on the server.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<K, V> Clone for Hash<K, V> {
    fn clone(&self) -> Self {
        Hash::new(&self.client, &self.name)
    }
}

impl<K, V> fmt::Debug for Hash<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hash").field("name", &self.name).finish()
    }
}

impl<K, V> Hash<K, V>
where
    K: Serialize + DeserializeOwned + Eq + std::hash::Hash,
    V: Serialize + DeserializeOwned,
{
    /// `HSET`: store `value` under `key`.
    ///
    /// Returns `true` if the field is new, `false` if an existing field was
    /// updated.
    pub fn set(&self, key: &K, value: &V) -> crate::Result<bool> {
        let cmd = HSet::new(&self.name, encode(key)?, encode(value)?);
        Ok(reply::is_one(sync_commit(&self.client, cmd)?))
    }

    /// `HSETNX`: store `value` under `key` unless the field already exists.
    ///
    /// Returns `true` if the field was created. On `false` the stored value is
    /// left untouched.
    pub fn setnx(&self, key: &K, value: &V) -> crate::Result<bool> {
        let cmd = HSetNx::new(&self.name, encode(key)?, encode(value)?);
        Ok(reply::is_one(sync_commit(&self.client, cmd)?))
    }

    /// `HGET`: the value stored under `key`.
    ///
    /// `None` when the field is missing, and also when the stored bytes do not
    /// decode as `V`. The two cases cannot be told apart.
    pub fn get(&self, key: &K) -> crate::Result<Option<V>> {
        let cmd = HGet::new(&self.name, encode(key)?);
        let value = reply::bulk(sync_commit(&self.client, cmd)?);

        Ok(value.and_then(|bytes| decode(&bytes)))
    }

    /// `HEXISTS`
    pub fn exists(&self, key: &K) -> crate::Result<bool> {
        let cmd = HExists::new(&self.name, encode(key)?);
        Ok(reply::is_one(sync_commit(&self.client, cmd)?))
    }

    /// `HDEL`: remove `key`. Returns `true` if the field existed.
    pub fn del(&self, key: &K) -> crate::Result<bool> {
        let cmd = HDel::new(&self.name, vec![encode(key)?]);
        Ok(reply::integer(sync_commit(&self.client, cmd)?) > 0)
    }

    /// `HKEYS`: every field that decodes as `K`.
    pub fn keys(&self) -> crate::Result<HashSet<K>> {
        let reply = sync_commit(&self.client, HKeys::new(&self.name))?;

        Ok(reply::bulk_array(reply)
            .iter()
            .filter_map(|bytes| decode(bytes))
            .collect())
    }

    /// `HVALS`: every value that decodes as `V`.
    pub fn vals(&self) -> crate::Result<Vec<V>> {
        let reply = sync_commit(&self.client, HVals::new(&self.name))?;

        Ok(reply::bulk_array(reply)
            .iter()
            .filter_map(|bytes| decode(bytes))
            .collect())
    }

    /// `HLEN`: number of fields, `0` if the hash does not exist.
    pub fn len(&self) -> crate::Result<usize> {
        Ok(reply::integer(sync_commit(&self.client, HLen::new(&self.name))?))
    }

    /// `true` if the hash has no fields.
    pub fn is_empty(&self) -> crate::Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Every field together with its value.
    ///
    /// Reads the keys, then gets each value in its own round trip. This is not
    /// a snapshot: a field removed by someone else in between is skipped, and
    /// values may be newer than the key listing.
    #[instrument(skip(self), fields(hash = %self.name))]
    pub fn key_vals(&self) -> crate::Result<HashMap<K, V>> {
        let keys = self.keys()?;
        debug!(fields = keys.len());

        let mut key_vals = HashMap::with_capacity(keys.len());
        for key in keys {
            if let Some(value) = self.get(&key)? {
                key_vals.insert(key, value);
            }
        }

        Ok(key_vals)
    }
}
