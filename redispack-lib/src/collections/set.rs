use crate::clients::SharedClient;
use crate::cmd::{SAdd, SCard, SIsMember, SMembers, SRem, SetAlgebra, SetOp};
use crate::codec::{decode, encode};
use crate::collections::reply;
use crate::collections::util::{encode_all, sync_commit};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;
use tracing::instrument;

/// A remote Redis set seen as a set of `T`.
///
/// ```no_run
/// use redispack::clients;
/// use redispack::collections::Set;
///
/// # fn main() -> redispack::Result<()> {
/// let client = clients::connect_default()?;
/// let set: Set<String> = Set::new(&client, "set");
///
/// assert_eq!(set.add_all(["x", "y", "x"].map(String::from))?, 2);
/// assert_eq!(set.card()?, 2);
/// # Ok(())
/// # }
/// ```
pub struct Set<T> {
    client: SharedClient,
    name: String,
    _types: PhantomData<fn() -> T>,
}

impl<T> Set<T> {
    /// Bind a facade to the set stored at `name`.
    pub fn new(client: &SharedClient, name: impl ToString) -> Set<T> {
        Set {
            client: client.clone(),
            name: name.to_string(),
            _types: PhantomData,
        }
    }

    /// The key of the set on the server.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T> Clone for Set<T> {
    fn clone(&self) -> Self {
        Set::new(&self.client, &self.name)
    }
}

impl<T> fmt::Debug for Set<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Set").field("name", &self.name).finish()
    }
}

impl<T> Set<T>
where
    T: Serialize + DeserializeOwned + Eq + std::hash::Hash,
{
    /// `SADD` a single member. Returns `1` if it was not present yet.
    pub fn add(&self, member: &T) -> crate::Result<usize> {
        self.add_all(std::iter::once(member))
    }

    /// `SADD` every member of `members` in one command.
    ///
    /// Returns how many were not present yet. Duplicates within `members`
    /// count once. An empty `members` is a no-op that skips the round trip.
    pub fn add_all<I>(&self, members: I) -> crate::Result<usize>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let members = encode_all::<T, _>(members)?;
        if members.is_empty() {
            return Ok(0);
        }

        let cmd = SAdd::new(&self.name, members);
        Ok(reply::integer(sync_commit(&self.client, cmd)?))
    }

    /// `SREM` a single member. Returns `1` if it was present.
    pub fn rem(&self, member: &T) -> crate::Result<usize> {
        self.rem_all(std::iter::once(member))
    }

    /// `SREM` every member of `members` in one command.
    ///
    /// Returns how many were actually removed. An empty `members` is a no-op
    /// that skips the round trip.
    pub fn rem_all<I>(&self, members: I) -> crate::Result<usize>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let members = encode_all::<T, _>(members)?;
        if members.is_empty() {
            return Ok(0);
        }

        let cmd = SRem::new(&self.name, members);
        Ok(reply::integer(sync_commit(&self.client, cmd)?))
    }

    /// `SCARD`: number of members, `0` if the set does not exist.
    pub fn card(&self) -> crate::Result<usize> {
        Ok(reply::integer(sync_commit(&self.client, SCard::new(&self.name))?))
    }

    /// `SISMEMBER`
    pub fn is_member(&self, member: &T) -> crate::Result<bool> {
        let cmd = SIsMember::new(&self.name, encode(member)?);
        Ok(reply::is_one(sync_commit(&self.client, cmd)?))
    }

    /// `SMEMBERS`: every member that decodes as `T`.
    pub fn members(&self) -> crate::Result<HashSet<T>> {
        let reply = sync_commit(&self.client, SMembers::new(&self.name))?;
        Ok(decode_members(reply::bulk_array(reply)))
    }

    /// Remove every member. Returns how many were removed.
    ///
    /// Lists the members, then removes them in a second round trip. Members
    /// added in between survive, and members that do not decode as `T` are
    /// never listed and therefore never removed.
    #[instrument(skip(self), fields(set = %self.name))]
    pub fn clear(&self) -> crate::Result<usize> {
        let members = self.members()?;
        self.rem_all(&members)
    }

    /// `SDIFF`: members of this set that are not in `rhs`.
    ///
    /// `rhs` may hold another element type. The result is computed by the
    /// server and decoded as `T`, members that do not decode are left out.
    pub fn diff<U>(&self, rhs: &Set<U>) -> crate::Result<HashSet<T>> {
        self.combine(SetOp::Diff, &rhs.name)
    }

    /// `SINTER`: members present in both sets, decoded as `T`.
    pub fn inter<U>(&self, rhs: &Set<U>) -> crate::Result<HashSet<T>> {
        self.combine(SetOp::Inter, &rhs.name)
    }

    /// `SUNION`: members present in either set.
    ///
    /// Members of `rhs` that do not decode as `T` are left out.
    pub fn union<U>(&self, rhs: &Set<U>) -> crate::Result<HashSet<T>> {
        self.combine(SetOp::Union, &rhs.name)
    }

    fn combine(&self, op: SetOp, rhs: &str) -> crate::Result<HashSet<T>> {
        let cmd = SetAlgebra::new(op, vec![self.name.clone(), rhs.to_string()]);
        let reply = sync_commit(&self.client, cmd)?;

        Ok(decode_members(reply::bulk_array(reply)))
    }
}

fn decode_members<T>(raw: Vec<bytes::Bytes>) -> HashSet<T>
where
    T: DeserializeOwned + Eq + std::hash::Hash,
{
    raw.iter().filter_map(|bytes| decode(bytes)).collect()
}
