use async_trait::async_trait;

use crate::{
    domain::{Partition, UserId},
    Result,
};

/// Hexagonal port for the membership/ban ledger.
///
/// Every write must be committed as one unit of work (begin, statement,
/// commit) so a failure never leaves a partial record behind.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Append a record. Duplicates are not rejected.
    async fn insert(&self, partition: Partition, user_id: UserId, username: &str) -> Result<()>;

    /// Id of the first record stored under `username`, if any.
    async fn lookup(&self, partition: Partition, username: &str) -> Result<Option<UserId>>;

    /// Delete the most recently inserted record matching both fields.
    ///
    /// Returns whether a record was removed. Only used to undo an insert whose
    /// follow-up platform call failed.
    async fn retract(&self, partition: Partition, user_id: UserId, username: &str)
        -> Result<bool>;
}
