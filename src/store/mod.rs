//! Persistence behind the profile routes.
//!
//! Every operation of the service goes through these traits so the
//! routes never see which database holds the documents. Two
//! implementations exist: [`PgStore`] for Postgres and
//! [`MemoryStore`] for tests and throwaway local runs.
use async_trait::async_trait;

use crate::{
  database::Result,
  schema::{Profile, ProfileFields, ProfileView, User},
  types::id::{marker::UserMarker, Id},
};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Entry ids are shared by experience and education entries.
pub type EntryId = Id<crate::types::id::marker::AnyMarker>;

#[async_trait]
pub trait UserStore: Send + Sync {
  async fn find(&self, id: Id<UserMarker>) -> Result<Option<User>>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
  /// Looks up the profile owned by `user`, joined with the owner.
  async fn find_by_owner(&self, user: Id<UserMarker>) -> Result<Option<ProfileView>>;

  /// Looks up the profile owned by `user` as stored, ready to be
  /// modified and written back with [`ProfileStore::save`].
  async fn find_document(&self, user: Id<UserMarker>) -> Result<Option<Profile>>;

  /// Every profile joined with its owner, oldest first.
  async fn find_all(&self) -> Result<Vec<ProfileView>>;

  /// Creates the profile of `fields.user` or overwrites the fields of
  /// the existing one. There is never more than one profile per user.
  async fn upsert(&self, fields: ProfileFields) -> Result<Profile>;

  /// Writes the experience and education lists of a stored profile.
  /// Returns `None` if the profile was removed in the meantime.
  async fn save(&self, profile: &Profile) -> Result<Option<Profile>>;

  /// Returns whether a profile was removed.
  async fn delete_by_owner(&self, user: Id<UserMarker>) -> Result<bool>;

  /// Allocates the id of a new experience or education entry.
  async fn next_entry_id(&self) -> Result<EntryId>;
}

#[async_trait]
pub trait PostStore: Send + Sync {
  /// Removes every post written by `user` and returns how many
  /// were removed.
  async fn delete_by_author(&self, user: Id<UserMarker>) -> Result<u64>;
}

/// Every store the service needs, bundled so a single value can be
/// shared with all workers.
pub trait Store: UserStore + ProfileStore + PostStore + std::fmt::Debug {}

impl<T> Store for T where T: UserStore + ProfileStore + PostStore + std::fmt::Debug {}
