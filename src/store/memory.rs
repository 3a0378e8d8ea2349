use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{EntryId, PostStore, ProfileStore, UserStore};
use crate::{
  database::Result,
  schema::{Post, Profile, ProfileFields, ProfileView, User},
  types::id::{marker::Marker, marker::UserMarker, Id},
};

/// Keeps every document in process memory. Nothing survives a
/// restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
  inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
  users: BTreeMap<Id<UserMarker>, User>,
  profiles: BTreeMap<Id<UserMarker>, Profile>,
  posts: Vec<Post>,
  last_user_id: u64,
  last_profile_id: u64,
  last_post_id: u64,
  last_entry_id: u64,
}

fn bump<M: Marker>(counter: &mut u64) -> Id<M> {
  *counter += 1;
  Id::new(*counter)
}

impl Inner {
  fn view(&self, profile: Profile) -> ProfileView {
    let owner = self.users.get(&profile.user).map(User::summary);
    profile.populate(owner)
  }
}

impl MemoryStore {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers a user. Accounts are created elsewhere in a real
  /// deployment; this exists for tests and local runs.
  pub async fn insert_user(&self, name: &str, email: &str, avatar: Option<&str>) -> User {
    let mut inner = self.inner.write().await;
    let user = User {
      id: bump(&mut inner.last_user_id),
      created_at: Utc::now().naive_utc(),
      name: name.to_string(),
      email: email.to_string(),
      password_hash: String::new(),
      avatar: avatar.map(str::to_string),
    };
    inner.users.insert(user.id, user.clone());
    user
  }

  pub async fn insert_post(&self, user: Id<UserMarker>, text: &str) -> Post {
    let mut inner = self.inner.write().await;
    let post = Post {
      id: bump(&mut inner.last_post_id),
      user,
      created_at: Utc::now().naive_utc(),
      text: text.to_string(),
    };
    inner.posts.push(post.clone());
    post
  }

  pub async fn posts_by(&self, user: Id<UserMarker>) -> Vec<Post> {
    let inner = self.inner.read().await;
    inner.posts.iter().filter(|p| p.user == user).cloned().collect()
  }

  pub async fn profile_count(&self) -> usize {
    self.inner.read().await.profiles.len()
  }
}

#[async_trait]
impl UserStore for MemoryStore {
  async fn find(&self, id: Id<UserMarker>) -> Result<Option<User>> {
    Ok(self.inner.read().await.users.get(&id).cloned())
  }
}

#[async_trait]
impl ProfileStore for MemoryStore {
  async fn find_by_owner(&self, user: Id<UserMarker>) -> Result<Option<ProfileView>> {
    let inner = self.inner.read().await;
    Ok(inner.profiles.get(&user).cloned().map(|p| inner.view(p)))
  }

  async fn find_document(&self, user: Id<UserMarker>) -> Result<Option<Profile>> {
    Ok(self.inner.read().await.profiles.get(&user).cloned())
  }

  async fn find_all(&self) -> Result<Vec<ProfileView>> {
    let inner = self.inner.read().await;
    let mut profiles = inner.profiles.values().cloned().collect::<Vec<_>>();
    profiles.sort_by_key(|p| p.id);
    Ok(profiles.into_iter().map(|p| inner.view(p)).collect())
  }

  async fn upsert(&self, fields: ProfileFields) -> Result<Profile> {
    let mut guard = self.inner.write().await;
    let inner = &mut *guard;
    let now = Utc::now().naive_utc();

    let profile = if let Some(existing) = inner.profiles.get(&fields.user).cloned() {
      Profile {
        company: fields.company,
        location: fields.location,
        website: fields.website,
        bio: fields.bio,
        skills: fields.skills,
        status: fields.status,
        githubusername: fields.githubusername,
        social: fields.social,
        updated_at: Some(now),
        ..existing
      }
    } else {
      Profile {
        id: bump(&mut inner.last_profile_id),
        user: fields.user,
        company: fields.company,
        location: fields.location,
        website: fields.website,
        bio: fields.bio,
        skills: fields.skills,
        status: fields.status,
        githubusername: fields.githubusername,
        social: fields.social,
        experience: Vec::new(),
        education: Vec::new(),
        created_at: now,
        updated_at: None,
      }
    };

    inner.profiles.insert(profile.user, profile.clone());
    Ok(profile)
  }

  async fn save(&self, profile: &Profile) -> Result<Option<Profile>> {
    let mut inner = self.inner.write().await;
    Ok(inner.profiles.get_mut(&profile.user).map(|stored| {
      stored.experience = profile.experience.clone();
      stored.education = profile.education.clone();
      stored.updated_at = Some(Utc::now().naive_utc());
      stored.clone()
    }))
  }

  async fn delete_by_owner(&self, user: Id<UserMarker>) -> Result<bool> {
    Ok(self.inner.write().await.profiles.remove(&user).is_some())
  }

  async fn next_entry_id(&self) -> Result<EntryId> {
    Ok(bump(&mut self.inner.write().await.last_entry_id))
  }
}

#[async_trait]
impl PostStore for MemoryStore {
  async fn delete_by_author(&self, user: Id<UserMarker>) -> Result<u64> {
    let mut inner = self.inner.write().await;
    let before = inner.posts.len();
    inner.posts.retain(|p| p.user != user);
    Ok((before - inner.posts.len()) as u64)
  }
}
