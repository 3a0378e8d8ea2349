use async_trait::async_trait;
use chrono::NaiveDateTime;
use error_stack::{Report, ResultExt};
use sqlx::{types::Json, FromRow};

use super::{EntryId, PostStore, ProfileStore, UserStore};
use crate::{
  config,
  database::{self, ErrorExt, ErrorExt2, Pool, PoolConnection, Result},
  schema::{Education, Experience, Profile, ProfileFields, ProfileView, Social, User, UserSummary},
  types::id::{
    marker::{ProfileMarker, UserMarker},
    Id,
  },
};

/// Postgres backed store. Reads go to the replica when one is
/// configured and healthy.
#[derive(Debug, Clone)]
pub struct PgStore {
  primary: Pool,
  replica: Option<Pool>,
}

impl PgStore {
  #[tracing::instrument(skip_all, name = "store.postgres.connect")]
  pub async fn connect(cfg: &config::Database) -> Result<Self> {
    let primary = Pool::new(cfg, &cfg.primary).await?;
    let replica = if let Some(replica) = cfg.replica.as_ref() {
      Some(Pool::new(cfg, replica).await?)
    } else {
      None
    };
    Ok(Self { primary, replica })
  }

  pub async fn migrate(&self) -> Result<()> {
    self.primary.migrate().await
  }

  async fn db_write(&self) -> Result<PoolConnection> {
    self.primary.get().await
  }

  async fn db_read(&self) -> Result<PoolConnection> {
    if let Some(replica) = self.replica.as_ref() {
      match replica.get().await {
        Ok(conn) => return Ok(conn),
        // fallback
        Err(err) if err.is_unhealthy() => {
          tracing::warn!("read replica is unhealthy, reading from primary");
        },
        Err(err) => return Err(err),
      }
    }
    self.primary.get().await
  }
}

#[derive(FromRow)]
struct ProfileRow {
  id: Id<ProfileMarker>,
  user_id: Id<UserMarker>,
  created_at: NaiveDateTime,
  updated_at: Option<NaiveDateTime>,
  company: Option<String>,
  location: Option<String>,
  website: Option<String>,
  bio: Option<String>,
  status: String,
  githubusername: Option<String>,
  skills: Json<Vec<String>>,
  social: Json<Social>,
  experience: Json<Vec<Experience>>,
  education: Json<Vec<Education>>,
}

#[derive(FromRow)]
struct ProfileViewRow {
  #[sqlx(flatten)]
  profile: ProfileRow,
  user_name: Option<String>,
  user_avatar: Option<String>,
}

impl From<ProfileRow> for Profile {
  fn from(row: ProfileRow) -> Self {
    Self {
      id: row.id,
      user: row.user_id,
      company: row.company,
      location: row.location,
      website: row.website,
      bio: row.bio,
      skills: row.skills.0,
      status: row.status,
      githubusername: row.githubusername,
      social: row.social.0,
      experience: row.experience.0,
      education: row.education.0,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}

impl From<ProfileViewRow> for ProfileView {
  fn from(row: ProfileViewRow) -> Self {
    let profile = Profile::from(row.profile);
    let owner = row.user_name.map(|name| UserSummary {
      id: profile.user,
      name,
      avatar: row.user_avatar,
    });
    profile.populate(owner)
  }
}

const SELECT_VIEW: &str = r#"SELECT p.*, u.name AS user_name, u.avatar AS user_avatar
  FROM "profiles" p LEFT JOIN "users" u ON u.id = p.user_id"#;

#[async_trait]
impl UserStore for PgStore {
  #[tracing::instrument(skip(self, id), fields(id = "<hidden>"), name = "store.users.find")]
  async fn find(&self, id: Id<UserMarker>) -> Result<Option<User>> {
    let mut conn = self.db_read().await?;
    sqlx::query_as::<_, User>(r#"SELECT * FROM "users" WHERE id = $1"#)
      .bind(id)
      .fetch_optional(&mut *conn)
      .await
      .into_db_error()
  }
}

#[async_trait]
impl ProfileStore for PgStore {
  #[tracing::instrument(skip(self, user), fields(user = "<hidden>"), name = "store.profiles.find_by_owner")]
  async fn find_by_owner(&self, user: Id<UserMarker>) -> Result<Option<ProfileView>> {
    let mut conn = self.db_read().await?;
    let row = sqlx::query_as::<_, ProfileViewRow>(&format!("{SELECT_VIEW} WHERE p.user_id = $1"))
      .bind(user)
      .fetch_optional(&mut *conn)
      .await
      .into_db_error()?;

    Ok(row.map(ProfileView::from))
  }

  #[tracing::instrument(skip(self, user), fields(user = "<hidden>"), name = "store.profiles.find_document")]
  async fn find_document(&self, user: Id<UserMarker>) -> Result<Option<Profile>> {
    // read-modify-write cycles must see the latest document
    let mut conn = self.db_write().await?;
    let row = sqlx::query_as::<_, ProfileRow>(r#"SELECT * FROM "profiles" WHERE user_id = $1"#)
      .bind(user)
      .fetch_optional(&mut *conn)
      .await
      .into_db_error()?;

    Ok(row.map(Profile::from))
  }

  #[tracing::instrument(skip(self), name = "store.profiles.find_all")]
  async fn find_all(&self) -> Result<Vec<ProfileView>> {
    let mut conn = self.db_read().await?;
    let rows = sqlx::query_as::<_, ProfileViewRow>(&format!("{SELECT_VIEW} ORDER BY p.id"))
      .fetch_all(&mut *conn)
      .await
      .into_db_error()?;

    Ok(rows.into_iter().map(ProfileView::from).collect())
  }

  #[tracing::instrument(skip_all, name = "store.profiles.upsert")]
  async fn upsert(&self, fields: ProfileFields) -> Result<Profile> {
    let mut conn = self.db_write().await?;
    let row = sqlx::query_as::<_, ProfileRow>(
      r#"INSERT INTO "profiles"
           (user_id, company, location, website, bio, status, githubusername, skills, social)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         ON CONFLICT (user_id) DO UPDATE SET
           company = EXCLUDED.company,
           location = EXCLUDED.location,
           website = EXCLUDED.website,
           bio = EXCLUDED.bio,
           status = EXCLUDED.status,
           githubusername = EXCLUDED.githubusername,
           skills = EXCLUDED.skills,
           social = EXCLUDED.social,
           updated_at = (now() AT TIME ZONE 'utc')
         RETURNING *"#,
    )
    .bind(fields.user)
    .bind(fields.company)
    .bind(fields.location)
    .bind(fields.website)
    .bind(fields.bio)
    .bind(fields.status)
    .bind(fields.githubusername)
    .bind(Json(fields.skills))
    .bind(Json(fields.social))
    .fetch_one(&mut *conn)
    .await
    .into_db_error()?;

    Ok(row.into())
  }

  #[tracing::instrument(skip_all, name = "store.profiles.save")]
  async fn save(&self, profile: &Profile) -> Result<Option<Profile>> {
    let mut conn = self.db_write().await?;
    let row = sqlx::query_as::<_, ProfileRow>(
      r#"UPDATE "profiles"
         SET experience = $2, education = $3, updated_at = (now() AT TIME ZONE 'utc')
         WHERE user_id = $1
         RETURNING *"#,
    )
    .bind(profile.user)
    .bind(Json(&profile.experience))
    .bind(Json(&profile.education))
    .fetch_optional(&mut *conn)
    .await
    .into_db_error()?;

    Ok(row.map(Profile::from))
  }

  #[tracing::instrument(skip(self, user), fields(user = "<hidden>"), name = "store.profiles.delete_by_owner")]
  async fn delete_by_owner(&self, user: Id<UserMarker>) -> Result<bool> {
    let mut conn = self.db_write().await?;
    let result = sqlx::query(r#"DELETE FROM "profiles" WHERE user_id = $1"#)
      .bind(user)
      .execute(&mut *conn)
      .await
      .into_db_error()?;

    Ok(result.rows_affected() > 0)
  }

  #[tracing::instrument(skip(self), name = "store.profiles.next_entry_id")]
  async fn next_entry_id(&self) -> Result<EntryId> {
    let mut conn = self.db_write().await?;
    let (value,) = sqlx::query_as::<_, (i64,)>("SELECT nextval('profile_entry_ids')")
      .fetch_one(&mut *conn)
      .await
      .into_db_error()?;

    u64::try_from(value)
      .ok()
      .and_then(EntryId::new_checked)
      .ok_or_else(|| Report::new(database::Error::Malformed))
      .attach_printable_lazy(|| format!("sequence returned {value}"))
  }
}

#[async_trait]
impl PostStore for PgStore {
  #[tracing::instrument(skip(self, user), fields(user = "<hidden>"), name = "store.posts.delete_by_author")]
  async fn delete_by_author(&self, user: Id<UserMarker>) -> Result<u64> {
    let mut conn = self.db_write().await?;
    let result = sqlx::query(r#"DELETE FROM "posts" WHERE user_id = $1"#)
      .bind(user)
      .execute(&mut *conn)
      .await
      .into_db_error()?;

    Ok(result.rows_affected())
  }
}
