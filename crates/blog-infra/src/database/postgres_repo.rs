//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::DateTimeWithTimeZone;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use blog_core::domain::{Post, User};
use blog_core::error::RepoError;
use blog_core::ports::{PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, query_error};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_published_before(&self, now: DateTime<Utc>) -> Result<Vec<Post>, RepoError> {
        let now: DateTimeWithTimeZone = now.into();

        let result = PostEntity::find()
            .filter(post::Column::PublishedDate.is_not_null())
            .filter(post::Column::PublishedDate.lte(now))
            .order_by_desc(post::Column::PublishedDate)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn delete_by_author(&self, author_id: Uuid) -> Result<u64, RepoError> {
        let result = PostEntity::delete_many()
            .filter(post::Column::AuthorId.eq(author_id))
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        tracing::debug!(%author_id, rows = result.rows_affected, "Deleted posts by author");
        Ok(result.rows_affected)
    }
}

/// Mask an email for logging to avoid PII in logs.
fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) => {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = match local.chars().next() {
                Some(first) if local.chars().count() > 1 => format!("{first}***"),
                _ => "***".to_string(),
            };
            format!("{masked_local}{domain}")
        }
        None => "***".to_string(),
    }
}
