//! In-memory repositories - used when no database is configured.
//!
//! Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use blog_core::domain::{Post, User};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, PostRepository, UserRepository};

/// Post storage in a `HashMap` behind an async `RwLock`.
#[derive(Default)]
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn save(&self, entity: Post) -> Result<Post, RepoError> {
        self.store.write().await.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.store.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_published_before(&self, now: DateTime<Utc>) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        let mut posts: Vec<Post> = store
            .values()
            .filter(|post| post.is_published_at(now))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.published_date.cmp(&a.published_date));

        Ok(posts)
    }

    async fn delete_by_author(&self, author_id: Uuid) -> Result<u64, RepoError> {
        let mut store = self.store.write().await;
        let before = store.len();
        store.retain(|_, post| post.author_id != author_id);

        Ok(u64::try_from(before - store.len()).unwrap_or_default())
    }
}

/// User storage in a `HashMap` behind an async `RwLock`.
#[derive(Default)]
pub struct InMemoryUserRepository {
    store: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn save(&self, entity: User) -> Result<User, RepoError> {
        let mut store = self.store.write().await;

        // Mirror the unique index on users.email.
        let taken = store
            .values()
            .any(|user| user.email == entity.email && user.id != entity.id);
        if taken {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        store.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.store.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|user| user.email == email).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn post(author_id: Uuid, published: Option<DateTime<Utc>>) -> Post {
        let mut post = Post::new(author_id, "T".into(), "B".into(), Utc::now());
        post.published_date = published;
        post
    }

    #[tokio::test]
    async fn test_published_filter_and_order() {
        let repo = InMemoryPostRepository::new();
        let now = Utc::now();
        let author = Uuid::new_v4();

        let older = repo
            .save(post(author, Some(now - TimeDelta::hours(2))))
            .await
            .unwrap();
        let newer = repo
            .save(post(author, Some(now - TimeDelta::hours(1))))
            .await
            .unwrap();
        repo.save(post(author, None)).await.unwrap();
        repo.save(post(author, Some(now + TimeDelta::hours(1))))
            .await
            .unwrap();

        let posts = repo.find_published_before(now).await.unwrap();

        let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
    }

    #[tokio::test]
    async fn test_save_overwrites_existing() {
        let repo = InMemoryPostRepository::new();
        let mut saved = repo.save(post(Uuid::new_v4(), None)).await.unwrap();

        saved.title = "Changed".into();
        repo.save(saved.clone()).await.unwrap();

        let found = repo.find_by_id(saved.id).await.unwrap().unwrap();
        assert_eq!(found.title, "Changed");
    }

    #[tokio::test]
    async fn test_delete_by_author() {
        let repo = InMemoryPostRepository::new();
        let author = Uuid::new_v4();
        let other = Uuid::new_v4();
        repo.save(post(author, None)).await.unwrap();
        repo.save(post(author, None)).await.unwrap();
        let kept = repo.save(post(other, None)).await.unwrap();

        assert_eq!(repo.delete_by_author(author).await.unwrap(), 2);
        assert_eq!(repo.delete_by_author(author).await.unwrap(), 0);
        assert!(repo.find_by_id(kept.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_missing_post() {
        let repo = InMemoryPostRepository::new();
        let result = repo.delete(Uuid::new_v4()).await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.save(User::new("a@example.com".into(), "h".into()))
            .await
            .unwrap();

        let result = repo
            .save(User::new("a@example.com".into(), "h2".into()))
            .await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
        assert!(
            repo.find_by_email("a@example.com")
                .await
                .unwrap()
                .is_some()
        );
    }
}
