//! In-process fakes for exercising the request flows.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

use crate::domain::{Post, User};
use crate::error::RepoError;
use crate::ports::{BaseRepository, Clock, PostRepository, UserRepository};

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: TimeDelta) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[derive(Default)]
pub struct FakePosts {
    pub rows: Mutex<Vec<Post>>,
}

impl FakePosts {
    pub fn with(posts: Vec<Post>) -> Self {
        Self {
            rows: Mutex::new(posts),
        }
    }

    pub fn all(&self) -> Vec<Post> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for FakePosts {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn save(&self, entity: Post) -> Result<Post, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        rows.retain(|p| p.id != entity.id);
        rows.push(entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| p.id != id);
        if rows.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for FakePosts {
    async fn find_published_before(&self, now: DateTime<Utc>) -> Result<Vec<Post>, RepoError> {
        let mut posts: Vec<Post> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.is_published_at(now))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.published_date.cmp(&a.published_date));
        Ok(posts)
    }

    async fn delete_by_author(&self, author_id: Uuid) -> Result<u64, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| p.author_id != author_id);
        Ok(u64::try_from(before - rows.len()).unwrap_or_default())
    }
}

#[derive(Default)]
pub struct FakeUsers {
    pub rows: Mutex<Vec<User>>,
}

#[async_trait]
impl BaseRepository<User, Uuid> for FakeUsers {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn save(&self, entity: User) -> Result<User, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        rows.retain(|u| u.id != entity.id);
        rows.push(entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.rows.lock().unwrap().retain(|u| u.id != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for FakeUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }
}
