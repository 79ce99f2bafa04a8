use std::sync::Arc;

use uuid::Uuid;

use crate::error::DomainError;
use crate::ports::{BaseRepository, PostRepository, UserRepository};

/// Account lifecycle operations that span users and their posts.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { users, posts }
    }

    /// Delete a user together with every post they authored.
    ///
    /// Posts go first so no post is ever left pointing at a missing author.
    pub async fn delete_account(&self, user_id: Uuid) -> Result<u64, DomainError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(DomainError::user_not_found(user_id));
        }

        let removed = self.posts.delete_by_author(user_id).await?;
        self.users.delete(user_id).await?;

        tracing::info!(user_id = %user_id, posts_removed = removed, "Account deleted");
        Ok(removed)
    }
}
