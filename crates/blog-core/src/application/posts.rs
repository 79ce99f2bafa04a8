//! Post pages: list, detail, create, edit and publish.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::Post;
use crate::error::DomainError;
use crate::forms::{PostForm, PostInput};
use crate::ports::{BaseRepository, Clock, PostRepository, UserRepository};

use super::{Outcome, Page, Route};

/// Drives the post pages against the repositories and a clock.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            posts,
            users,
            clock,
        }
    }

    /// Published posts, most recently published first.
    pub async fn list(&self) -> Result<Outcome, DomainError> {
        let now = self.clock.now();
        let posts = self.posts.find_published_before(now).await?;
        tracing::debug!(count = posts.len(), "Listing published posts");

        Ok(Outcome::Render(Page::PostList { posts }))
    }

    pub async fn detail(&self, id: Uuid) -> Result<Outcome, DomainError> {
        let post = self.get(id).await?;
        Ok(Outcome::Render(Page::PostDetail { post }))
    }

    /// GET on the create page.
    pub fn new_form(&self) -> Outcome {
        Outcome::Render(Page::PostEdit {
            form: PostForm::empty(),
            post_id: None,
        })
    }

    /// POST on the create page.
    pub async fn create(
        &self,
        actor: Option<Uuid>,
        input: PostInput,
    ) -> Result<Outcome, DomainError> {
        let author_id = self.author(actor).await?;

        let form = PostForm::bind(input);
        let Some(valid) = form.cleaned().cloned() else {
            return Ok(Outcome::Render(Page::PostEdit {
                form,
                post_id: None,
            }));
        };

        let now = self.clock.now();
        let mut post = valid.into_post(author_id, now);
        post.publish(now);
        let post = self.posts.save(post).await?;

        tracing::info!(post_id = %post.id, author_id = %author_id, "Post created");
        Ok(Outcome::Redirect(Route::PostDetail { id: post.id }))
    }

    /// GET on the edit page.
    pub async fn edit_form(&self, id: Uuid) -> Result<Outcome, DomainError> {
        let post = self.get(id).await?;
        Ok(Outcome::Render(Page::PostEdit {
            form: PostForm::from_post(&post),
            post_id: Some(post.id),
        }))
    }

    /// POST on the edit page.
    ///
    /// A successful edit takes over authorship and republishes the post.
    pub async fn edit(
        &self,
        actor: Option<Uuid>,
        id: Uuid,
        input: PostInput,
    ) -> Result<Outcome, DomainError> {
        let author_id = self.author(actor).await?;
        let mut post = self.get(id).await?;

        let form = PostForm::bind(input);
        let Some(valid) = form.cleaned().cloned() else {
            return Ok(Outcome::Render(Page::PostEdit {
                form,
                post_id: Some(id),
            }));
        };

        let now = self.clock.now();
        valid.apply_to(&mut post);
        post.author_id = author_id;
        post.publish(now);
        let post = self.posts.save(post).await?;

        tracing::info!(post_id = %post.id, author_id = %author_id, "Post edited");
        Ok(Outcome::Redirect(Route::PostDetail { id: post.id }))
    }

    /// Set the publication time to now and persist.
    pub async fn publish(&self, actor: Option<Uuid>, id: Uuid) -> Result<Outcome, DomainError> {
        let actor = self.author(actor).await?;
        let mut post = self.get(id).await?;

        post.publish(self.clock.now());
        let post = self.posts.save(post).await?;

        tracing::info!(post_id = %post.id, actor = %actor, "Post published");
        Ok(Outcome::Redirect(Route::PostDetail { id: post.id }))
    }

    /// The acting author, who must still have an account.
    async fn author(&self, actor: Option<Uuid>) -> Result<Uuid, DomainError> {
        let author_id = actor.ok_or(DomainError::Unauthorized)?;
        if self.users.find_by_id(author_id).await?.is_none() {
            tracing::debug!(author_id = %author_id, "Rejected write from a removed account");
            return Err(DomainError::Unauthorized);
        }
        Ok(author_id)
    }

    async fn get(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))
    }
}
