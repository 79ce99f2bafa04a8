use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Identifiable;

/// Longest title a post may carry, in characters.
pub const TITLE_MAX_CHARS: usize = 200;

/// Post entity - a blog entry written by a single author.
///
/// A post is visible on the list page once `published_date` is set and no
/// longer in the future. `None` means the post is still a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub text: String,
    pub created_date: DateTime<Utc>,
    pub published_date: Option<DateTime<Utc>>,
}

impl Post {
    /// Create an unpublished post stamped with `created_date = now`.
    pub fn new(author_id: Uuid, title: String, text: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            text,
            created_date: now,
            published_date: None,
        }
    }

    /// Mark the post as published at `now`.
    ///
    /// Calling it again moves the timestamp forward; the caller persists.
    pub fn publish(&mut self, now: DateTime<Utc>) {
        self.published_date = Some(now);
    }

    pub fn is_published_at(&self, now: DateTime<Utc>) -> bool {
        self.published_date.is_some_and(|published| published <= now)
    }
}

impl Identifiable<Uuid> for Post {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Posts display as their title.
impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn sample(now: DateTime<Utc>) -> Post {
        Post::new(Uuid::new_v4(), "Hello".into(), "World".into(), now)
    }

    #[test]
    fn test_new_post_is_a_draft() {
        let now = Utc::now();
        let post = sample(now);

        assert_eq!(post.created_date, now);
        assert!(post.published_date.is_none());
        assert!(!post.is_published_at(now));
    }

    #[test]
    fn test_publish_twice_keeps_last_timestamp() {
        let first = Utc::now();
        let second = first + TimeDelta::seconds(5);
        let mut post = sample(first);

        post.publish(first);
        assert_eq!(post.published_date, Some(first));

        post.publish(second);
        assert_eq!(post.published_date, Some(second));
        assert_ne!(post.published_date, Some(first));
    }

    #[test]
    fn test_future_publication_is_not_visible_yet() {
        let now = Utc::now();
        let mut post = sample(now);
        post.publish(now + TimeDelta::hours(1));

        assert!(!post.is_published_at(now));
        assert!(post.is_published_at(now + TimeDelta::hours(1)));
    }

    #[test]
    fn test_display_is_title() {
        let post = sample(Utc::now());
        assert_eq!(post.to_string(), "Hello");
    }
}
