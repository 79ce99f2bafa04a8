use uuid::Uuid;

use crate::domain::Post;
use crate::forms::PostForm;

/// A page to render: a template name and the context it needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    PostList { posts: Vec<Post> },
    PostDetail { post: Post },
    /// Shared by create (`post_id = None`) and edit.
    PostEdit { form: PostForm, post_id: Option<Uuid> },
}

impl Page {
    pub fn template_name(&self) -> &'static str {
        match self {
            Page::PostList { .. } => "blog/post_list.html",
            Page::PostDetail { .. } => "blog/post_detail.html",
            Page::PostEdit { .. } => "blog/post_edit.html",
        }
    }
}

/// Named routes that flows redirect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    PostList,
    PostDetail { id: Uuid },
    PostNew,
    PostEdit { id: Uuid },
    PostPublish { id: Uuid },
}

impl Route {
    pub fn name(&self) -> &'static str {
        match self {
            Route::PostList => "post_list",
            Route::PostDetail { .. } => "post_detail",
            Route::PostNew => "post_new",
            Route::PostEdit { .. } => "post_edit",
            Route::PostPublish { .. } => "post_publish",
        }
    }
}

/// What a request flow decided.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Render(Page),
    Redirect(Route),
}
