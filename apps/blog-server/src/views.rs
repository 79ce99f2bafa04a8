//! HTML rendering of blog pages with askama templates.

use askama::Template;
use chrono::{DateTime, Utc};

use blog_core::application::{Page, Route};
use blog_core::domain::Post;
use blog_core::forms::{PostField, PostForm};
use blog_core::ports::{PageRenderer, RenderError};

/// Path of a named route.
pub fn url_for(route: &Route) -> String {
    match route {
        Route::PostList => "/".to_string(),
        Route::PostDetail { id } => format!("/post/{id}/"),
        Route::PostNew => "/post/new/".to_string(),
        Route::PostEdit { id } => format!("/post/{id}/edit/"),
        Route::PostPublish { id } => format!("/post/{id}/publish/"),
    }
}

fn format_date(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M UTC").to_string()
}

struct PostView {
    title: String,
    text: String,
    created: String,
    published: Option<String>,
    detail_url: String,
    edit_url: String,
    publish_url: String,
}

impl From<&Post> for PostView {
    fn from(post: &Post) -> Self {
        Self {
            title: post.to_string(),
            text: post.text.clone(),
            created: format_date(post.created_date),
            published: post.published_date.map(format_date),
            detail_url: url_for(&Route::PostDetail { id: post.id }),
            edit_url: url_for(&Route::PostEdit { id: post.id }),
            publish_url: url_for(&Route::PostPublish { id: post.id }),
        }
    }
}

struct FormView {
    action: String,
    title: String,
    text: String,
    title_errors: Vec<String>,
    text_errors: Vec<String>,
}

impl FormView {
    fn new(form: &PostForm, action: String) -> Self {
        Self {
            action,
            title: form.title().to_owned(),
            text: form.text().to_owned(),
            title_errors: form.errors().get(PostField::Title).to_vec(),
            text_errors: form.errors().get(PostField::Text).to_vec(),
        }
    }
}

#[derive(Template)]
#[template(path = "blog/post_list.html")]
struct PostListTemplate {
    new_url: String,
    posts: Vec<PostView>,
}

#[derive(Template)]
#[template(path = "blog/post_detail.html")]
struct PostDetailTemplate {
    new_url: String,
    post: PostView,
}

#[derive(Template)]
#[template(path = "blog/post_edit.html")]
struct PostEditTemplate {
    new_url: String,
    form: FormView,
}

/// Renders [`Page`]s with the compiled templates under `templates/`.
pub struct AskamaRenderer;

impl PageRenderer for AskamaRenderer {
    fn render(&self, page: &Page) -> Result<String, RenderError> {
        let new_url = url_for(&Route::PostNew);
        let rendered = match page {
            Page::PostList { posts } => PostListTemplate {
                new_url,
                posts: posts.iter().map(PostView::from).collect(),
            }
            .render(),
            Page::PostDetail { post } => PostDetailTemplate {
                new_url,
                post: PostView::from(post),
            }
            .render(),
            Page::PostEdit { form, post_id } => {
                let action = match post_id {
                    Some(id) => url_for(&Route::PostEdit { id: *id }),
                    None => url_for(&Route::PostNew),
                };
                PostEditTemplate {
                    new_url,
                    form: FormView::new(form, action),
                }
                .render()
            }
        };

        rendered.map_err(|err| RenderError {
            template: page.template_name(),
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_core::forms::PostInput;
    use uuid::Uuid;

    #[test]
    fn test_url_for_routes() {
        let id = Uuid::nil();
        assert_eq!(url_for(&Route::PostList), "/");
        assert_eq!(
            url_for(&Route::PostDetail { id }),
            "/post/00000000-0000-0000-0000-000000000000/"
        );
        assert_eq!(url_for(&Route::PostNew), "/post/new/");
        assert!(url_for(&Route::PostEdit { id }).ends_with("/edit/"));
    }

    #[test]
    fn test_list_escapes_titles() {
        let mut post = Post::new(
            Uuid::new_v4(),
            "<script>alert(1)</script>".into(),
            "Body".into(),
            Utc::now(),
        );
        post.publish(Utc::now());

        let html = AskamaRenderer
            .render(&Page::PostList { posts: vec![post] })
            .unwrap();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_edit_page_shows_errors_and_values() {
        let form = PostForm::bind(PostInput::new("", "kept body"));

        let html = AskamaRenderer
            .render(&Page::PostEdit {
                form,
                post_id: None,
            })
            .unwrap();

        assert!(html.contains("This field is required."));
        assert!(html.contains("kept body"));
        assert!(html.contains("action=\"/post/new/\""));
    }
}
