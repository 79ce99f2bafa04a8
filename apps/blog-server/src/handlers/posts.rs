//! Blog page handlers.

use actix_web::http::header::{self, ContentType};
use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blog_core::application::Outcome;
use blog_core::forms::PostInput;

use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::views::url_for;

/// Turn a flow outcome into an HTML page or a 302 redirect.
fn respond(state: &AppState, outcome: Outcome) -> AppResult<HttpResponse> {
    match outcome {
        Outcome::Render(page) => {
            let html = state.renderer.render(&page)?;
            Ok(HttpResponse::Ok()
                .content_type(ContentType::html())
                .body(html))
        }
        Outcome::Redirect(route) => Ok(HttpResponse::Found()
            .insert_header((header::LOCATION, url_for(&route)))
            .finish()),
    }
}

/// GET /
pub async fn post_list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let outcome = state.posts.list().await?;
    respond(&state, outcome)
}

/// GET /post/{id}/
pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let outcome = state.posts.detail(path.into_inner()).await?;
    respond(&state, outcome)
}

/// GET /post/new/
pub async fn post_new_form(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    respond(&state, state.posts.new_form())
}

/// POST /post/new/
pub async fn post_new(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    form: web::Form<PostInput>,
) -> AppResult<HttpResponse> {
    let outcome = state
        .posts
        .create(identity.user_id(), form.into_inner())
        .await?;
    respond(&state, outcome)
}

/// GET /post/{id}/edit/
pub async fn post_edit_form(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let outcome = state.posts.edit_form(path.into_inner()).await?;
    respond(&state, outcome)
}

/// POST /post/{id}/edit/
pub async fn post_edit(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
    form: web::Form<PostInput>,
) -> AppResult<HttpResponse> {
    let outcome = state
        .posts
        .edit(identity.user_id(), path.into_inner(), form.into_inner())
        .await?;
    respond(&state, outcome)
}

/// POST /post/{id}/publish/
pub async fn post_publish(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let outcome = state
        .posts
        .publish(identity.user_id(), path.into_inner())
        .await?;
    respond(&state, outcome)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::dev::ServiceResponse;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use chrono::Utc;

    use blog_core::domain::Post;
    use blog_core::ports::BaseRepository;
    use blog_infra::{InMemoryPostRepository, InMemoryUserRepository};

    use super::*;
    use crate::handlers::test_support::{auth_services, bearer, configure, register_author};

    async fn body_text(resp: ServiceResponse) -> String {
        String::from_utf8_lossy(&test::read_body(resp).await).into_owned()
    }

    fn get(uri: &str) -> test::TestRequest {
        test::TestRequest::get().uri(uri)
    }

    fn location(resp: &ServiceResponse) -> String {
        resp.headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_owned()
    }

    #[actix_web::test]
    async fn test_list_page_renders_without_posts() {
        let app =
            test::init_service(App::new().configure(configure(AppState::in_memory(), auth_services())))
                .await;

        let resp = test::call_service(&app, get("/").to_request()).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains("No posts yet."));
    }

    #[actix_web::test]
    async fn test_unknown_post_is_404() {
        let app =
            test::init_service(App::new().configure(configure(AppState::in_memory(), auth_services())))
                .await;

        let uri = format!("/post/{}/", Uuid::new_v4());
        let resp = test::call_service(&app, get(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = test::call_service(&app, get("/post/not-a-uuid/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_anonymous_create_is_rejected() {
        let app =
            test::init_service(App::new().configure(configure(AppState::in_memory(), auth_services())))
                .await;

        let req = test::TestRequest::post()
            .uri("/post/new/")
            .set_form([("title", "T"), ("text", "B")])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_create_redirects_to_detail_page() {
        let state = AppState::in_memory();
        let auth = auth_services();
        let authorization = bearer(&auth.tokens, register_author(&state).await);
        let app = test::init_service(App::new().configure(configure(state, auth))).await;

        let req = test::TestRequest::post()
            .uri("/post/new/")
            .insert_header((header::AUTHORIZATION, authorization))
            .set_form([("title", "Hello"), ("text", "First post")])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FOUND);
        let detail_url = location(&resp);
        assert!(detail_url.starts_with("/post/"));

        let detail = test::call_service(&app, get(&detail_url).to_request()).await;
        assert_eq!(detail.status(), StatusCode::OK);
        assert!(body_text(detail).await.contains("First post"));

        let page = test::call_service(&app, get("/").to_request()).await;
        assert!(body_text(page).await.contains("Hello"));
    }

    #[actix_web::test]
    async fn test_invalid_create_rerenders_form() {
        let state = AppState::in_memory();
        let auth = auth_services();
        let authorization = bearer(&auth.tokens, register_author(&state).await);
        let app = test::init_service(App::new().configure(configure(state, auth))).await;

        let req = test::TestRequest::post()
            .uri("/post/new/")
            .insert_header((header::AUTHORIZATION, authorization))
            .set_form([("title", ""), ("text", "Body")])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains("This field is required."));
        let page = test::call_service(&app, get("/").to_request()).await;
        assert!(body_text(page).await.contains("No posts yet."));
    }

    #[actix_web::test]
    async fn test_token_of_deleted_account_cannot_create() {
        let state = AppState::in_memory();
        let auth = auth_services();
        let authorization = bearer(&auth.tokens, register_author(&state).await);
        let app = test::init_service(App::new().configure(configure(state, auth))).await;

        let delete = test::TestRequest::delete()
            .uri("/api/auth/me")
            .insert_header((header::AUTHORIZATION, authorization.clone()))
            .to_request();
        assert_eq!(test::call_service(&app, delete).await.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/post/new/")
            .insert_header((header::AUTHORIZATION, authorization))
            .set_form([("title", "Orphan"), ("text", "Body")])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let page = test::call_service(&app, get("/").to_request()).await;
        assert!(body_text(page).await.contains("No posts yet."));
    }

    #[actix_web::test]
    async fn test_edit_redirects_and_overwrites() {
        let state = AppState::in_memory();
        let auth = auth_services();
        let authorization = bearer(&auth.tokens, register_author(&state).await);
        let app = test::init_service(App::new().configure(configure(state, auth))).await;

        let create = test::TestRequest::post()
            .uri("/post/new/")
            .insert_header((header::AUTHORIZATION, authorization.clone()))
            .set_form([("title", "Before"), ("text", "Old body")])
            .to_request();
        let detail_url = location(&test::call_service(&app, create).await);

        let form = test::call_service(&app, get(&format!("{detail_url}edit/")).to_request()).await;
        assert_eq!(form.status(), StatusCode::OK);
        assert!(body_text(form).await.contains("Old body"));

        let edit = test::TestRequest::post()
            .uri(&format!("{detail_url}edit/"))
            .insert_header((header::AUTHORIZATION, authorization))
            .set_form([("title", "After"), ("text", "New body")])
            .to_request();
        let resp = test::call_service(&app, edit).await;

        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), detail_url);
        let page = test::call_service(&app, get(&detail_url).to_request()).await;
        let html = body_text(page).await;
        assert!(html.contains("New body"));
        assert!(!html.contains("Old body"));
    }

    #[actix_web::test]
    async fn test_invalid_edit_rerenders_with_errors() {
        let state = AppState::in_memory();
        let auth = auth_services();
        let authorization = bearer(&auth.tokens, register_author(&state).await);
        let app = test::init_service(App::new().configure(configure(state, auth))).await;

        let create = test::TestRequest::post()
            .uri("/post/new/")
            .insert_header((header::AUTHORIZATION, authorization.clone()))
            .set_form([("title", "Kept"), ("text", "Kept body")])
            .to_request();
        let detail_url = location(&test::call_service(&app, create).await);

        let edit = test::TestRequest::post()
            .uri(&format!("{detail_url}edit/"))
            .insert_header((header::AUTHORIZATION, authorization))
            .set_form([("title", "Changed"), ("text", "")])
            .to_request();
        let resp = test::call_service(&app, edit).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains("This field is required."));
        let page = test::call_service(&app, get(&detail_url).to_request()).await;
        assert!(body_text(page).await.contains("Kept body"));
    }

    #[actix_web::test]
    async fn test_edit_of_unknown_post_is_404() {
        let state = AppState::in_memory();
        let auth = auth_services();
        let authorization = bearer(&auth.tokens, register_author(&state).await);
        let app = test::init_service(App::new().configure(configure(state, auth))).await;
        let uri = format!("/post/{}/edit/", Uuid::new_v4());

        let form = test::call_service(&app, get(&uri).to_request()).await;
        assert_eq!(form.status(), StatusCode::NOT_FOUND);

        let edit = test::TestRequest::post()
            .uri(&uri)
            .insert_header((header::AUTHORIZATION, authorization))
            .set_form([("title", "T"), ("text", "B")])
            .to_request();
        assert_eq!(test::call_service(&app, edit).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_anonymous_edit_and_publish_are_rejected() {
        let users = Arc::new(InMemoryUserRepository::new());
        let posts = Arc::new(InMemoryPostRepository::new());
        let draft = posts
            .save(Post::new(Uuid::new_v4(), "Draft".into(), "Body".into(), Utc::now()))
            .await
            .unwrap();
        let state = AppState::from_repositories(users, posts.clone(), "memory");
        let app = test::init_service(App::new().configure(configure(state, auth_services()))).await;

        let edit = test::TestRequest::post()
            .uri(&format!("/post/{}/edit/", draft.id))
            .set_form([("title", "T"), ("text", "B")])
            .to_request();
        assert_eq!(test::call_service(&app, edit).await.status(), StatusCode::UNAUTHORIZED);

        let publish = test::TestRequest::post()
            .uri(&format!("/post/{}/publish/", draft.id))
            .to_request();
        assert_eq!(test::call_service(&app, publish).await.status(), StatusCode::UNAUTHORIZED);

        assert_eq!(posts.find_by_id(draft.id).await.unwrap(), Some(draft));
    }

    #[actix_web::test]
    async fn test_publish_moves_draft_onto_list() {
        let users = Arc::new(InMemoryUserRepository::new());
        let posts = Arc::new(InMemoryPostRepository::new());
        let state = AppState::from_repositories(users, posts.clone(), "memory");
        let auth = auth_services();
        let author = register_author(&state).await;
        let authorization = bearer(&auth.tokens, author);
        let draft = posts
            .save(Post::new(author, "Unreleased".into(), "Body".into(), Utc::now()))
            .await
            .unwrap();
        let app = test::init_service(App::new().configure(configure(state, auth))).await;
        let detail_url = format!("/post/{}/", draft.id);

        let page = test::call_service(&app, get(&detail_url).to_request()).await;
        let before = body_text(page).await;
        assert!(before.contains("draft, created"));
        assert!(before.contains("Publish"));
        let page = test::call_service(&app, get("/").to_request()).await;
        assert!(!body_text(page).await.contains("Unreleased"));

        let publish = test::TestRequest::post()
            .uri(&format!("{detail_url}publish/"))
            .insert_header((header::AUTHORIZATION, authorization))
            .to_request();
        let resp = test::call_service(&app, publish).await;

        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), detail_url);
        let page = test::call_service(&app, get(&detail_url).to_request()).await;
        let after = body_text(page).await;
        assert!(after.contains("published:"));
        assert!(!after.contains("draft, created"));
        let page = test::call_service(&app, get("/").to_request()).await;
        assert!(body_text(page).await.contains("Unreleased"));
    }
}
