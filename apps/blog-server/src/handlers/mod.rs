//! HTTP handlers and route configuration.

mod auth;
mod health;
mod posts;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Blog pages
        .route("/", web::get().to(posts::post_list))
        .route("/post/new/", web::get().to(posts::post_new_form))
        .route("/post/new/", web::post().to(posts::post_new))
        .route("/post/{id}/", web::get().to(posts::post_detail))
        .route("/post/{id}/edit/", web::get().to(posts::post_edit_form))
        .route("/post/{id}/edit/", web::post().to(posts::post_edit))
        .route("/post/{id}/publish/", web::post().to(posts::post_publish))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health::health_check))
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(auth::register))
                        .route("/login", web::post().to(auth::login))
                        .route("/me", web::get().to(auth::me))
                        .route("/me", web::delete().to(auth::delete_me)),
                ),
        );
}
