//! # rv-api
//!
//! JSON routing layer for Rusty-Verse. Handlers are thin: every route maps to
//! one service operation.

pub mod error;
pub mod handlers;
pub mod middleware;

use actix_web::web;

pub use handlers::AppState;

/// Mounts every route under `/api`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/poems/generate", web::post().to(handlers::generate_poem))
            .service(
                web::resource("/poems")
                    .route(web::get().to(handlers::list_poems))
                    .route(web::post().to(handlers::save_poem)),
            )
            .route("/poems/{id}/like", web::post().to(handlers::like_poem))
            .route("/poems/{id}/view", web::post().to(handlers::view_poem))
            .service(
                web::resource("/collections")
                    .route(web::get().to(handlers::list_collections))
                    .route(web::post().to(handlers::create_collection)),
            )
            .route("/collections/{id}", web::delete().to(handlers::delete_collection))
            .route("/profile", web::get().to(handlers::profile))
            .route("/poets", web::get().to(handlers::list_poets))
            .service(
                web::resource("/personas/{kind}/{id}/messages")
                    .route(web::get().to(handlers::conversation))
                    .route(web::post().to(handlers::send_message))
                    .route(web::delete().to(handlers::clear_conversation)),
            )
            .service(
                web::resource("/agents")
                    .route(web::get().to(handlers::list_agents))
                    .route(web::post().to(handlers::create_agent)),
            )
            .route("/agents/{id}", web::delete().to(handlers::delete_agent))
            .service(
                web::resource("/agents/{id}/training-files")
                    .route(web::get().to(handlers::training_files))
                    .route(web::post().to(handlers::upload_training_files)),
            )
            .route("/training-files/{id}", web::delete().to(handlers::delete_training_file)),
    );
}
