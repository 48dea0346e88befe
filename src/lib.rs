pub mod authentication;
pub mod cache;
pub mod config;
pub mod data_formats;
pub mod db_helpers;
pub mod errors;
mod handlers;
pub mod models;
pub mod pagination;

use anyhow::Context;
pub use anyhow::Result;
use axum::http::StatusCode;
use axum::{routing::*, Extension, Json, Router};
use cache::PageCache;
use handlers::*;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::{
    net::{SocketAddr, TcpListener},
    path::PathBuf,
    sync::Arc,
};

pub type JsonResponse<T> = (StatusCode, Json<T>);

/// Shared collaborators handed to every handler through an `Extension`
/// layer: the connection pool, the injected page cache, and where uploaded
/// images land.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub cache: Arc<PageCache>,
    pub media_root: PathBuf,
}

pub async fn run_app(state: AppState, address: SocketAddr) -> Result<()> {
    let app = make_router().layer(Extension(state));
    axum::Server::bind(&address)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

pub async fn init_db(database_url: &str) -> Result<SqlitePool> {
    if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        tracing::info!("creating database {}", database_url);
        Sqlite::create_database(database_url)
            .await
            .context("Failed to create database")?;
    }
    let pool = SqlitePool::connect(database_url).await?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("migrations completed");
    Ok(pool)
}

pub fn get_random_free_port() -> (u16, SocketAddr) {
    let listener = TcpListener::bind("localhost:0").unwrap();
    match listener.local_addr() {
        Ok(addr) => (addr.port(), addr),
        Err(_) => panic!("Could not get a free port"),
    }
}

pub fn make_router() -> Router {
    Router::new()
        .route("/check_health", get(alive))
        .route("/", get(index))
        .route("/groups/:slug", get(group_posts))
        .route("/profiles/:username", get(profile))
        .route("/profiles/:username/follow", post(follow_profile))
        .route("/profiles/:username/unfollow", post(unfollow_profile))
        .route("/posts", post(create_post))
        .route("/posts/:id", get(post_detail).put(edit_post))
        .route("/posts/:id/comments", post(add_comment))
        .route("/feed", get(follow_index))
        .route("/users", post(signup))
        .route("/users/login", post(login))
        .route("/user", get(current_user))
        .route("/user/password", put(change_password))
        .fallback(not_found)
}
