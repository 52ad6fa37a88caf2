use crate::db::DbPool;
use std::sync::Arc;

use crate::{
    auth::auth_repository::{EmailTokenRepository, RefreshTokenRepository},
    auth::auth_service::AuthService,
    entry::entry_repository::EntryRepository,
    entry::entry_service::EntryService,
    group::group_repository::GroupRepository,
    group::group_service::GroupService,
    user::user_repository::UserRepository,
    user::user_service::UserService,
    websocket::ConnectionManager,
};

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
    pub ws_connections: ConnectionManager,
    pub user_repository: UserRepository,
    pub group_repository: GroupRepository,
    pub entry_repository: EntryRepository,
    pub refresh_token_repository: RefreshTokenRepository,
    pub email_token_repository: EmailTokenRepository,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub group_service: GroupService,
    pub entry_service: EntryService,
}

#[derive(Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| {
                    "http://localhost:3000,http://127.0.0.1:3000,http://localhost:8080".to_string()
                })
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}
