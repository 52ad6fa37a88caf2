use crate::{
    auth::{
        auth_dto::{
            AuthResponse, ForgotPasswordRequest, LoginRequest, RefreshTokenRequest,
            RefreshTokenResponse, RegisterRequest, ResendVerificationRequest,
            ResetPasswordRequest, VerifyEmailRequest,
        },
        auth_handlers,
    },
    entry::{
        entry_dto::{CreateEntryRequest, DayGroup, EntriesResponse, SortOrder},
        entry_handlers,
        entry_models::DiaryEntry,
    },
    group::{
        group_dto::{CreateGroupRequest, GroupResponse, JoinGroupRequest, MembersResponse},
        group_handlers,
        group_models::{Group, GroupMember, UserGroup},
    },
    middleware::auth_middleware,
    state::AppState,
    user::{
        user_dto::{ProfileResponse, UpdateLastGroupRequest},
        user_handlers,
        user_models::UserResponse,
    },
};
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use axum::http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    Method,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::auth::auth_handlers::register,
        crate::auth::auth_handlers::login,
        crate::auth::auth_handlers::refresh_token,
        crate::auth::auth_handlers::logout,
        crate::auth::auth_handlers::verify_email,
        crate::auth::auth_handlers::resend_verification,
        crate::auth::auth_handlers::forgot_password,
        crate::auth::auth_handlers::reset_password,
        crate::user::user_handlers::get_current_user,
        crate::user::user_handlers::update_last_group,
        crate::group::group_handlers::create_group,
        crate::group::group_handlers::list_groups,
        crate::group::group_handlers::join_group,
        crate::group::group_handlers::get_group,
        crate::group::group_handlers::delete_group,
        crate::group::group_handlers::list_members,
        crate::group::group_handlers::list_pending,
        crate::group::group_handlers::approve_member,
        crate::group::group_handlers::reject_member,
        crate::group::group_handlers::remove_member,
        crate::entry::entry_handlers::create_entry,
        crate::entry::entry_handlers::list_entries,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            RefreshTokenRequest,
            RefreshTokenResponse,
            VerifyEmailRequest,
            ResendVerificationRequest,
            ForgotPasswordRequest,
            ResetPasswordRequest,
            UserResponse,
            ProfileResponse,
            UpdateLastGroupRequest,
            CreateGroupRequest,
            JoinGroupRequest,
            GroupResponse,
            MembersResponse,
            Group,
            GroupMember,
            UserGroup,
            CreateEntryRequest,
            EntriesResponse,
            DayGroup,
            SortOrder,
            DiaryEntry,
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User profile endpoints"),
        (name = "groups", description = "Group and membership endpoints"),
        (name = "entries", description = "Diary entry endpoints")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            )
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let origins: Vec<_> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true);

    // Public routes (no auth required)
    let auth_routes = Router::new()
        .route("/register", post(auth_handlers::register))
        .route("/login", post(auth_handlers::login))
        .route("/refresh", post(auth_handlers::refresh_token))
        .route("/logout", post(auth_handlers::logout))
        .route("/verify-email", post(auth_handlers::verify_email))
        .route(
            "/resend-verification",
            post(auth_handlers::resend_verification),
        )
        .route("/forgot-password", post(auth_handlers::forgot_password))
        .route("/reset-password", post(auth_handlers::reset_password));

    // Protected routes (auth required)
    let user_routes = Router::new()
        .route("/me", get(user_handlers::get_current_user))
        .route("/me/last-group", put(user_handlers::update_last_group))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let group_routes = Router::new()
        .route(
            "/",
            get(group_handlers::list_groups).post(group_handlers::create_group),
        )
        .route("/join", post(group_handlers::join_group))
        .route(
            "/:group_id",
            get(group_handlers::get_group).delete(group_handlers::delete_group),
        )
        .route("/:group_id/members", get(group_handlers::list_members))
        .route("/:group_id/pending", get(group_handlers::list_pending))
        .route(
            "/:group_id/members/:user_id",
            delete(group_handlers::remove_member),
        )
        .route(
            "/:group_id/members/:user_id/approve",
            post(group_handlers::approve_member),
        )
        .route(
            "/:group_id/members/:user_id/reject",
            post(group_handlers::reject_member),
        )
        .route(
            "/:group_id/entries",
            get(entry_handlers::list_entries).post(entry_handlers::create_entry),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // WebSocket route (token passed as query parameter)
    let ws_routes = Router::new()
        .route("/ws", get(crate::websocket::ws_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/groups", group_routes)
        .merge(ws_routes);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(state)
}
