use crate::{
    admin::admin_authorization,
    auth::{self, auth_dto::{LoginRequest, LoginResponse, RegisterRequest}},
    dashboard::{self, DashboardResponse, DashboardSummary, DashboardTask, PriorityTotal},
    error::AppError,
    middleware::auth_middleware,
    notification::{self, Notification, TaskRef, UnreadNotification},
    state::AppState,
    task::{
        self,
        task_dto::{
            CreateSubTaskRequest, CreateTaskRequest, PostActivityRequest, TaskListResponse,
            TaskResponse, UpdateTaskRequest,
        },
        Activity, ActivityType, Priority, Stage, SubTask, Task,
    },
    user::{
        self,
        user_dto::{
            ChangePasswordRequest, MessageResponse, ProfileResponse, UpdateProfileRequest,
            UpdateUserStatusRequest,
        },
        RecentUser, TaskMember, TeamMember, UserResponse,
    },
};
use axum::{
    http::{header, HeaderValue, Method, Uri},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::auth_handlers::register,
        auth::auth_handlers::login,
        auth::auth_handlers::logout,
        user::user_handlers::get_team_list,
        user::user_handlers::update_profile,
        user::user_handlers::change_password,
        user::user_handlers::activate_user_profile,
        user::user_handlers::delete_user_profile,
        notification::notification_handlers::get_notifications,
        notification::notification_handlers::mark_notification_read,
        notification::notification_handlers::notification_stream,
        task::task_handlers::create_task,
        task::task_handlers::duplicate_task,
        task::task_handlers::post_task_activity,
        task::task_handlers::get_tasks,
        task::task_handlers::get_task,
        task::task_handlers::update_task,
        task::task_handlers::create_sub_task,
        task::task_handlers::trash_task,
        task::task_handlers::delete_restore_all,
        task::task_handlers::delete_restore_task,
        dashboard::dashboard_handlers::dashboard_statistics,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            UserResponse,
            TeamMember,
            RecentUser,
            UpdateProfileRequest,
            ChangePasswordRequest,
            UpdateUserStatusRequest,
            MessageResponse,
            ProfileResponse,
            Notification,
            UnreadNotification,
            TaskRef,
            Task,
            Stage,
            Priority,
            ActivityType,
            Activity,
            SubTask,
            CreateTaskRequest,
            UpdateTaskRequest,
            PostActivityRequest,
            CreateSubTaskRequest,
            TaskResponse,
            TaskListResponse,
            DashboardSummary,
            DashboardTask,
            TaskMember,
            DashboardResponse,
            PriorityTotal,
        )
    ),
    tags(
        (name = "auth", description = "Registration and sessions"),
        (name = "users", description = "Team and profile management"),
        (name = "tasks", description = "Task management endpoints"),
        (name = "notifications", description = "Notification endpoints")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Cookie(
                        utoipa::openapi::security::ApiKeyValue::new(auth::cookie::TOKEN_COOKIE),
                    ),
                ),
            )
        }
    }
}

fn cors_layer(frontend_origin: Option<&str>) -> CorsLayer {
    let origin = frontend_origin.and_then(|origin| match origin.parse::<HeaderValue>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(origin, "Ignoring invalid FRONTEND_ORIGIN");
            None
        }
    });

    match origin {
        // Cookies need an explicit origin.
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    }
}

async fn route_not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Route not found: {}", uri.path()))
}

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(state.config.frontend_origin.as_deref());

    let require_auth = || middleware::from_fn_with_state(state.clone(), auth_middleware);

    // Public routes (no auth required)
    let public_user_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout));

    // Protected routes (auth required)
    let user_routes = Router::new()
        .route("/notifications", get(notification::get_notifications))
        .route("/notifications/stream", get(notification::notification_stream))
        .route("/profile", put(user::update_profile))
        .route("/read-noti", put(notification::mark_notification_read))
        .route("/change-password", put(user::change_password))
        .route_layer(require_auth());

    // Admin routes; the admin check runs after auth has resolved the caller
    let admin_user_routes = Router::new()
        .route("/get-team", get(user::get_team_list))
        .route(
            "/:id",
            put(user::activate_user_profile).delete(user::delete_user_profile),
        )
        .route_layer(middleware::from_fn(admin_authorization))
        .route_layer(require_auth());

    let task_routes = Router::new()
        .route("/", get(task::get_tasks))
        .route("/dashboard", get(dashboard::dashboard_statistics))
        .route("/activity/:id", post(task::post_task_activity))
        .route("/:id", get(task::get_task))
        .route_layer(require_auth());

    let admin_task_routes = Router::new()
        .route("/create", post(task::create_task))
        .route("/duplicate/:id", post(task::duplicate_task))
        .route("/update/:id", put(task::update_task))
        .route("/create-subtask/:id", post(task::create_sub_task))
        .route("/trash/:id", put(task::trash_task))
        .route("/delete-restore", delete(task::delete_restore_all))
        .route("/delete-restore/:id", delete(task::delete_restore_task))
        .route_layer(middleware::from_fn(admin_authorization))
        .route_layer(require_auth());

    let api_routes = Router::new()
        .nest(
            "/user",
            public_user_routes.merge(user_routes).merge(admin_user_routes),
        )
        .nest("/task", task_routes.merge(admin_task_routes));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
