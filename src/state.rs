use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::{
    auth::AuthService,
    dashboard::DashboardService,
    db::DbPool,
    notification::{Notification, NotificationRepository, NotificationService},
    task::{TaskRepository, TaskService},
    user::{UserRepository, UserService},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub notification_tx: broadcast::Sender<Notification>,
    pub user_service: UserService,
    pub task_service: TaskService,
    pub dashboard_service: DashboardService,
    pub notification_service: NotificationService,
    pub auth_service: AuthService,
}

impl AppState {
    pub fn new(db: DbPool, config: Arc<Config>) -> Self {
        let (notification_tx, _) = broadcast::channel(100);

        let user_repository = UserRepository::new(db.clone());
        let task_repository = TaskRepository::new(db.clone());
        let notification_repository = NotificationRepository::new(db.clone());

        let user_service = UserService::new(user_repository.clone());
        let task_service = TaskService::new(
            db.clone(),
            task_repository.clone(),
            notification_repository.clone(),
            notification_tx.clone(),
        );
        let dashboard_service =
            DashboardService::new(task_repository.clone(), user_repository.clone());
        let notification_service = NotificationService::new(notification_repository.clone());
        let auth_service = AuthService::new(user_repository.clone(), config.clone());

        Self {
            config,
            notification_tx,
            user_service,
            task_service,
            dashboard_service,
            notification_service,
            auth_service,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub cookie_secure: bool,
    pub host: String,
    pub port: u16,
    pub frontend_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_expiration_hours: parsed("JWT_EXPIRATION_HOURS", 24)?,
            cookie_secure: parsed("COOKIE_SECURE", false)?,
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT", 8800)?,
            frontend_origin: std::env::var("FRONTEND_ORIGIN").ok(),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn parsed<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}
