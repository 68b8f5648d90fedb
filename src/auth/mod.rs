pub mod auth_dto;
pub mod auth_handlers;
pub mod auth_service;
pub mod cookie;
pub mod jwt;
pub mod password;

pub use auth_handlers::{login, logout, register};
pub use auth_service::AuthService;
pub use jwt::{create_jwt, verify_jwt};
pub use password::{hash_password, verify_password};
