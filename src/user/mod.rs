pub mod user_dto;
pub mod user_handlers;
pub mod user_models;
pub mod user_repository;
pub mod user_service;
pub mod user_set;

pub use user_dto::MessageResponse;
pub use user_handlers::{
    activate_user_profile, change_password, delete_user_profile, get_team_list, update_profile,
};
pub use user_models::{RecentUser, TaskMember, TeamMember, UserResponse};
pub use user_repository::UserRepository;
pub use user_service::UserService;
pub use user_set::UserSet;
