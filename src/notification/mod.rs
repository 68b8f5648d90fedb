pub mod notification_dto;
pub mod notification_handlers;
pub mod notification_ledger;
pub mod notification_models;
pub mod notification_repository;
pub mod notification_service;

pub use notification_handlers::{get_notifications, mark_notification_read, notification_stream};
pub use notification_ledger::{assignment_message, ReadTarget};
pub use notification_models::{Notification, TaskRef, UnreadNotification};
pub use notification_repository::NotificationRepository;
pub use notification_service::NotificationService;
