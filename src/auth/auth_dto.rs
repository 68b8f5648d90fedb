use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::user::UserResponse;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub role: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub status: bool,
    pub message: String,
    pub data: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_defaults() {
        let req: RegisterRequest = serde_json::from_value(serde_json::json!({
            "name": "Grace",
            "title": "Engineer",
            "email": "grace@example.com",
            "password": "secret1"
        }))
        .unwrap();
        assert!(!req.is_admin);
        assert_eq!(req.role, "");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_register_rejects_bad_email() {
        let req: RegisterRequest = serde_json::from_value(serde_json::json!({
            "name": "Grace",
            "title": "Engineer",
            "email": "not-an-email",
            "password": "secret1",
            "isAdmin": true
        }))
        .unwrap();
        assert!(req.is_admin);
        assert!(req.validate().is_err());
    }
}
