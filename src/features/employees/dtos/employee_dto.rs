use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::employees::models::Employee;
use crate::shared::validation::PHONE_REGEX;

fn default_role() -> String {
    "agent".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateEmployeeDto {
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub phone: Option<String>,

    #[serde(default = "default_role")]
    #[validate(length(min = 1, max = 50, message = "Role must be 1 to 50 characters"))]
    pub role: String,

    /// Optional selection password, stored hashed
    #[validate(length(min = 4, max = 128, message = "Password must be 4 to 128 characters"))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateEmployeeDto {
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub phone: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Role must be 1 to 50 characters"))]
    pub role: String,

    /// Replaces the current password when set
    #[validate(length(min = 4, max = 128, message = "Password must be 4 to 128 characters"))]
    pub password: Option<String>,

    /// Drop the password protection. Ignored when `password` is set.
    #[serde(default)]
    pub remove_password: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyPasswordDto {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyPasswordResponseDto {
    pub verified: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmployeeResponseDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: String,
    pub has_password: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Employee> for EmployeeResponseDto {
    fn from(e: Employee) -> Self {
        Self {
            id: e.id,
            has_password: e.password_hash.is_some(),
            first_name: e.first_name,
            last_name: e.last_name,
            email: e.email,
            phone: e.phone,
            role: e.role,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::raw::SafeEmail;
    use fake::faker::name::raw::{FirstName, LastName};
    use fake::locales::{EN, FR_FR};
    use fake::Fake;

    #[test]
    fn test_create_defaults_role_and_validates() {
        let dto: CreateEmployeeDto = serde_json::from_value(serde_json::json!({
            "first_name": "Paul",
            "last_name": "Lambert",
            "password": "12"
        }))
        .unwrap();
        assert_eq!(dto.role, "agent");
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_update_accepts_generated_identity() {
        // FR names carry accents, addresses stay ASCII
        for _ in 0..50 {
            let dto = UpdateEmployeeDto {
                first_name: FirstName(FR_FR).fake(),
                last_name: LastName(FR_FR).fake(),
                email: Some(SafeEmail(EN).fake()),
                phone: None,
                role: "responsable".to_string(),
                password: None,
                remove_password: true,
            };
            assert!(dto.validate().is_ok(), "{:?}", dto);
        }
    }

    #[test]
    fn test_response_never_exposes_hash() {
        let employee = Employee {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            first_name: "Paul".to_string(),
            last_name: "Lambert".to_string(),
            email: None,
            phone: None,
            role: "agent".to_string(),
            password_hash: Some("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(EmployeeResponseDto::from(employee)).unwrap();
        assert_eq!(json["has_password"], true);
        assert!(json.get("password_hash").is_none());
    }
}
