use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::profiles::models::Profile;
use crate::shared::validation::PHONE_REGEX;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[validate(length(max = 100, message = "First name must be at most 100 characters"))]
    pub first_name: Option<String>,

    #[validate(length(max = 100, message = "Last name must be at most 100 characters"))]
    pub last_name: Option<String>,

    #[validate(length(max = 200, message = "Company must be at most 200 characters"))]
    pub company: Option<String>,

    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub phone: Option<String>,

    #[validate(length(max = 500, message = "Address must be at most 500 characters"))]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponseDto {
    pub id: Uuid,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Absent until the profile is saved once
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProfileResponseDto {
    /// Profile of an account that never saved one
    pub fn empty(id: Uuid, email: Option<String>) -> Self {
        Self {
            id,
            email,
            first_name: None,
            last_name: None,
            company: None,
            phone: None,
            address: None,
            updated_at: None,
        }
    }

    pub fn from_profile(profile: Profile, email: Option<String>) -> Self {
        Self {
            id: profile.id,
            email,
            first_name: profile.first_name,
            last_name: profile.last_name,
            company: profile.company,
            phone: profile.phone,
            address: profile.address,
            updated_at: Some(profile.updated_at),
        }
    }
}

/// Trim and turn blank strings into `None`
pub fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl UpdateProfileDto {
    pub fn normalized(self) -> Self {
        Self {
            first_name: normalize(self.first_name),
            last_name: normalize(self.last_name),
            company: normalize(self.company),
            phone: normalize(self.phone),
            address: normalize(self.address),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_drops_blank_values() {
        let dto = UpdateProfileDto {
            first_name: Some("  Claire ".to_string()),
            last_name: Some("   ".to_string()),
            company: None,
            phone: Some("".to_string()),
            address: None,
        }
        .normalized();

        assert_eq!(dto.first_name.as_deref(), Some("Claire"));
        assert_eq!(dto.last_name, None);
        assert_eq!(dto.phone, None);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_phone() {
        let dto = UpdateProfileDto {
            first_name: None,
            last_name: None,
            company: None,
            phone: Some("call me".to_string()),
            address: None,
        };
        assert!(dto.validate().unwrap_err().field_errors().contains_key("phone"));
    }
}
