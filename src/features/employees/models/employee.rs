use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::employees::password::verify_password;
use crate::core::error::Result;

#[derive(Debug, Clone, FromRow)]
pub struct Employee {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: String,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    /// Employees without a password can always be selected
    pub fn verify(&self, password: &str) -> Result<bool> {
        match &self.password_hash {
            Some(hash) => verify_password(password, hash),
            None => Ok(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::employees::password::hash_password;

    fn employee(password_hash: Option<String>) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            first_name: "Nadia".to_string(),
            last_name: "Roux".to_string(),
            email: None,
            phone: None,
            role: "agent".to_string(),
            password_hash,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_open_employee_always_verifies() {
        assert!(employee(None).verify("anything").unwrap());
    }

    #[test]
    fn test_protected_employee_checks_hash() {
        let protected = employee(Some(hash_password("1234abcd").unwrap()));
        assert!(protected.verify("1234abcd").unwrap());
        assert!(!protected.verify("abcd1234").unwrap());
    }
}
