use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Caller identity extracted from a validated access token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Auth server user id, also the owner key of every row
    pub sub: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Database role claim (`authenticated` for signed-in users)
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl AuthenticatedUser {
    pub fn id(&self) -> Uuid {
        self.sub
    }

    pub fn owns(&self, owner_id: Uuid) -> bool {
        self.sub == owner_id
    }
}
