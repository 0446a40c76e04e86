use axum::{extract::Request, middleware::Next, response::Response, Router};
use uuid::Uuid;

use crate::features::auth::model::AuthenticatedUser;

pub fn create_test_user() -> AuthenticatedUser {
    create_user_with_id(Uuid::new_v4())
}

pub fn create_user_with_id(id: Uuid) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: id,
        email: Some(format!("agent-{}@example.test", &id.simple().to_string()[..8])),
        role: "authenticated".to_string(),
        session_id: Some("test-session".to_string()),
    }
}

/// Insert `user` into every request, standing in for the JWT middleware
pub fn with_auth(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                let response: Response = next.run(request).await;
                response
            }
        },
    ))
}
