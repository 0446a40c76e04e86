use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::features::inspections::handlers;
use crate::features::inspections::services::InspectionService;

pub fn routes(service: Arc<InspectionService>) -> Router {
    Router::new()
        .route(
            "/api/inspections",
            get(handlers::list_inspections).post(handlers::create_inspection),
        )
        .route(
            "/api/inspections/{id}",
            get(handlers::get_inspection)
                .put(handlers::update_inspection)
                .delete(handlers::delete_inspection),
        )
        .route(
            "/api/inspections/{id}/signatures/{party}",
            put(handlers::save_signature),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::inspections::fixtures::{general_fields, signature};
    use crate::features::inspections::models::TypeEtatDesLieux;
    use crate::features::inspections::stores::FakeInspectionStore;
    use crate::features::photos::PhotoUploader;
    use crate::modules::storage::FakeObjectStorage;
    use crate::shared::test_helpers::{create_test_user, with_auth};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;

    fn server() -> TestServer {
        let uploader = Arc::new(PhotoUploader::new(Arc::new(FakeObjectStorage::default())));
        let service = Arc::new(InspectionService::new(
            Arc::new(FakeInspectionStore::default()),
            uploader,
            Vec::new(),
        ));
        TestServer::new(with_auth(routes(service), create_test_user())).unwrap()
    }

    #[tokio::test]
    async fn test_create_list_and_sign() {
        let server = server();

        let created = server
            .post("/api/inspections")
            .json(&general_fields(TypeEtatDesLieux::Entree))
            .await;
        created.assert_status(StatusCode::CREATED);
        let body = created.json::<Value>();
        let id = body["data"]["id"].as_str().unwrap().to_string();
        assert_eq!(body["data"]["statut"], "en_cours");
        assert_eq!(body["data"]["type_bien"], "t2_t3");

        let listed = server.get("/api/inspections").await;
        listed.assert_status_ok();
        assert_eq!(listed.json::<Value>()["meta"]["total"], 1);

        let signed = server
            .put(&format!("/api/inspections/{}/signatures/locataire", id))
            .json(&signature("Camille Martin"))
            .await;
        signed.assert_status_ok();

        let mut unsigned = signature("Camille Martin");
        unsigned.consent = false;
        let refused = server
            .put(&format!("/api/inspections/{}/signatures/bailleur", id))
            .json(&unsigned)
            .await;
        refused.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_inspection_is_not_found() {
        let server = server();
        let response = server
            .get(&format!("/api/inspections/{}", uuid::Uuid::new_v4()))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }
}
