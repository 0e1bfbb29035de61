pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::resumes::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/resumes", post(handlers::handle_create_resume))
        .route(
            "/api/resumes/:user_id",
            get(handlers::handle_get_resumes)
                .put(handlers::handle_update_resume)
                .delete(handlers::handle_delete_resume),
        )
        .route(
            "/api/resumes/:user_id/export",
            get(handlers::handle_export_resume),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use resume::auth::encode_unsigned;
    use resume::{ResumeDraft, Section};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::{Config, StoreBackend};
    use crate::resumes::store::{MemoryResumeStore, ResumeStore};

    fn test_app() -> (Router, Arc<MemoryResumeStore>) {
        let store = Arc::new(MemoryResumeStore::new());
        let state = AppState {
            store: store.clone(),
            config: Config {
                store: StoreBackend::Memory,
                database_url: None,
                port: 0,
                rust_log: "info".to_string(),
            },
        };
        (build_router(state), store)
    }

    fn token_for(user_id: &str) -> String {
        encode_unsigned(&json!({ "userId": user_id }))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    fn sample_draft() -> ResumeDraft {
        serde_json::from_value(json!({
            "basicInfo": {
                "name": "Asha Rao",
                "contact": "9876543210",
                "address": "12 Park Street, Pune",
                "email": "asha@example.com",
                "linkedin": "https://www.linkedin.com/in/asharao",
                "github": "https://github.com/asharao",
                "objective": "Backend engineer"
            },
            "education": [{
                "degree": "B.Tech",
                "institute": "COEP",
                "fieldOfStudy": "Computer Science",
                "location": "Pune",
                "startDate": "2016-07-01",
                "endDate": "2020-05-31",
                "cgpa": "8.4"
            }],
            "workExperience": [{
                "company": "Acme",
                "designation": "Engineer",
                "startDate": "2020-07-01",
                "endDate": "2023-01-15"
            }],
            "skills": {
                "technical": ["Rust", "PostgreSQL"],
                "soft": ["Mentoring"],
                "additional": ["Chess"]
            },
            "achievements": ["Hackathon winner"],
            "projects": ["Compiler"],
            "extracurricular": ["Chess club"],
            "leadership": ["Tech lead"]
        }))
        .unwrap()
    }

    fn section_body(user_id: &str, draft: &ResumeDraft, section: Section) -> Value {
        let mut body = serde_json::to_value(resume::ResumePatch::for_section(draft, section)).unwrap();
        body["userId"] = json!(user_id);
        body
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = test_app();
        let (status, body) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["store"], "memory");
    }

    #[tokio::test]
    async fn test_missing_credential_is_unauthorized() {
        let (app, store) = test_app();
        let body = json!({ "projects": ["Compiler"] });
        let (status, body) = send(&app, Method::POST, "/api/resumes", None, Some(body)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
        assert!(store.find_by_user("u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_credential_is_unauthorized() {
        let (app, _) = test_app();
        let (status, _) =
            send(&app, Method::GET, "/api/resumes/u1", Some("not-a-jwt"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_new_user_gets_empty_data() {
        let (app, _) = test_app();
        let token = token_for("u1");
        let (status, body) = send(&app, Method::GET, "/api/resumes/u1", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "data": [] }));
    }

    #[tokio::test]
    async fn test_other_users_resume_is_forbidden() {
        let (app, _) = test_app();
        let token = token_for("u1");
        let (status, _) = send(&app, Method::GET, "/api/resumes/u2", Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let body = json!({ "userId": "u2", "projects": ["Compiler"] });
        let (status, _) = send(&app, Method::POST, "/api/resumes", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_create_then_fetch_returns_section() {
        let (app, _) = test_app();
        let token = token_for("u1");
        let draft = sample_draft();

        let body = section_body("u1", &draft, Section::BasicInfo);
        let (status, created) =
            send(&app, Method::POST, "/api/resumes", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["data"]["userId"], "u1");
        assert_eq!(created["data"]["basicInfo"]["name"], "Asha Rao");

        let (status, fetched) =
            send(&app, Method::GET, "/api/resumes/u1", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["data"].as_array().unwrap().len(), 1);
        assert_eq!(
            fetched["data"][0]["basicInfo"],
            serde_json::to_value(&draft.basic_info).unwrap()
        );
    }

    #[tokio::test]
    async fn test_duplicate_create_conflicts() {
        let (app, _) = test_app();
        let token = token_for("u1");
        let body = json!({ "projects": ["Compiler"] });
        let (status, _) =
            send(&app, Method::POST, "/api/resumes", Some(&token), Some(body.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, body) =
            send(&app, Method::POST, "/api/resumes", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_validation_failure_returns_field_errors() {
        let (app, store) = test_app();
        let token = token_for("u1");
        let mut body = section_body("u1", &sample_draft(), Section::BasicInfo);
        body["basicInfo"]["contact"] = json!("12345");

        let (status, response) =
            send(&app, Method::POST, "/api/resumes", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response,
            json!({ "errors": [{
                "field": "basicInfo.contact",
                "message": "Contact must be exactly 10 digits"
            }] })
        );
        assert!(store.find_by_user("u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rejected_update_leaves_document_unchanged() {
        let (app, store) = test_app();
        let token = token_for("u1");
        let draft = sample_draft();
        let body = section_body("u1", &draft, Section::WorkExperience);
        send(&app, Method::POST, "/api/resumes", Some(&token), Some(body)).await;

        let body = json!({
            "workExperience": [{
                "company": "Beta",
                "designation": "Lead",
                "startDate": "2023-02-01",
                "endDate": "2022-01-01"
            }],
            "projects": ["Shiny"]
        });
        let (status, response) =
            send(&app, Method::PUT, "/api/resumes/u1", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["errors"][0]["field"], "workExperience[0].endDate");

        let stored = store.find_by_user("u1").await.unwrap().unwrap();
        assert_eq!(stored.draft.work_experience, draft.work_experience);
        assert!(stored.draft.projects.is_empty());
    }

    #[tokio::test]
    async fn test_blank_required_fields_rejected_on_update() {
        let (app, store) = test_app();
        let token = token_for("u1");
        let draft = sample_draft();
        let body = section_body("u1", &draft, Section::BasicInfo);
        send(&app, Method::POST, "/api/resumes", Some(&token), Some(body)).await;

        let body = json!({
            "userId": "u1",
            "basicInfo": { "name": "", "contact": "", "email": "", "address": "", "objective": "" }
        });
        let (status, response) =
            send(&app, Method::PUT, "/api/resumes/u1", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["errors"].as_array().unwrap().len(), 5);
        assert_eq!(
            response["errors"][1],
            json!({ "field": "basicInfo.contact", "message": "Contact is required" })
        );

        let stored = store.find_by_user("u1").await.unwrap().unwrap();
        assert_eq!(stored.draft.basic_info, draft.basic_info);
    }

    #[tokio::test]
    async fn test_wrong_section_type_reports_field_errors() {
        let (app, store) = test_app();
        let token = token_for("u1");
        let body = json!({ "projects": ["Compiler"] });
        send(&app, Method::POST, "/api/resumes", Some(&token), Some(body)).await;

        let body = json!({ "achievements": "" });
        let (status, response) =
            send(&app, Method::PUT, "/api/resumes/u1", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response,
            json!({ "errors": [{ "field": "achievements", "message": "Achievements must be a list" }] })
        );

        let stored = store.find_by_user("u1").await.unwrap().unwrap();
        assert!(stored.draft.achievements.is_empty());
    }

    #[tokio::test]
    async fn test_update_without_document_is_not_found() {
        let (app, _) = test_app();
        let token = token_for("u1");
        let body = json!({ "projects": ["Compiler"] });
        let (status, _) =
            send(&app, Method::PUT, "/api/resumes/u1", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_section_by_section_round_trip() {
        let (app, _) = test_app();
        let token = token_for("u1");
        let draft = sample_draft();

        let mut sections = Section::ALL.into_iter();
        let first = sections.next().unwrap();
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/resumes",
            Some(&token),
            Some(section_body("u1", &draft, first)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        for section in sections {
            let (status, _) = send(
                &app,
                Method::PUT,
                "/api/resumes/u1",
                Some(&token),
                Some(section_body("u1", &draft, section)),
            )
            .await;
            assert_eq!(status, StatusCode::OK, "saving {section}");
        }

        let (_, fetched) = send(&app, Method::GET, "/api/resumes/u1", Some(&token), None).await;
        let stored: ResumeDraft = serde_json::from_value(fetched["data"][0].clone()).unwrap();
        assert_eq!(stored, draft);
    }

    #[tokio::test]
    async fn test_delete_then_fetch_is_empty() {
        let (app, _) = test_app();
        let token = token_for("u1");
        let body = json!({ "projects": ["Compiler"] });
        send(&app, Method::POST, "/api/resumes", Some(&token), Some(body)).await;

        let (status, _) =
            send(&app, Method::DELETE, "/api/resumes/u1", Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, fetched) = send(&app, Method::GET, "/api/resumes/u1", Some(&token), None).await;
        assert_eq!(fetched, json!({ "data": [] }));

        let (status, _) =
            send(&app, Method::DELETE, "/api/resumes/u1", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_export_returns_markdown_attachment() {
        let (app, _) = test_app();
        let token = token_for("u1");
        let body = section_body("u1", &sample_draft(), Section::BasicInfo);
        send(&app, Method::POST, "/api/resumes", Some(&token), Some(body)).await;

        let request = Request::builder()
            .uri("/api/resumes/u1/export")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"asha-rao-resume.md\""
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.starts_with("# Asha Rao"));
    }
}
