pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::matching::handlers as matching;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/catalog", get(matching::handle_get_catalog))
        // Sessions
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(session::handle_get_session).delete(session::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/display-mode",
            put(session::handle_set_display_mode),
        )
        // Job description
        .route(
            "/api/v1/sessions/:id/job",
            post(matching::handle_analyze_jd).get(matching::handle_get_job),
        )
        // Comparison runs
        .route("/api/v1/sessions/:id/runs", post(matching::handle_run_upload))
        .route(
            "/api/v1/sessions/:id/runs/text",
            post(matching::handle_run_text),
        )
        .route(
            "/api/v1/sessions/:id/runs/latest",
            get(matching::handle_get_latest_run),
        )
        .route(
            "/api/v1/sessions/:id/runs/latest/messages/:candidate",
            get(matching::handle_get_outreach),
        )
        .route(
            "/api/v1/sessions/:id/runs/latest/export",
            get(matching::handle_export_latest_run),
        )
        // Hiring manager history
        .route(
            "/api/v1/sessions/:id/unlock",
            post(session::handle_unlock_history),
        )
        .route(
            "/api/v1/sessions/:id/history",
            get(session::handle_get_history),
        )
        .route(
            "/api/v1/sessions/:id/history/export",
            get(session::handle_export_history),
        )
        .layer(body_limit)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::access::SharedSecretGate;
    use crate::config::Config;
    use crate::extract::docx::tests::docx_fixture;
    use crate::extract::pdf::tests::pdf_fixture;
    use crate::extract::DocumentExtractor;
    use crate::matching::catalog::KeywordCatalog;
    use crate::matching::jd_analyzer::JdAnalyzer;
    use crate::session::store::SessionStore;

    const SECRET: &str = "wasabi-test-secret";
    const BOUNDARY: &str = "----skillmatch-boundary";

    fn app() -> Router {
        let config = Config::from_lookup(|key: &str| match key {
            "HIRING_MANAGER_SECRET" => Some(SECRET.to_string()),
            _ => None,
        })
        .unwrap();
        let analyzer = JdAnalyzer::new(KeywordCatalog::builtin().unwrap()).unwrap();

        build_router(AppState {
            access_gate: Arc::new(SharedSecretGate::new(config.hiring_manager_secret.clone())),
            config,
            analyzer: Arc::new(analyzer),
            extractor: Arc::new(DocumentExtractor::new().unwrap()),
            sessions: SessionStore::new(),
        })
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    async fn send_json(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let (status, bytes) = send(app, request).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_session(app: &Router) -> String {
        let (status, body) = send_json(app, Method::POST, "/api/v1/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        body["session_id"].as_str().unwrap().to_string()
    }

    fn multipart_body(files: &[(&str, Vec<u8>)], profile_text: Option<&str>) -> Vec<u8> {
        let mut body = Vec::new();
        for (file_name, bytes) in files {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resumes\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        if let Some(text) = profile_text {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"profile_text\"\r\n\r\n{text}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn multipart_request(uri: &str, body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app();
        let (status, body) = send_json(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["catalog_terms"], 47);
    }

    #[tokio::test]
    async fn test_catalog_lists_terms_in_order() {
        let app = app();
        let (status, body) = send_json(&app, Method::GET, "/api/v1/catalog", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["terms"][0], "Python");
        assert_eq!(body["terms"][1], "Go");
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let app = app();
        let uri = format!("/api/v1/sessions/{}", uuid::Uuid::new_v4());
        let (status, body) = send_json(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_full_matching_flow() {
        let app = app();
        let id = create_session(&app).await;

        let (status, job) = send_json(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/job"),
            Some(json!({
                "jd_text": "Job Title: Backend Engineer\nRequires Python, Docker and AWS experience"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(job["title"], "Backend Engineer");
        assert_eq!(job["keywords"], json!(["AWS", "Docker", "Python"]));

        let (status, run) = send_json(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/runs/text"),
            Some(json!({
                "candidates": [
                    {"name": "jane.pdf", "text": "I have 5 years of Python and Docker experience"}
                ],
                "profile_text": "AWS certified"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(run["status"], "completed");
        assert_eq!(run["scoreboard"][0]["candidate"], "jane");
        assert_eq!(run["scoreboard"][0]["score"], "66.7%");
        assert_eq!(run["scoreboard"][0]["matched_skills"], "Docker, Python");
        assert_eq!(run["scoreboard"][0]["missing_skills"], "AWS");
        assert_eq!(run["results"][0]["score"], 66.7);
        assert_eq!(run["scoreboard"][1]["candidate"], "LinkedIn Paste");
        assert_eq!(run["scoreboard"][1]["score"], "33.3%");

        let (status, outreach) = send_json(
            &app,
            Method::GET,
            &format!("/api/v1/sessions/{id}/runs/latest/messages/jane"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            outreach["message"],
            "Hi jane, your experience with Docker, Python aligns well with our Backend Engineer role. Let's connect!"
        );

        let request = Request::builder()
            .uri(format!("/api/v1/sessions/{id}/runs/latest/export"))
            .body(Body::empty())
            .unwrap();
        let (status, csv) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        let csv = String::from_utf8(csv).unwrap();
        assert!(csv.starts_with("Candidate,Score,Matched Skills,Missing Skills,InMail,Date"));
        assert!(csv.contains(r#"jane,66.7%,"Docker, Python",AWS,"#));
    }

    #[tokio::test]
    async fn test_history_requires_unlock() {
        let app = app();
        let id = create_session(&app).await;
        send_json(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/runs/text"),
            Some(json!({"candidates": [{"name": "a", "text": "Rust"}]})),
        )
        .await;

        let history_uri = format!("/api/v1/sessions/{id}/history");
        let (status, _) = send_json(&app, Method::GET, &history_uri, None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let unlock_uri = format!("/api/v1/sessions/{id}/unlock");
        let (status, body) = send_json(
            &app,
            Method::POST,
            &unlock_uri,
            Some(json!({"secret": "wrong"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["message"], "Incorrect password.");

        let (status, _) = send_json(&app, Method::GET, &history_uri, None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send_json(
            &app,
            Method::POST,
            &unlock_uri,
            Some(json!({"secret": SECRET})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["history_unlocked"], true);

        let (status, history) = send_json(&app, Method::GET, &history_uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history["total"], 1);
        assert_eq!(history["entries"][0]["candidate_name"], "a");

        let request = Request::builder()
            .uri(format!("/api/v1/sessions/{id}/history/export"))
            .body(Body::empty())
            .unwrap();
        let (status, csv) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(String::from_utf8(csv).unwrap().lines().count(), 2);
    }

    #[tokio::test]
    async fn test_empty_history_reports_message() {
        let app = app();
        let id = create_session(&app).await;
        send_json(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/unlock"),
            Some(json!({"secret": SECRET})),
        )
        .await;

        let (status, history) = send_json(
            &app,
            Method::GET,
            &format!("/api/v1/sessions/{id}/history"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history["total"], 0);
        assert_eq!(history["message"], "No matching history available yet.");
    }

    #[tokio::test]
    async fn test_run_without_input_reports_no_data() {
        let app = app();
        let id = create_session(&app).await;

        let (status, run) = send_json(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/runs/text"),
            Some(json!({"candidates": [], "profile_text": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(run["status"], "no_data");
        assert_eq!(run["message"], "No data to compare.");

        let (status, _) = send_json(
            &app,
            Method::GET,
            &format!("/api/v1/sessions/{id}/runs/latest"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_empty_jd_scores_zero() {
        let app = app();
        let id = create_session(&app).await;

        let (status, job) = send_json(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/job"),
            Some(json!({"jd_text": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(job["title"], "");
        assert_eq!(job["keywords"], json!([]));

        let (_, run) = send_json(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/runs/text"),
            Some(json!({"candidates": [{"name": "x.docx", "text": "Python"}]})),
        )
        .await;
        assert_eq!(run["results"][0]["score"], 0.0);
        assert_eq!(run["results"][0]["matched_keywords"], json!([]));
        assert_eq!(run["results"][0]["missing_keywords"], json!([]));
        assert_eq!(run["scoreboard"][0]["score"], "0%");
    }

    #[tokio::test]
    async fn test_multipart_upload_scores_docx_then_profile() {
        let app = app();
        let id = create_session(&app).await;
        send_json(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/job"),
            Some(json!({"jd_text": "Position: Platform Engineer\nKubernetes, Terraform and Go"})),
        )
        .await;

        let docx = docx_fixture(&["Sam Lee", "Kubernetes and Terraform at scale"]);
        let body = multipart_body(&[("Sam Lee.docx", docx)], Some("Golang and Kubernetes"));
        let (status, bytes) = send(
            &app,
            multipart_request(&format!("/api/v1/sessions/{id}/runs"), body),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let run: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(run["job_title"], "Platform Engineer");
        assert_eq!(run["scoreboard"][0]["candidate"], "Sam Lee");
        assert_eq!(run["scoreboard"][0]["matched_skills"], "Kubernetes, Terraform");
        assert_eq!(run["scoreboard"][0]["missing_skills"], "Go");
        assert_eq!(run["scoreboard"][1]["candidate"], "LinkedIn Paste");
        // containment: "Go" is found inside "Golang"
        assert_eq!(run["scoreboard"][1]["matched_skills"], "Go, Kubernetes");
    }

    #[tokio::test]
    async fn test_multipart_unsupported_type_is_rejected() {
        let app = app();
        let id = create_session(&app).await;

        let body = multipart_body(&[("resume.txt", b"Python".to_vec())], None);
        let (status, bytes) = send(
            &app,
            multipart_request(&format!("/api/v1/sessions/{id}/runs"), body),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(error["error"]["code"], "UNSUPPORTED_DOCUMENT");
    }

    #[tokio::test]
    async fn test_history_export_is_locked_until_unlock() {
        let app = app();
        let id = create_session(&app).await;

        let (status, body) = send_json(
            &app,
            Method::GET,
            &format!("/api/v1/sessions/{id}/history/export"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn test_wrong_secret_after_unlock_keeps_history_open() {
        let app = app();
        let id = create_session(&app).await;
        let unlock_uri = format!("/api/v1/sessions/{id}/unlock");

        let (status, _) =
            send_json(&app, Method::POST, &unlock_uri, Some(json!({"secret": SECRET}))).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) =
            send_json(&app, Method::POST, &unlock_uri, Some(json!({"secret": "wrong"}))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, session) =
            send_json(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(session["history_unlocked"], true);

        let (status, _) = send_json(
            &app,
            Method::GET,
            &format!("/api/v1/sessions/{id}/history"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_deleted_session_is_404() {
        let app = app();
        let id = create_session(&app).await;
        let uri = format!("/api/v1/sessions/{id}");

        let (status, _) = send_json(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send_json(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send_json(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_multipart_upload_scores_pdf() {
        let app = app();
        let id = create_session(&app).await;
        send_json(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/job"),
            Some(json!({"jd_text": "Job Title: Data Engineer\nPython, Spark and Airflow"})),
        )
        .await;

        let pdf = pdf_fixture(&["Riya Patel", "Python and Spark pipelines"]);
        let body = multipart_body(&[("Riya Patel.pdf", pdf)], None);
        let (status, bytes) = send(
            &app,
            multipart_request(&format!("/api/v1/sessions/{id}/runs"), body),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let run: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(run["scoreboard"][0]["candidate"], "Riya Patel");
        assert_eq!(run["scoreboard"][0]["matched_skills"], "Python, Spark");
        assert_eq!(run["scoreboard"][0]["missing_skills"], "Airflow");
        assert_eq!(run["scoreboard"][0]["score"], "66.7%");
    }

    #[tokio::test]
    async fn test_blank_candidate_name_is_rejected() {
        let app = app();
        let id = create_session(&app).await;

        let (status, body) = send_json(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/runs/text"),
            Some(json!({"candidates": [{"name": "  ", "text": "Python"}]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (status, _) = send_json(
            &app,
            Method::GET,
            &format!("/api/v1/sessions/{id}/runs/latest"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_display_mode_toggle() {
        let app = app();
        let id = create_session(&app).await;

        let (status, summary) = send_json(
            &app,
            Method::PUT,
            &format!("/api/v1/sessions/{id}/display-mode"),
            Some(json!({"display_mode": "dark"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(summary["display_mode"], "dark");
    }
}
