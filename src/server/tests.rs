#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::generator::research::AgentType;
    use crate::llm::testing::ScriptedGateway;
    use crate::server::{AppState, create_router};
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        response::Response,
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_router(temp_dir: &TempDir, gateway: ScriptedGateway) -> Router {
        let mut config = Config {
            output_dir: temp_dir.path().join("output"),
            ..Default::default()
        };
        config.research.subjects_per_iteration = 2;
        config.research.max_iterations = 1;
        create_router(AppState::new(config, Arc::new(gateway)))
    }

    fn research_gateway() -> ScriptedGateway {
        ScriptedGateway::new()
            .with_responder(AgentType::PersonaSynthesizer, |_| {
                "佐藤,主婦,30代,女性,専業主婦\n鈴木,学生,20代,男性,大学生".to_string()
            })
            .with_responder(AgentType::InterviewQuestion, |_| "何を重視しますか？".to_string())
            .with_responder(AgentType::InterviewAnswer, |_| "価格です".to_string())
            .with_responder(AgentType::SufficiencyEvaluator, |_| {
                "reason: 十分\nis_sufficient: true".to_string()
            })
            .with_responder(AgentType::ReportGenerator, |_| "調査レポート".to_string())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let temp_dir = TempDir::new().unwrap();
        let response = test_router(&temp_dir, ScriptedGateway::new())
            .oneshot(get("/health"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"OK");
    }

    #[tokio::test]
    async fn test_generate_interview_returns_summary_interviews_personas() {
        let temp_dir = TempDir::new().unwrap();
        let response = test_router(&temp_dir, research_gateway())
            .oneshot(post_json(
                "/generate-interview",
                json!({ "prompt": "新しいスナック菓子" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["summary"], "調査レポート");
        assert_eq!(body["interviews"].as_array().unwrap().len(), 2);
        assert_eq!(body["interviews"][0]["answer"], "価格です");
        assert_eq!(body["personas"][0]["age"], "30代");
        assert_eq!(body["personas"][1]["position"], "大学生");
        assert!(body.get("excel_path").is_none());
    }

    #[tokio::test]
    async fn test_generate_interview_decodes_json_report() {
        let temp_dir = TempDir::new().unwrap();
        let gateway = research_gateway().with_responder(AgentType::ReportGenerator, |_| {
            r#"{"summary": "JSON形式のレポート"}"#.to_string()
        });
        let response = test_router(&temp_dir, gateway)
            .oneshot(post_json("/generate-interview", json!({ "prompt": "x" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["summary"], "JSON形式のレポート");
        assert_eq!(body["interviews"].as_array().unwrap().len(), 2);
        assert_eq!(body["personas"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_generate_documentation_then_download() {
        let temp_dir = TempDir::new().unwrap();
        let router = test_router(&temp_dir, research_gateway());

        let response = router
            .clone()
            .oneshot(post_json(
                "/generate_documentation",
                json!({ "request": "新しいスナック菓子" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["stop_reason"], "sufficient");
        assert_eq!(body["iterations"], 1);

        let excel_path = body["excel_path"].as_str().unwrap().to_string();
        let filename = std::path::Path::new(&excel_path)
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();

        let response = router
            .oneshot(get(&format!("/download_excel/{}", filename)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        let bytes = body_bytes(response).await;
        assert_eq!(bytes, std::fs::read(&excel_path).unwrap());
    }

    #[tokio::test]
    async fn test_download_missing_file_is_404() {
        let temp_dir = TempDir::new().unwrap();
        let router = test_router(&temp_dir, ScriptedGateway::new());

        let response = router
            .clone()
            .oneshot(get("/download_excel/nothing.xlsx"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({ "detail": "File not found" }));

        // 路径穿越同样视为不存在
        std::fs::write(temp_dir.path().join("secret.xlsx"), b"x").unwrap();
        let response = router
            .oneshot(get("/download_excel/..%2Fsecret.xlsx"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_download_latest_writes_header_only_workbook() {
        let temp_dir = TempDir::new().unwrap();
        let response = test_router(&temp_dir, ScriptedGateway::new())
            .oneshot(get("/download-excel"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let file_path = std::path::PathBuf::from(body["file_path"].as_str().unwrap());
        assert_eq!(
            file_path,
            temp_dir.path().join("output").join("interview_results.xlsx")
        );
        assert!(file_path.exists());
    }

    #[tokio::test]
    async fn test_pipeline_failure_is_500_with_detail() {
        let temp_dir = TempDir::new().unwrap();
        let gateway = ScriptedGateway::new().failing_on(AgentType::PersonaSynthesizer);

        let response = test_router(&temp_dir, gateway)
            .oneshot(post_json("/generate-interview", json!({ "prompt": "x" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.contains("persona_synthesizer"));
    }
}
