use axum::{
    Json, Router,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{AppState, error::ApiError};
use crate::generator::outlet::ExcelOutlet;
use crate::generator::workflow::launch;
use crate::types::{InterviewResponse, RunOutcome};

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Deserialize)]
pub struct InterviewRequest {
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct DocumentationRequest {
    pub request: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportedFile {
    pub file_path: PathBuf,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/generate-interview", post(generate_interview))
        .route("/generate_documentation", post(generate_documentation))
        .route("/download_excel/:filename", get(download_excel))
        .route("/download-excel", get(download_latest_excel))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// 执行完整调研并以 `{summary, interviews, personas}` 返回
pub async fn generate_interview(
    State(state): State<AppState>,
    Json(body): Json<InterviewRequest>,
) -> Result<Json<InterviewResponse>, ApiError> {
    let outcome = launch(&state.context(), &body.prompt).await?;
    Ok(Json(InterviewResponse::from(outcome)))
}

/// 执行完整调研并返回包含Excel路径的完整结果
pub async fn generate_documentation(
    State(state): State<AppState>,
    Json(body): Json<DocumentationRequest>,
) -> Result<Json<RunOutcome>, ApiError> {
    let outcome = launch(&state.context(), &body.request).await?;
    Ok(Json(outcome))
}

/// 下载输出目录中已导出的文件，只接受不含路径的文件名
pub async fn download_excel(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if !is_plain_file_name(&filename) {
        return Err(ApiError::NotFound);
    }

    let path = state.config.output_dir.join(&filename);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(ApiError::NotFound),
        Err(e) => return Err(ApiError::Internal(e.into())),
    };

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    ))
}

/// 每个请求独立运行，服务端不保留访谈，因此这里导出的是只有表头的工作簿
pub async fn download_latest_excel(
    State(state): State<AppState>,
) -> Result<Json<ExportedFile>, ApiError> {
    let outlet = ExcelOutlet::new(&state.config.output_dir)?;
    let file_path = outlet.export_default(&[], "")?;
    Ok(Json(ExportedFile { file_path }))
}

pub async fn health_check() -> &'static str {
    "OK"
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && std::path::Path::new(name).file_name() == Some(std::ffi::OsStr::new(name))
}
