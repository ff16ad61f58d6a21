use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadParams {
    pub file_url: Option<String>,
    pub file_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub file_name: String,
}

/// Download a finished game page into the data directory.
pub async fn upload(
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
) -> Result<Json<UploadResponse>, ApiError> {
    let file_url = params
        .file_url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("fileUrl is required".to_string()))?;

    let file_name = state
        .fetcher
        .save(&file_url, params.file_name.as_deref(), &state.data_dir)
        .await?;

    Ok(Json(UploadResponse {
        message: format!("Saved {}", file_name),
        file_name,
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::routes::test_support::{get_json, setup_test_state};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_upload_requires_url() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path()));
        let (status, json) = get_json(app, "/api/upload").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_upload_rejects_non_http_url() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path()));
        let (status, _) = get_json(app, "/api/upload?fileUrl=file%3A%2F%2F%2Fetc%2Fpasswd").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_rejects_path_in_name() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path()));
        let (status, json) = get_json(
            app,
            "/api/upload?fileUrl=https%3A%2F%2Fexample.test%2Fgame&fileName=..%2Fx.html",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Invalid snapshot name"));
    }
}
