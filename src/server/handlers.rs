use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::form::UploadForm;
use super::page::{render_page, PageView};
use super::{AppState, ErrorResponse};
use crate::error::error_markdown;
use crate::pipeline::{Analysis, AnalysisRequest};
use crate::FlavorError;

#[derive(Debug, Deserialize)]
pub struct RecipeRequest {
    pub ingredients: String,
    #[serde(default)]
    pub preferences: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecipeResponse {
    pub recipe: String,
}

pub async fn index() -> Html<String> {
    Html(render_page(&PageView::default()))
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

/// Turn the submitted form into a pipeline request.
fn analysis_request(form: UploadForm) -> Result<AnalysisRequest, (FlavorError, String)> {
    let media = match form.upload {
        Some(upload) => {
            let kind = upload.kind;
            Some(upload.into_media().map_err(|e| (e, kind.to_string()))?)
        }
        None => None,
    };

    Ok(AnalysisRequest {
        media,
        preferences: form.preferences,
        cached_ingredients: form.ingredients,
    })
}

/// Form submission from the browser page. Unreadable forms are shown as an error pane.
pub async fn analyze_page(State(state): State<AppState>, multipart: Multipart) -> Response {
    let form = match UploadForm::read(multipart).await {
        Ok(form) => form,
        Err(rejection) => {
            let analysis = Analysis {
                ingredients: error_markdown(&rejection.message),
                recipe: String::new(),
            };
            let page = render_page(&PageView {
                preferences: "",
                analysis: Some(&analysis),
            });
            return (rejection.status, Html(page)).into_response();
        }
    };
    let preferences = form.preferences.clone().unwrap_or_default();

    let analysis = match analysis_request(form) {
        Ok(request) => state.pipeline.process(request).await,
        Err((e, kind)) => {
            warn!("Rejected {} upload: {}", kind, e);
            Analysis {
                ingredients: error_markdown(format!("Error processing {}: {}", kind, e)),
                recipe: String::new(),
            }
        }
    };

    Html(render_page(&PageView {
        preferences: &preferences,
        analysis: Some(&analysis),
    }))
    .into_response()
}

/// Same as the page, answering with the two panes as JSON
pub async fn analyze_json(State(state): State<AppState>, multipart: Multipart) -> Response {
    let form = match UploadForm::read(multipart).await {
        Ok(form) => form,
        Err(rejection) => return rejection.into_response(),
    };

    match analysis_request(form) {
        Ok(request) => Json(state.pipeline.process(request).await).into_response(),
        Err((e, kind)) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Error processing {}: {}", kind, e),
            }),
        )
            .into_response(),
    }
}

/// Recipe from ingredient text, no media involved
pub async fn recipe_json(
    State(state): State<AppState>,
    Json(request): Json<RecipeRequest>,
) -> Response {
    if request.ingredients.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Ingredient list cannot be empty".to_string(),
            }),
        )
            .into_response();
    }

    info!("Generating recipe from submitted ingredients");
    match state
        .pipeline
        .generate_recipe(&request.ingredients, request.preferences.as_deref())
        .await
    {
        Ok(recipe) => Json(RecipeResponse { recipe }).into_response(),
        Err(e) => {
            warn!("Recipe generation failed: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: format!("Error generating recipe: {}", e),
                }),
            )
                .into_response()
        }
    }
}
