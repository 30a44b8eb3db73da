//! Result-file endpoints: listing and upload intake

use axum::{
    extract::{Multipart, State},
    response::{IntoResponse, Redirect},
    Json,
};
use tracing::{info, warn};

use crate::{
    app::AppContext,
    errors::{RestError, RestResult},
    models::FileListResponse,
};

/// Content types accepted as ZIP archives
const ZIP_CONTENT_TYPES: [&str; 2] = ["application/x-zip-compressed", "application/zip"];

/// Content types accepted as tabular result data
const CSV_CONTENT_TYPES: [&str; 2] = ["application/vnd.ms-excel", "text/csv"];

/// Form field the console uploads under
const UPLOAD_FIELD: &str = "upload";

/// List stored result files as paths relative to the results root
pub async fn list_files(State(ctx): State<AppContext>) -> RestResult<impl IntoResponse> {
    let files = ctx.files.store.list().await?;
    Ok(Json(FileListResponse { files }))
}

/// Accept an uploaded CSV or ZIP of previous results
///
/// Dispatches on the declared content type of the `upload` field: archives
/// are expanded into the results root, tabular files are stored under
/// their base name, everything else is rejected before touching storage.
/// Success redirects back to the console page.
pub async fn upload_file(
    State(ctx): State<AppContext>,
    mut multipart: Multipart,
) -> RestResult<impl IntoResponse> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RestError::bad_request(format!("Malformed upload: {}", e)))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload.csv").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| RestError::bad_request(format!("Malformed upload: {}", e)))?;

        if ZIP_CONTENT_TYPES.contains(&content_type.as_str()) {
            ctx.files.store.extract_archive(data.to_vec()).await?;
        } else if CSV_CONTENT_TYPES.contains(&content_type.as_str()) {
            ctx.files.store.save(&file_name, &data).await?;
        } else {
            warn!("Rejected upload {} with content type {}", file_name, content_type);
            return Err(RestError::bad_request(
                "Uploaded file invalid type (CSV and ZIP only)",
            ));
        }

        info!("Accepted upload {} ({} bytes)", file_name, data.len());
        return Ok(Redirect::to("/"));
    }

    Err(RestError::bad_request("No upload field in request"))
}
