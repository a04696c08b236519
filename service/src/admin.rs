//! In-place file editing for the administrative surface.
//!
//! Reads and writes files under the configured content root. The whole
//! surface sits behind the `disable_file_editing` policy: when the
//! capability is switched off, both verbs reject with 403 and the
//! filesystem is never touched. Paths are relative to the content root;
//! absolute paths and any traversal component are rejected outright.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{Extension, Path as RoutePath},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::capabilities::Capabilities;
use crate::config::AdminConfig;
use crate::rest::ProblemDetails;

/// Contents of an editable file.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileContent {
    pub content: String,
}

/// Normalize a request path into a safe path relative to the content root.
///
/// Accepts only plain relative paths: absolute paths, `..`, `.`, and any
/// platform prefix component are rejected.
fn sanitize_relative_path(raw: &str) -> Option<PathBuf> {
    let path = Path::new(raw);
    if path.is_absolute() {
        return None;
    }

    let mut clean = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            _ => return None,
        }
    }

    if clean.as_os_str().is_empty() {
        None
    } else {
        Some(clean)
    }
}

fn ensure_editing_allowed(capabilities: &Capabilities) -> Result<(), ProblemDetails> {
    if capabilities.file_editing_disabled() {
        return Err(ProblemDetails::forbidden(
            "File editing is disabled on this site",
        ));
    }
    Ok(())
}

fn resolve(admin: &AdminConfig, raw: &str) -> Result<PathBuf, ProblemDetails> {
    let relative = sanitize_relative_path(raw)
        .ok_or_else(|| ProblemDetails::bad_request(&format!("Invalid file path '{raw}'")))?;
    Ok(Path::new(&admin.content_root).join(relative))
}

/// Read an editable file
///
/// Returns the current contents of a file under the content root.
///
/// # Errors
///
/// Returns `ProblemDetails` with 403 when file editing is disabled, 400 for
/// invalid paths, and 404 when the file does not exist.
#[utoipa::path(
    get,
    path = "/admin/files/{path}",
    tag = "Admin",
    params(("path" = String, Path, description = "File path relative to the content root")),
    responses(
        (status = 200, description = "File contents", body = FileContent),
        (status = 400, description = "Invalid path", body = ProblemDetails),
        (status = 403, description = "File editing disabled by site policy", body = ProblemDetails),
        (status = 404, description = "No such file", body = ProblemDetails)
    )
)]
pub async fn read_file(
    Extension(capabilities): Extension<Arc<Capabilities>>,
    Extension(admin): Extension<Arc<AdminConfig>>,
    RoutePath(path): RoutePath<String>,
) -> Result<Json<FileContent>, ProblemDetails> {
    ensure_editing_allowed(&capabilities)?;
    let full = resolve(&admin, &path)?;

    match tokio::fs::read_to_string(&full).await {
        Ok(content) => Ok(Json(FileContent { content })),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(ProblemDetails::not_found(
            &format!("No such file '{path}'"),
        )),
        Err(err) => {
            tracing::error!(error = %err, path = %full.display(), "failed to read file");
            Err(ProblemDetails::internal_error("Could not read file"))
        }
    }
}

/// Update an editable file in place
///
/// Overwrites an existing file under the content root. Files are never
/// created through this surface.
///
/// # Errors
///
/// Returns `ProblemDetails` with 403 when file editing is disabled, 400 for
/// invalid paths, and 404 when the file does not exist.
#[utoipa::path(
    put,
    path = "/admin/files/{path}",
    tag = "Admin",
    params(("path" = String, Path, description = "File path relative to the content root")),
    request_body = FileContent,
    responses(
        (status = 204, description = "File updated"),
        (status = 400, description = "Invalid path", body = ProblemDetails),
        (status = 403, description = "File editing disabled by site policy", body = ProblemDetails),
        (status = 404, description = "No such file", body = ProblemDetails)
    )
)]
pub async fn update_file(
    Extension(capabilities): Extension<Arc<Capabilities>>,
    Extension(admin): Extension<Arc<AdminConfig>>,
    RoutePath(path): RoutePath<String>,
    Json(body): Json<FileContent>,
) -> Result<StatusCode, ProblemDetails> {
    ensure_editing_allowed(&capabilities)?;
    let full = resolve(&admin, &path)?;

    match tokio::fs::metadata(&full).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => {
            return Err(ProblemDetails::bad_request(&format!(
                "'{path}' is not a regular file"
            )))
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(ProblemDetails::not_found(&format!("No such file '{path}'")))
        }
        Err(err) => {
            tracing::error!(error = %err, path = %full.display(), "failed to stat file");
            return Err(ProblemDetails::internal_error("Could not update file"));
        }
    }

    if let Err(err) = tokio::fs::write(&full, body.content).await {
        tracing::error!(error = %err, path = %full.display(), "failed to write file");
        return Err(ProblemDetails::internal_error("Could not update file"));
    }

    Ok(StatusCode::NO_CONTENT)
}
