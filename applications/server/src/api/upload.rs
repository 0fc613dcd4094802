/// Multipart form handling shared by the upload routes
use crate::{
    error::{Result, ServerError},
    services::{object_store::detect_extension, ObjectStore, StoredObject},
};
use axum::http::{header::CONTENT_TYPE, HeaderMap};
use bytes::Bytes;
use std::collections::HashMap;

/// A file part of a multipart form
#[derive(Debug)]
pub(crate) struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// A parsed multipart form: file parts and text parts by field name
#[derive(Debug, Default)]
pub(crate) struct MultipartForm {
    files: HashMap<String, UploadedFile>,
    fields: HashMap<String, String>,
}

impl MultipartForm {
    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }

    /// Trimmed text value, `None` when absent or blank
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Parse a `multipart/form-data` body
pub(crate) async fn parse_multipart(headers: &HeaderMap, body: Bytes) -> Result<MultipartForm> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ServerError::BadRequest("Missing Content-Type".to_string()))?;

    if !content_type.starts_with("multipart/form-data") {
        return Err(ServerError::BadRequest(
            "Expected multipart/form-data".to_string(),
        ));
    }

    let boundary = multer::parse_boundary(content_type)
        .map_err(|_| ServerError::BadRequest("Missing boundary".to_string()))?;

    // Convert Bytes to a stream for multer
    let stream = futures_util::stream::once(async move { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);
    let mut form = MultipartForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Failed to parse multipart: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(|m| m.essence_str().to_string());

        if file_name.is_some() {
            let data = field
                .bytes()
                .await
                .map_err(|e| ServerError::BadRequest(format!("Failed to read file: {}", e)))?;
            form.files.insert(
                name,
                UploadedFile {
                    file_name,
                    content_type,
                    data,
                },
            );
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ServerError::BadRequest(format!("Failed to read field: {}", e)))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}

/// Check the file's format against `allowed` and store it under `folder`
pub(crate) async fn store_file(
    store: &dyn ObjectStore,
    folder: &str,
    file: UploadedFile,
    allowed: &[&str],
) -> Result<StoredObject> {
    let extension = detect_extension(file.file_name.as_deref(), file.content_type.as_deref())
        .filter(|ext| allowed.contains(&ext.as_str()))
        .ok_or_else(|| {
            ServerError::BadRequest(format!(
                "Unsupported file type, expected one of: {}",
                allowed.join(", ")
            ))
        })?;

    if file.data.is_empty() {
        return Err(ServerError::BadRequest("Uploaded file is empty".to_string()));
    }

    store.put(folder, &extension, file.data).await
}
