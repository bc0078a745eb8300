use std::collections::BTreeMap;

use axum::http::HeaderMap;

use crate::models::UploadedFile;

/// The field bag as it came off the wire, before any rule has looked at it.
#[derive(Debug, Default)]
pub struct RawSubmission {
    pub fields: BTreeMap<String, String>,
    pub files: BTreeMap<String, UploadedFile>,
}

impl RawSubmission {
    /// Text field by name, trimmed. Missing and whitespace-only both come
    /// back as `None`.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }
}

/// Parse a multipart form body using multer. Text parts land in `fields`,
/// parts carrying a filename land in `files` with their declared content
/// type and raw bytes.
pub async fn parse_multipart(headers: &HeaderMap, body: bytes::Bytes) -> Result<RawSubmission, String> {
    let boundary = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or_else(|| "Missing multipart boundary".to_string())?;

    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut raw = RawSubmission::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Multipart error: {e}"))?
    {
        let name = field.name().unwrap_or("unknown").to_string();

        if let Some(filename) = field.file_name() {
            let filename = filename.to_string();
            let content_type = field
                .content_type()
                .map(|m| m.essence_str().to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| format!("File read error: {e}"))?;
            raw.files.insert(
                name,
                UploadedFile {
                    filename,
                    content_type,
                    bytes,
                },
            );
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| format!("Field read error: {e}"))?;
            raw.fields.insert(name, value);
        }
    }

    Ok(raw)
}
