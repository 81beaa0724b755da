/// Storage for uploaded files
///
/// Files are written under the upload directory with a generated name
/// `<unix-nanos>-<8 hex chars><.ext>`; only the extension of the client's
/// file name is kept. The returned URL is `/uploads/<name>`.
use std::path::Path;

use chrono::Utc;

use crate::error::ServiceResult;

/// URL prefix under which the upload directory is served
pub const URL_PREFIX: &str = "/uploads";

/// Generates a stored file name for a client-supplied name
pub fn generate_file_name(original_name: &str) -> String {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let token = uuid::Uuid::new_v4().simple().to_string();

    let extension = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default();

    format!("{}-{}{}", nanos, &token[..8], extension)
}

/// Writes `bytes` into `dir` (created if missing) and returns the public URL
pub async fn store_upload(dir: &Path, original_name: &str, bytes: &[u8]) -> ServiceResult<String> {
    tokio::fs::create_dir_all(dir).await?;

    let name = generate_file_name(original_name);
    tokio::fs::write(dir.join(&name), bytes).await?;

    tracing::info!(file = %name, size = bytes.len(), "Stored upload");

    Ok(format!("{}/{}", URL_PREFIX, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_keeps_extension() {
        let name = generate_file_name("photo.final.PNG");
        assert!(name.ends_with(".PNG"), "{name}");

        let (nanos, rest) = name.split_once('-').unwrap();
        assert!(nanos.parse::<i64>().is_ok());
        assert_eq!(rest.len(), 8 + ".PNG".len());
    }

    #[test]
    fn test_file_name_without_extension() {
        let name = generate_file_name("README");
        let (_, token) = name.split_once('-').unwrap();
        assert_eq!(token.len(), 8);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_file_name_drops_path_components() {
        let name = generate_file_name("../../etc/passwd");
        assert!(!name.contains('/'));
        assert!(!name.contains(".."));
    }

    #[test]
    fn test_file_names_are_unique() {
        assert_ne!(generate_file_name("a.jpg"), generate_file_name("a.jpg"));
    }

    #[tokio::test]
    async fn test_store_upload_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("uploads");

        let url = store_upload(&dir, "kopi.jpg", b"jpeg bytes").await.unwrap();
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with(".jpg"));

        let name = url.trim_start_matches("/uploads/");
        let written = std::fs::read(dir.join(name)).unwrap();
        assert_eq!(written, b"jpeg bytes");
    }
}
