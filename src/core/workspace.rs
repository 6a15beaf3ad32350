use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::path::Path;
use uuid::Uuid;

pub const DATA_FILE: &str = "data.csv";
pub const METADATA_FILE: &str = "metadata.txt";
pub const RESULT_FILE: &str = "result.json";

/// One folder per request under the upload directory. Only the id is held
/// here; paths handed to [`Storage`] are relative to the upload directory.
#[derive(Debug, Clone)]
pub struct Workspace {
    id: String,
}

impl Workspace {
    pub fn create() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
        }
    }

    pub fn open(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display path of the workspace folder, as embedded in prompts.
    pub fn folder(&self, upload_dir: &str) -> String {
        format!("{}/{}", upload_dir.trim_end_matches('/'), self.id)
    }

    pub fn file_path(&self, name: &str) -> String {
        format!("{}/{}", self.id, name)
    }

    /// Client-supplied names are reduced to a bare file name so an upload can
    /// never escape its workspace folder.
    pub fn sanitize_file_name(name: &str) -> String {
        Path::new(name)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .unwrap_or("upload.bin")
            .to_string()
    }

    pub async fn save_upload<S: Storage>(
        &self,
        storage: &S,
        name: &str,
        bytes: &[u8],
    ) -> Result<String> {
        let file_name = Self::sanitize_file_name(name);
        storage
            .write_file(&self.file_path(&file_name), bytes)
            .await?;
        tracing::info!("Saved upload {} ({} bytes)", self.file_path(&file_name), bytes.len());
        Ok(file_name)
    }

    /// Create the named file empty if it is missing; existing content is kept.
    pub async fn ensure_placeholder<S: Storage>(&self, storage: &S, name: &str) -> Result<()> {
        let path = self.file_path(name);
        if !storage.exists(&path).await? {
            storage.write_file(&path, b"").await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::cli::LocalStorage;
    use tempfile::TempDir;

    #[test]
    fn test_workspace_ids_are_unique() {
        assert_ne!(Workspace::create().id(), Workspace::create().id());
    }

    #[test]
    fn test_folder_path_trims_trailing_slash() {
        let ws = Workspace::open("abc-123");
        assert_eq!(ws.folder("./uploads/"), "./uploads/abc-123");
        assert_eq!(ws.folder("./uploads"), "./uploads/abc-123");
    }

    #[test]
    fn test_sanitize_strips_directory_components() {
        assert_eq!(Workspace::sanitize_file_name("films.csv"), "films.csv");
        assert_eq!(
            Workspace::sanitize_file_name("../../etc/passwd"),
            "passwd"
        );
        assert_eq!(Workspace::sanitize_file_name("a/b/c.txt"), "c.txt");
        assert_eq!(Workspace::sanitize_file_name(".."), "upload.bin");
        assert_eq!(Workspace::sanitize_file_name(""), "upload.bin");
    }

    #[tokio::test]
    async fn test_save_upload_writes_into_workspace_folder() {
        let temp = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp.path().to_str().unwrap().to_string());
        let ws = Workspace::create();

        let saved = ws
            .save_upload(&storage, "nested/dir/films.csv", b"a,b\n")
            .await
            .unwrap();

        assert_eq!(saved, "films.csv");
        let stored = storage.read_file(&ws.file_path("films.csv")).await.unwrap();
        assert_eq!(stored, b"a,b\n");
    }

    #[tokio::test]
    async fn test_ensure_placeholder_does_not_overwrite() {
        let temp = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp.path().to_str().unwrap().to_string());
        let ws = Workspace::create();

        ws.ensure_placeholder(&storage, METADATA_FILE).await.unwrap();
        let empty = storage.read_file(&ws.file_path(METADATA_FILE)).await.unwrap();
        assert!(empty.is_empty());

        storage
            .write_file(&ws.file_path(METADATA_FILE), b"120 rows")
            .await
            .unwrap();
        ws.ensure_placeholder(&storage, METADATA_FILE).await.unwrap();

        let kept = storage.read_file(&ws.file_path(METADATA_FILE)).await.unwrap();
        assert_eq!(kept, b"120 rows");
    }
}
