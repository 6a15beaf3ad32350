use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

/// Filesystem storage rooted at the upload directory. Workspace paths are
/// always relative to the base.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = fs::read(full_path)?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        Ok(Path::new(&self.base_path).join(path).exists())
    }

    async fn list_dir(&self, path: &str) -> Result<Vec<String>> {
        let full_path = Path::new(&self.base_path).join(path);
        if !full_path.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(full_path)? {
            let entry = entry?;
            let name = entry.file_name();
            if let Some(name) = name.to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
