use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for LocalStorage {
    async fn ensure_ready(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.base_path)
            .await
            .map_err(|source| EtlError::OutputDirError {
                path: self.base_path.display().to_string(),
                source,
            })
    }

    async fn existing_size(&self, name: &str) -> Result<Option<u64>> {
        match tokio::fs::metadata(self.base_path.join(name)).await {
            Ok(meta) if meta.is_file() => Ok(Some(meta.len())),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_file(&self, name: &str, data: &[u8]) -> Result<u64> {
        let final_path = self.base_path.join(name);
        let temp_path = self.base_path.join(format!("{}.part", name));

        // 先寫暫存檔再改名，中斷時不會留下半個輸出檔
        if let Err(e) = tokio::fs::write(&temp_path, data).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&temp_path, &final_path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        let meta = tokio::fs::metadata(&final_path).await?;
        Ok(meta.len())
    }

    fn location(&self, name: &str) -> String {
        self.base_path.join(name).display().to_string()
    }
}
