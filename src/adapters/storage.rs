use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::path::Path;

/// Writes outputs below a base directory on the local disk.
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
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_missing_directories() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("nested/output");
        let storage = LocalStorage::new(base.to_string_lossy().into_owned());

        tokio_test::block_on(async {
            storage.write_file("invoices.csv", b"date,vendor,total,category\n").await.unwrap();
        });

        let data = std::fs::read(base.join("invoices.csv")).unwrap();
        assert_eq!(data, b"date,vendor,total,category\n");
    }

    #[tokio::test]
    async fn test_write_overwrites_previous_run() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_string_lossy().into_owned());

        storage.write_file("invoice_42.json", b"{\"total\": 1}").await.unwrap();
        storage.write_file("invoice_42.json", b"{\"total\": 2}").await.unwrap();

        let data = std::fs::read_to_string(temp_dir.path().join("invoice_42.json")).unwrap();
        assert_eq!(data, "{\"total\": 2}");
    }

    #[tokio::test]
    async fn test_write_into_a_file_path_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("out");
        std::fs::write(&blocker, "").unwrap();
        let storage = LocalStorage::new(blocker.to_string_lossy().into_owned());

        let result = storage.write_file("invoices.csv", b"").await;
        assert!(matches!(result, Err(crate::utils::error::InvoiceError::IoError(_))));
    }
}
