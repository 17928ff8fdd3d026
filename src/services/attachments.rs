//! 附件文件存储
//!
//! 文件保存在 `{media.root}/attachs/{documents|notes}/<uuid>_<原文件名>`，
//! 返回的相对路径直接写入记录的 `attach` 字段。

use std::path::{Path, PathBuf};

use strum::{AsRefStr, EnumString};
use tracing::info;

use crate::config::MediaConfig;
use crate::domain::{DOCUMENTS_DIR, NOTES_DIR};
use crate::errors::{CrmError, Result};
use crate::utils::sanitize_file_name;

/// 附件所属的记录类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum AttachmentTarget {
    Documents,
    Notes,
}

impl AttachmentTarget {
    /// 相对 media 根目录的子目录，带结尾 `/`
    pub fn dir(&self) -> &'static str {
        match self {
            AttachmentTarget::Documents => DOCUMENTS_DIR,
            AttachmentTarget::Notes => NOTES_DIR,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AttachmentStore {
    root: PathBuf,
    max_upload_bytes: usize,
}

impl AttachmentStore {
    pub fn new(root: impl Into<PathBuf>, max_upload_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_upload_bytes,
        }
    }

    pub fn from_config(config: &MediaConfig) -> Self {
        Self::new(&config.root, config.max_upload_bytes)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// 超过上限时返回 Attachment 错误
    pub fn check_size(&self, size: usize) -> Result<()> {
        if size > self.max_upload_bytes {
            return Err(CrmError::attachment(format!(
                "file is {} bytes, the limit is {} bytes",
                size, self.max_upload_bytes
            )));
        }
        Ok(())
    }

    /// 保存上传内容，返回相对路径（如 `attachs/notes/<uuid>_minutes.txt`）
    pub async fn save(
        &self,
        target: AttachmentTarget,
        original_name: &str,
        content: &[u8],
    ) -> Result<String> {
        self.check_size(content.len())?;
        if content.is_empty() {
            return Err(CrmError::attachment("uploaded file is empty"));
        }

        let relative = format!(
            "{}{}_{}",
            target.dir(),
            uuid::Uuid::new_v4().simple(),
            sanitize_file_name(original_name)
        );
        let path = self.root.join(&relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, content).await?;

        info!(
            "Stored {} attachment '{}' ({} bytes)",
            target.as_ref(),
            relative,
            content.len()
        );
        Ok(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Checker, activities::check_attach};

    #[test]
    fn test_target_parsing() {
        assert_eq!(
            "documents".parse::<AttachmentTarget>(),
            Ok(AttachmentTarget::Documents)
        );
        assert_eq!("notes".parse::<AttachmentTarget>(), Ok(AttachmentTarget::Notes));
        assert!("images".parse::<AttachmentTarget>().is_err());
    }

    #[tokio::test]
    async fn test_save_writes_under_target_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = AttachmentStore::new(dir.path(), 1024);

        let relative = store
            .save(AttachmentTarget::Notes, "../meeting minutes.txt", b"agenda")
            .await
            .unwrap();
        assert!(relative.starts_with(NOTES_DIR));
        assert!(relative.ends_with("_meeting_minutes.txt"));

        let written = std::fs::read(dir.path().join(&relative)).unwrap();
        assert_eq!(written, b"agenda");

        // 返回的路径能通过记录字段的路径校验
        let mut c = Checker::new();
        check_attach(&mut c, NOTES_DIR, &relative);
        assert!(c.finish().is_empty());
    }

    #[tokio::test]
    async fn test_save_rejects_oversized_and_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = AttachmentStore::new(dir.path(), 4);

        let err = store
            .save(AttachmentTarget::Documents, "big.pdf", b"12345")
            .await
            .unwrap_err();
        assert!(matches!(err, CrmError::Attachment(_)));

        let err = store
            .save(AttachmentTarget::Documents, "empty.pdf", b"")
            .await
            .unwrap_err();
        assert!(matches!(err, CrmError::Attachment(_)));
    }
}
