// ==========================================
// BREEAM & LEED 认证看板 - 反馈仓储
// ==========================================
// 职责: feedback.csv 追加写入 / 读取 / 原始导出
// 红线: 只追加不改写,表头仅在新建文件时写入
// ==========================================

use crate::domain::feedback::FeedbackEntry;
use crate::repository::error::{RepositoryError, RepositoryResult};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

pub struct FeedbackRepository {
    path: PathBuf,
    // 同进程内串行化追加写入
    write_lock: Mutex<()>,
}

impl FeedbackRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// 追加一条反馈
    pub fn append(&self, entry: &FeedbackEntry) -> RepositoryResult<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let is_new = !self.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        if is_new {
            writer.write_record(FeedbackEntry::HEADER)?;
        }
        writer.write_record([
            entry.timestamp.as_str(),
            entry.page.as_str(),
            entry.full_name.as_str(),
            entry.message.as_str(),
        ])?;
        writer.flush()?;

        info!(path = %self.path.display(), page = %entry.page, "反馈已保存");
        Ok(())
    }

    /// 读取全部反馈（文件不存在时返回空列表）
    pub fn list_all(&self) -> RepositoryResult<Vec<FeedbackEntry>> {
        if !self.exists() {
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?;

        let mut entries = Vec::new();
        for result in reader.records() {
            let record = result?;
            let field = |idx: usize| record.get(idx).unwrap_or("").to_string();
            entries.push(FeedbackEntry {
                timestamp: field(0),
                page: field(1),
                full_name: field(2),
                message: field(3),
            });
        }

        debug!(count = entries.len(), "反馈已读取");
        Ok(entries)
    }

    /// 导出原始文件内容（文件不存在时返回 None）
    pub fn export_raw(&self) -> RepositoryResult<Option<Vec<u8>>> {
        if !self.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read(&self.path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(name: &str, message: &str) -> FeedbackEntry {
        FeedbackEntry {
            timestamp: "2026-10-17T09:30:00".to_string(),
            page: "Home".to_string(),
            full_name: name.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_header_written_once() {
        let dir = TempDir::new().unwrap();
        let repo = FeedbackRepository::new(dir.path().join("feedback.csv"));

        repo.append(&entry("Jan Kowalski", "Brak mapy")).unwrap();
        repo.append(&entry("Anna Nowak", "Dodać eksport, proszę")).unwrap();

        let raw = String::from_utf8(repo.export_raw().unwrap().unwrap()).unwrap();
        assert_eq!(raw.matches("timestamp,page,full_name,message").count(), 1);
        assert!(raw.starts_with("timestamp,page,full_name,message"));

        let entries = repo.list_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].message, "Dodać eksport, proszę");
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let repo = FeedbackRepository::new(dir.path().join("nested").join("feedback.csv"));

        assert!(!repo.exists());
        assert!(repo.list_all().unwrap().is_empty());
        assert_eq!(repo.export_raw().unwrap(), None);

        // 追加时自动创建目录
        repo.append(&entry("Jan", "x")).unwrap();
        assert!(repo.exists());
    }
}
