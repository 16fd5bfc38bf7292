//! 通知存储 - 本地 JSONL 文件读写

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::record::{Notification, NotificationRepository};

const MAX_NOTIFICATIONS: usize = 1000;
const KEEP_AFTER_CLEANUP: usize = 500;
const CLEANUP_CHECK_INTERVAL: usize = 10;

/// JSONL 通知存储（一行一条通知）
#[derive(Debug, Clone)]
pub struct JsonlNotificationStore {
    path: PathBuf,
    write_count: Arc<AtomicUsize>,
    /// 清理时丢弃的记录总数
    trimmed: Arc<AtomicUsize>,
    max_records: usize,
    keep_after_cleanup: usize,
}

impl JsonlNotificationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_count: Arc::new(AtomicUsize::new(0)),
            trimmed: Arc::new(AtomicUsize::new(0)),
            max_records: MAX_NOTIFICATIONS,
            keep_after_cleanup: KEEP_AFTER_CLEANUP,
        }
    }

    /// 设置保留上限（超过 `max` 时裁剪到 `keep` 条）
    pub fn with_limits(mut self, max: usize, keep: usize) -> Self {
        self.max_records = max;
        self.keep_after_cleanup = keep.min(max);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 已被清理丢弃的记录数
    pub fn trimmed_count(&self) -> usize {
        self.trimmed.load(Ordering::Relaxed)
    }

    /// 锁文件路径；数据文件会被清理替换，锁只加在这个不会被替换的文件上
    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    /// 打开并独占锁定锁文件，返回的句柄 drop 时释放锁
    fn lock(&self) -> Result<File> {
        use fs2::FileExt;

        // 确保目录存在
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let lock_path = self.lock_path();
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .with_context(|| format!("opening {}", lock_path.display()))?;
        lock.lock_exclusive()?;
        Ok(lock)
    }

    /// 追加通知记录（带文件锁）
    pub fn append(&self, notification: &Notification) -> Result<()> {
        use fs2::FileExt;

        let line = serde_json::to_string(notification)?;
        let lock = self.lock()?;

        // 持锁后再打开，保证写入的是当前文件而不是已被清理替换的旧文件
        let written = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))
            .and_then(|mut file| writeln!(file, "{line}").map_err(Into::into));
        lock.unlock()?;
        written?;

        self.maybe_cleanup();
        Ok(())
    }

    /// 读取最近 N 条通知（按时间升序）
    pub fn read_recent(&self, n: usize) -> Vec<Notification> {
        let mut records = self.read_all();
        let start = records.len().saturating_sub(n);
        let mut recent = records.split_off(start);
        recent.sort_by_key(|r| r.created_at);
        recent
    }

    fn read_all(&self) -> Vec<Notification> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(_) => return Vec::new(),
        };

        BufReader::new(file)
            .lines()
            .filter_map(|line| line.ok())
            .filter_map(|line| serde_json::from_str(&line).ok())
            .collect()
    }

    /// 定期检查并清理
    fn maybe_cleanup(&self) {
        let count = self.write_count.fetch_add(1, Ordering::Relaxed) + 1;
        if count % CLEANUP_CHECK_INTERVAL != 0 {
            return;
        }

        if let Err(e) = self.cleanup() {
            tracing::warn!(path = %self.path.display(), error = %e, "Notification store cleanup failed");
        }
    }

    /// 执行清理（保留最近的记录），返回丢弃的条数
    pub fn cleanup(&self) -> Result<usize> {
        use fs2::FileExt;

        let lock = self.lock()?;
        let result = self.trim_locked();
        lock.unlock()?;

        let dropped = result?;
        if dropped > 0 {
            self.trimmed.fetch_add(dropped, Ordering::Relaxed);
            tracing::debug!(path = %self.path.display(), dropped, "Trimmed notification store");
        }
        Ok(dropped)
    }

    /// 调用方必须持有锁
    fn trim_locked(&self) -> Result<usize> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        // 非 UTF-8 的残行跳过，不截断后面的记录
        let records: Vec<String> = BufReader::new(file)
            .lines()
            .filter_map(|line| line.ok())
            .filter(|line| !line.trim().is_empty())
            .collect();

        if records.len() <= self.max_records {
            return Ok(0);
        }

        let start = records.len().saturating_sub(self.keep_after_cleanup);
        let temp_path = self.path.with_extension("tmp");
        {
            let mut temp_file = File::create(&temp_path)?;
            for line in &records[start..] {
                writeln!(temp_file, "{}", line)?;
            }
        }

        // 原子替换
        fs::rename(&temp_path, &self.path)?;
        Ok(start)
    }
}

#[async_trait]
impl NotificationRepository for JsonlNotificationStore {
    async fn save(&self, notification: &Notification) -> Result<()> {
        let store = self.clone();
        let notification = notification.clone();
        tokio::task::spawn_blocking(move || store.append(&notification)).await?
    }
}
