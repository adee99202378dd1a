//! 已投递记录 - 业务能力层
//!
//! 只追加、不删除、不修改；启动时读一次构建排除集合

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::error::{AppError, AppResult};

/// 记录的存储方式
pub trait LedgerStore: Send {
    /// 读出全部已记录的职位 ID
    fn load(&mut self) -> AppResult<Vec<u64>>;
    /// 追加一条记录
    fn append(&mut self, job_id: u64) -> AppResult<()>;
}

/// 文本文件存储，每行一个 ID
pub struct FileLedgerStore {
    path: PathBuf,
    file: Option<File>,
}

impl FileLedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
        }
    }

    fn ledger_error(&self, source: std::io::Error) -> AppError {
        AppError::Ledger {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl LedgerStore for FileLedgerStore {
    fn load(&mut self) -> AppResult<Vec<u64>> {
        if !Path::new(&self.path).exists() {
            return Ok(Vec::new());
        }
        let file = File::open(&self.path).map_err(|e| self.ledger_error(e))?;
        let mut ids = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| self.ledger_error(e))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match line.parse::<u64>() {
                Ok(id) => ids.push(id),
                Err(_) => warn!("⚠️ 忽略无法识别的记录行: {}", line),
            }
        }
        Ok(ids)
    }

    fn append(&mut self, job_id: u64) -> AppResult<()> {
        if self.file.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .map_err(|e| self.ledger_error(e))?;
            self.file = Some(file);
        }
        let path = self.path.display().to_string();
        if let Some(file) = self.file.as_mut() {
            writeln!(file, "{}", job_id)
                .and_then(|_| file.flush())
                .map_err(|source| AppError::Ledger { path, source })?;
        }
        Ok(())
    }
}

/// 内存存储，不落盘
///
/// 供嵌入本库的调用方和测试使用；克隆后共享同一份记录，可查看写入顺序
#[derive(Debug, Clone, Default)]
pub struct MemoryLedgerStore {
    entries: Arc<Mutex<Vec<u64>>>,
}

impl MemoryLedgerStore {
    const PATH: &'static str = "<memory>";

    pub fn with_entries(entries: impl IntoIterator<Item = u64>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(entries.into_iter().collect())),
        }
    }

    /// 当前全部记录（锁中毒时仍返回已写入的内容）
    pub fn entries(&self) -> Vec<u64> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn locked(&self) -> AppResult<MutexGuard<'_, Vec<u64>>> {
        self.entries.lock().map_err(|_| AppError::Ledger {
            path: Self::PATH.to_string(),
            source: std::io::Error::other("记录锁已中毒"),
        })
    }
}

impl LedgerStore for MemoryLedgerStore {
    fn load(&mut self) -> AppResult<Vec<u64>> {
        Ok(self.locked()?.clone())
    }

    fn append(&mut self, job_id: u64) -> AppResult<()> {
        self.locked()?.push(job_id);
        Ok(())
    }
}

/// 已投递记录
///
/// 单一所有者：只有投递流程写入
pub struct Ledger {
    seen: HashSet<u64>,
    store: Box<dyn LedgerStore>,
}

impl Ledger {
    /// 读出已有记录
    pub fn open(mut store: Box<dyn LedgerStore>) -> AppResult<Self> {
        let seen: HashSet<u64> = store.load()?.into_iter().collect();
        debug!("已投递记录: {} 条", seen.len());
        Ok(Self { seen, store })
    }

    pub fn contains(&self, job_id: u64) -> bool {
        self.seen.contains(&job_id)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// 当前记录的快照（用作枚举器的排除集合）
    pub fn snapshot(&self) -> HashSet<u64> {
        self.seen.clone()
    }

    /// 记录一个职位，已存在时不重复写入
    ///
    /// # 返回
    /// 返回是否为新记录
    pub fn record(&mut self, job_id: u64) -> AppResult<bool> {
        if self.seen.contains(&job_id) {
            return Ok(false);
        }
        self.store.append(job_id)?;
        self.seen.insert(job_id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_ledger_round_trip_skips_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("applied.txt");
        std::fs::write(&path, "1234\n\nnot-a-number\n99\n").unwrap();

        let mut ledger = Ledger::open(Box::new(FileLedgerStore::new(&path))).unwrap();
        assert!(ledger.contains(1234));
        assert!(ledger.contains(99));
        assert_eq!(ledger.len(), 2);

        assert!(ledger.record(555).unwrap());
        assert!(!ledger.record(555).unwrap());

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("555").count(), 1);
        assert!(content.ends_with("555\n"));
    }

    #[test]
    fn missing_file_is_empty_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::open(Box::new(FileLedgerStore::new(dir.path().join("none.txt")))).unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn memory_store_keeps_append_order() {
        let store = MemoryLedgerStore::with_entries([7]);
        let mut ledger = Ledger::open(Box::new(store.clone())).unwrap();
        ledger.record(3).unwrap();
        ledger.record(7).unwrap();
        ledger.record(1).unwrap();
        assert_eq!(store.entries(), vec![7, 3, 1]);
    }

    #[test]
    fn poisoned_memory_store_reports_an_error() {
        let store = MemoryLedgerStore::with_entries([7]);
        let shared = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = shared.entries.lock().unwrap();
            panic!("writer crashed while holding the lock");
        })
        .join();

        let mut store = store;
        assert!(matches!(store.append(8), Err(AppError::Ledger { .. })));
        assert!(matches!(store.load(), Err(AppError::Ledger { .. })));
        assert_eq!(store.entries(), vec![7]);
    }
}
