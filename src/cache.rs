// ==========================================
// BREEAM & LEED 认证看板 - 过期缓存
// ==========================================
// 职责: 按内容寻址的 TTL 缓存（注册库 30 分钟 / 地理编码 24 小时）
// 红线: 键先规范化（trim + 小写）,过期条目视为不存在
// ==========================================

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// 注册库响应缓存时长
pub const REGISTRY_TTL: Duration = Duration::from_secs(30 * 60);
/// 地理编码结果缓存时长
pub const GEOCODE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// 规范化缓存键（各段 trim + 小写,以 "|" 连接）
pub fn normalize_key<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(|p| p.as_ref().trim().to_lowercase())
        .collect::<Vec<_>>()
        .join("|")
}

// ==========================================
// TtlCache
// ==========================================
pub struct TtlCache<V> {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, V)>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, (Instant, V)>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 查询（未命中或已过期返回 None）
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    /// 以指定时刻查询
    pub fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        let key = normalize_key(&[key]);
        let mut entries = self.lock();
        match entries.get(&key) {
            Some((stored_at, value)) if now.saturating_duration_since(*stored_at) < self.ttl => {
                Some(value.clone())
            }
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: &str, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    pub fn insert_at(&self, key: &str, value: V, now: Instant) {
        self.lock().insert(normalize_key(&[key]), (now, value));
    }

    /// 命中直接返回,否则调用 loader 并缓存成功结果
    ///
    /// loader 失败时不写缓存
    pub fn get_or_try_insert_with<E, F>(&self, key: &str, loader: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(hit) = self.get(key) {
            return Ok(hit);
        }
        let value = loader()?;
        self.insert(key, value.clone());
        Ok(value)
    }

    /// 清理已过期条目,返回清理数量
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let ttl = self.ttl;
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, (stored_at, _)| now.saturating_duration_since(*stored_at) < ttl);
        before - entries.len()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
