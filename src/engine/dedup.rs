// ==========================================
// 库存管理自动化流水线 - 去重器
// ==========================================
// 职责: 按 (sku, location) 键折叠重复行
// 红线: keep_first/keep_last 以原始输入顺序为准;
//       remove_all 对重复组零存活(含"原始"行)
// 输入: 清洗后记录
// 输出: (去重后记录, 去重统计)
// ==========================================

use crate::domain::record::{DedupStats, InventoryRecord};
use crate::domain::types::DedupStrategy;
use std::collections::HashMap;
use tracing::{info, instrument};

// ==========================================
// Deduplicator - 去重器
// ==========================================
pub struct Deduplicator;

impl Deduplicator {
    /// 创建新的去重器实例
    pub fn new() -> Self {
        Self
    }

    /// 按策略去重(主入口)
    ///
    /// # 参数
    /// - records: 清洗后记录(保持原始输入顺序)
    /// - strategy: keep_first / keep_last / remove_all
    ///
    /// # 返回
    /// - (去重后记录, DedupStats)
    ///
    /// 存活行保持原始相对顺序
    #[instrument(skip(self, records), fields(count = records.len(), strategy = %strategy))]
    pub fn deduplicate(
        &self,
        records: Vec<InventoryRecord>,
        strategy: DedupStrategy,
    ) -> (Vec<InventoryRecord>, DedupStats) {
        let original_count = records.len();

        let deduped = match strategy {
            DedupStrategy::KeepFirst => self.keep_first(records),
            DedupStrategy::KeepLast => self.keep_last(records),
            DedupStrategy::RemoveAll => self.remove_all(records),
        };

        let stats = DedupStats {
            duplicates_removed: original_count - deduped.len(),
        };

        info!(removed = stats.duplicates_removed, "去重完成");

        (deduped, stats)
    }

    // 保留每组首次出现的行
    fn keep_first(&self, records: Vec<InventoryRecord>) -> Vec<InventoryRecord> {
        let mut seen: HashMap<(String, String), ()> = HashMap::new();
        records
            .into_iter()
            .filter(|r| seen.insert(r.dedup_key(), ()).is_none())
            .collect()
    }

    // 保留每组末次出现的行(存活行仍按原始位置排列)
    fn keep_last(&self, records: Vec<InventoryRecord>) -> Vec<InventoryRecord> {
        let mut last_index: HashMap<(String, String), usize> = HashMap::new();
        for (idx, record) in records.iter().enumerate() {
            last_index.insert(record.dedup_key(), idx);
        }

        records
            .into_iter()
            .enumerate()
            .filter(|(idx, record)| last_index[&record.dedup_key()] == *idx)
            .map(|(_, record)| record)
            .collect()
    }

    // 重复组(组规模 > 1)整组剔除,歧义数据不可信
    fn remove_all(&self, records: Vec<InventoryRecord>) -> Vec<InventoryRecord> {
        let mut group_size: HashMap<(String, String), usize> = HashMap::new();
        for record in &records {
            *group_size.entry(record.dedup_key()).or_insert(0) += 1;
        }

        records
            .into_iter()
            .filter(|r| group_size[&r.dedup_key()] == 1)
            .collect()
    }
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self::new()
    }
}
