// ==========================================
// 库存管理自动化流水线 - 汇总统计引擎
// ==========================================
// 职责: 最终表的描述性统计聚合
// 红线: 纯聚合,不改写输入表
// 输入: 校验后记录 + 合并统计
// 输出: SummaryStatistics 快照
// ==========================================

use crate::domain::record::{
    InventoryRecord, PipelineStats, StockStatusBreakdown, SummaryStatistics, TopValueItem,
};
use chrono::Utc;
use std::collections::HashSet;
use tracing::{info, instrument};

// 高价值条目清单长度
const TOP_VALUE_ITEMS: usize = 5;

// ==========================================
// SummaryBuilder - 汇总统计引擎
// ==========================================
pub struct SummaryBuilder;

impl SummaryBuilder {
    /// 创建新的汇总引擎
    pub fn new() -> Self {
        Self
    }

    /// 生成汇总统计快照(主入口)
    ///
    /// # 参数
    /// - records: 最终表(只读)
    /// - stats: 各阶段合并后的流水线统计
    ///
    /// Top-N 按 TotalValue 降序稳定排序,同值按表内原序
    #[instrument(skip(self, records, stats), fields(count = records.len()))]
    pub fn build(&self, records: &[InventoryRecord], stats: PipelineStats) -> SummaryStatistics {
        let unique_skus: HashSet<&str> = records.iter().map(|r| r.sku.as_str()).collect();

        let mut locations: Vec<String> = records
            .iter()
            .map(|r| r.location.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        locations.sort();

        let total_inventory_value: f64 = records.iter().map(|r| r.total_value).sum();

        let average_unit_cost = if records.is_empty() {
            0.0
        } else {
            records.iter().map(|r| r.unit_cost).sum::<f64>() / records.len() as f64
        };

        let mut breakdown = StockStatusBreakdown::default();
        for record in records {
            breakdown.increment(record.stock_status);
        }

        let summary = SummaryStatistics {
            processing_timestamp: Utc::now(),
            total_records: records.len(),
            unique_skus: unique_skus.len(),
            locations,
            total_inventory_value,
            average_unit_cost,
            stock_status_breakdown: breakdown,
            top_value_items: Self::top_by_value(records, TOP_VALUE_ITEMS),
            processing_stats: stats,
        };

        info!(
            total_records = summary.total_records,
            unique_skus = summary.unique_skus,
            total_value = summary.total_inventory_value,
            "汇总统计生成完成"
        );

        summary
    }

    // TotalValue 降序稳定排序取前 n(稳定性保证同值按原序)
    fn top_by_value(records: &[InventoryRecord], n: usize) -> Vec<TopValueItem> {
        let mut sorted: Vec<&InventoryRecord> = records.iter().collect();
        sorted.sort_by(|a, b| {
            b.total_value
                .partial_cmp(&a.total_value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        sorted
            .into_iter()
            .take(n)
            .map(|r| TopValueItem {
                sku: r.sku.clone(),
                description: r.description.clone(),
                total_value: r.total_value,
            })
            .collect()
    }
}

impl Default for SummaryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{StockStatus, ValidationStatus};

    fn record(sku: &str, location: &str, status: StockStatus, total_value: f64) -> InventoryRecord {
        InventoryRecord {
            sku: sku.to_string(),
            description: format!("Item {}", sku),
            location: location.to_string(),
            on_hand_qty: 1.0,
            reorder_point: 1.0,
            unit_cost: 4.0,
            reorder_qty: 0.0,
            stock_status: status,
            days_of_supply: 30.0,
            total_value,
            processed_at: None,
            validation_status: ValidationStatus::Passed,
        }
    }

    #[test]
    fn test_counts_and_locations_sorted() {
        let builder = SummaryBuilder::new();
        let records = vec![
            record("A", "WH2", StockStatus::Normal, 10.0),
            record("A", "WH1", StockStatus::Normal, 20.0),
            record("B", "WH1", StockStatus::Critical, 30.0),
        ];

        let summary = builder.build(&records, PipelineStats::default());

        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.unique_skus, 2);
        assert_eq!(summary.locations, vec!["WH1".to_string(), "WH2".to_string()]);
        assert_eq!(summary.total_inventory_value, 60.0);
        assert_eq!(summary.average_unit_cost, 4.0);
        assert_eq!(summary.stock_status_breakdown.normal, 2);
        assert_eq!(summary.stock_status_breakdown.critical, 1);
    }

    #[test]
    fn test_top_value_items_descending_stable() {
        let builder = SummaryBuilder::new();
        let records = vec![
            record("A", "WH1", StockStatus::Normal, 50.0),
            record("B", "WH1", StockStatus::Normal, 90.0),
            record("C", "WH1", StockStatus::Normal, 50.0), // 与 A 同值,排在 A 后
            record("D", "WH1", StockStatus::Normal, 10.0),
            record("E", "WH1", StockStatus::Normal, 70.0),
            record("F", "WH1", StockStatus::Normal, 5.0),
        ];

        let summary = builder.build(&records, PipelineStats::default());
        let skus: Vec<_> = summary
            .top_value_items
            .iter()
            .map(|i| i.sku.as_str())
            .collect();

        assert_eq!(summary.top_value_items.len(), 5);
        assert_eq!(skus, vec!["B", "E", "A", "C", "D"]);
    }

    #[test]
    fn test_empty_table() {
        let builder = SummaryBuilder::new();
        let summary = builder.build(&[], PipelineStats::default());

        assert_eq!(summary.total_records, 0);
        assert_eq!(summary.average_unit_cost, 0.0);
        assert!(summary.top_value_items.is_empty());
        assert!(summary.locations.is_empty());
    }

    #[test]
    fn test_input_not_mutated() {
        let builder = SummaryBuilder::new();
        let records = vec![record("A", "WH1", StockStatus::Normal, 10.0)];
        let before = records[0].clone();

        let _ = builder.build(&records, PipelineStats::default());

        assert_eq!(records[0].sku, before.sku);
        assert_eq!(records[0].total_value, before.total_value);
    }
}
