// ==========================================
// 库存管理自动化流水线 - 库存领域模型
// ==========================================
// 职责: 定义原始行/清洗后记录/违规/统计快照
// 红线: 不含引擎逻辑,不含文件访问
// ==========================================
// 生命周期: 原始行由导入层产出,经五段流水线就地演进,
//           最终表/摘要/违规清单交由外部写出器消费
// ==========================================

use crate::domain::types::{StockStatus, ValidationStatus, ViolationRule};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// RawInventoryRecord - 原始库存行
// ==========================================
// 用途: 导入层写入,清洗器只读
// 约定: 所有字段保持未定型字符串,数值强转在清洗器内完成
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawInventoryRecord {
    pub sku: Option<String>,           // SKU(主键之一)
    pub description: Option<String>,   // 品名描述
    pub location: Option<String>,      // 库位(主键之一)
    pub on_hand_qty: Option<String>,   // 在库数量(原始文本)
    pub reorder_point: Option<String>, // 再订货点(原始文本)
    pub unit_cost: Option<String>,     // 单位成本(原始文本)
    pub row_number: usize,             // 源文件行号(从2起,含表头偏移)
}

impl RawInventoryRecord {
    /// 整行是否为空(清洗器第一步直接丢弃)
    pub fn is_blank(&self) -> bool {
        let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
        blank(&self.sku)
            && blank(&self.description)
            && blank(&self.location)
            && blank(&self.on_hand_qty)
            && blank(&self.reorder_point)
            && blank(&self.unit_cost)
    }
}

// ==========================================
// InventoryRecord - 清洗后库存记录
// ==========================================
// 不变量(清洗后恒成立):
//   on_hand_qty >= 0, reorder_point >= 0, unit_cost > 0
// 派生列由 MetricsCalculator 填充,Validator 只写 validation_status
// 序列化字段名与下游报表列名一致
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryRecord {
    #[serde(rename = "SKU")]
    pub sku: String, // 已 TRIM + UPPER,非空
    #[serde(rename = "Description")]
    pub description: String, // 空值替换为 "Unknown Item"
    #[serde(rename = "Location")]
    pub location: String, // 已 TRIM + UPPER
    #[serde(rename = "OnHandQty")]
    pub on_hand_qty: f64, // >= 0(负值已钳为 0)
    #[serde(rename = "ReorderPoint")]
    pub reorder_point: f64, // >= 0
    #[serde(rename = "UnitCost")]
    pub unit_cost: f64, // > 0(缺失值用列中位数填补)

    // ===== 派生列(Metrics Calculator 输出)=====
    #[serde(rename = "ReorderQty")]
    pub reorder_qty: f64, // max(0, reorder_point - on_hand_qty)
    #[serde(rename = "StockStatus")]
    pub stock_status: StockStatus, // 四态判定,见 §classify
    #[serde(rename = "DaysOfSupply", with = "days_of_supply_serde")]
    pub days_of_supply: f64, // reorder_point=0 时为无穷(序列化为 null/空)
    #[serde(rename = "TotalValue")]
    pub total_value: f64, // on_hand_qty * unit_cost
    #[serde(rename = "ProcessedAt")]
    pub processed_at: Option<DateTime<Utc>>, // 流水线处理时间戳

    // ===== 校验列(Rule Validator 输出)=====
    #[serde(rename = "ValidationStatus")]
    pub validation_status: ValidationStatus,
}

impl InventoryRecord {
    /// 去重键 (sku, location)
    pub fn dedup_key(&self) -> (String, String) {
        (self.sku.clone(), self.location.clone())
    }
}

// days_of_supply 的序列化约定:
// 非有限值(无穷)没有 JSON 表示,统一落为 null(CSV 中为空字段),
// 反序列化时 null/缺失还原为无穷
mod days_of_supply_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.is_finite() {
            serializer.serialize_some(value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt = Option::<f64>::deserialize(deserializer)?;
        Ok(opt.unwrap_or(f64::INFINITY))
    }
}

// ==========================================
// Violation - 业务规则违规记录
// ==========================================
// 不附着在记录上,通过 SKU 交叉引用设置 validation_status
// 字段名与原报表 JSON 口径一致
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    #[serde(rename = "SKU")]
    pub sku: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Rule")]
    pub rule: ViolationRule,
    #[serde(rename = "Details")]
    pub details: String,
}

// ==========================================
// 阶段统计 - 每个阶段返回各自的局部计数器
// ==========================================
// 红线: 阶段是纯函数,计数器随返回值交还调用方,无跨调用隐藏状态

/// 清洗阶段统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningStats {
    pub records_processed: usize,        // 清洗后存活行数
    pub invalid_records: usize,          // 被丢弃行数(空行/空SKU/非法值)
    pub negative_quantities_fixed: usize, // 负数量钳为 0 的行数
}

/// 去重阶段统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupStats {
    pub duplicates_removed: usize, // 被剔除行数
}

/// 指标阶段统计(仅用于日志与摘要,不是主契约)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsStats {
    pub low_stock_items: usize,      // Low Stock 行数
    pub critical_stock_items: usize, // Critical + Out of Stock 行数
}

/// 全流水线合并统计(摘要报表的 processing_stats 字段)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStats {
    pub records_processed: usize,
    pub duplicates_removed: usize,
    pub invalid_records: usize,
    pub negative_quantities_fixed: usize,
    pub low_stock_items: usize,
    pub critical_stock_items: usize,
}

impl PipelineStats {
    /// 合并各阶段局部统计
    pub fn combine(cleaning: CleaningStats, dedup: DedupStats, metrics: MetricsStats) -> Self {
        Self {
            records_processed: cleaning.records_processed,
            duplicates_removed: dedup.duplicates_removed,
            invalid_records: cleaning.invalid_records,
            negative_quantities_fixed: cleaning.negative_quantities_fixed,
            low_stock_items: metrics.low_stock_items,
            critical_stock_items: metrics.critical_stock_items,
        }
    }
}

// ==========================================
// SummaryStatistics - 汇总统计快照
// ==========================================
// Summary Builder 的输出,纯聚合,不回写表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub processing_timestamp: DateTime<Utc>,
    pub total_records: usize,
    pub unique_skus: usize,
    pub locations: Vec<String>, // 去重后升序
    pub total_inventory_value: f64,
    pub average_unit_cost: f64,
    pub stock_status_breakdown: StockStatusBreakdown,
    pub top_value_items: Vec<TopValueItem>, // TotalValue 降序,稳定排序
    pub processing_stats: PipelineStats,
}

/// 库存状态分布计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockStatusBreakdown {
    #[serde(rename = "Normal")]
    pub normal: usize,
    #[serde(rename = "Low Stock")]
    pub low_stock: usize,
    #[serde(rename = "Critical")]
    pub critical: usize,
    #[serde(rename = "Out of Stock")]
    pub out_of_stock: usize,
}

impl StockStatusBreakdown {
    pub fn increment(&mut self, status: StockStatus) {
        match status {
            StockStatus::Normal => self.normal += 1,
            StockStatus::LowStock => self.low_stock += 1,
            StockStatus::Critical => self.critical += 1,
            StockStatus::OutOfStock => self.out_of_stock += 1,
        }
    }

    pub fn get(&self, status: StockStatus) -> usize {
        match status {
            StockStatus::Normal => self.normal,
            StockStatus::LowStock => self.low_stock,
            StockStatus::Critical => self.critical,
            StockStatus::OutOfStock => self.out_of_stock,
        }
    }

    pub fn total(&self) -> usize {
        self.normal + self.low_stock + self.critical + self.out_of_stock
    }
}

/// 高价值条目(Top-N by TotalValue)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopValueItem {
    #[serde(rename = "SKU")]
    pub sku: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "TotalValue")]
    pub total_value: f64,
}

// ==========================================
// ExtractionReport - 导入批次报告
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub batch_id: String, // UUID v4
    pub source_file: String,
    pub rows_extracted: usize,
    pub extracted_at: DateTime<Utc>,
}

// ==========================================
// PipelineOutcome - 流水线总输出
// ==========================================
// 三元组: 最终表 + 摘要 + 违规清单,交由外部写出器/告警器
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutcome {
    pub records: Vec<InventoryRecord>,
    pub summary: SummaryStatistics,
    pub violations: Vec<Violation>,
    pub stats: PipelineStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{StockStatus, ValidationStatus};

    fn sample_record() -> InventoryRecord {
        InventoryRecord {
            sku: "SKU001".to_string(),
            description: "Widget".to_string(),
            location: "WH1".to_string(),
            on_hand_qty: 10.0,
            reorder_point: 0.0,
            unit_cost: 2.5,
            reorder_qty: 0.0,
            stock_status: StockStatus::Normal,
            days_of_supply: f64::INFINITY,
            total_value: 25.0,
            processed_at: None,
            validation_status: ValidationStatus::Passed,
        }
    }

    #[test]
    fn test_blank_row_detection() {
        let blank = RawInventoryRecord {
            sku: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(blank.is_blank());

        let not_blank = RawInventoryRecord {
            sku: Some("A1".to_string()),
            ..Default::default()
        };
        assert!(!not_blank.is_blank());
    }

    #[test]
    fn test_infinite_days_of_supply_serializes_to_null() {
        let record = sample_record();
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("DaysOfSupply").unwrap().is_null());

        let back: InventoryRecord = serde_json::from_value(json).unwrap();
        assert!(back.days_of_supply.is_infinite());
    }

    #[test]
    fn test_record_column_names() {
        let json = serde_json::to_value(sample_record()).unwrap();
        for col in [
            "SKU",
            "Description",
            "Location",
            "OnHandQty",
            "ReorderPoint",
            "UnitCost",
            "ReorderQty",
            "StockStatus",
            "DaysOfSupply",
            "TotalValue",
            "ProcessedAt",
            "ValidationStatus",
        ] {
            assert!(json.get(col).is_some(), "missing column {}", col);
        }
    }

    #[test]
    fn test_breakdown_counts() {
        let mut breakdown = StockStatusBreakdown::default();
        breakdown.increment(StockStatus::Critical);
        breakdown.increment(StockStatus::Critical);
        breakdown.increment(StockStatus::Normal);
        assert_eq!(breakdown.get(StockStatus::Critical), 2);
        assert_eq!(breakdown.total(), 3);
    }
}
