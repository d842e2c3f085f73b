// ==========================================
// 库存管理自动化流水线 - 记录清洗器
// ==========================================
// 职责: 规范化 + 数值强转 + 缺省填补 + 非法行丢弃
// 红线: 行级问题不抛异常,就地修复或丢弃并计数
// 输入: 原始行(未定型)
// 输出: (清洗后记录, 清洗统计)
// ==========================================
// 清洗口径:
// 1) 整行空白 → 丢弃
// 2) SKU: TRIM + UPPER,空值行丢弃
// 3) Description: TRIM,空值替换 "Unknown Item"
// 4) Location: TRIM + UPPER
// 5) 数值列强转失败 → 缺失;数量/再订货点缺省 0,
//    单位成本缺省取列中位数(对已强转成功值计算)
// 6) 负在库数量钳为 0(计数,不丢弃)
// 7) 终检 reorder_point < 0 或 unit_cost <= 0 → 丢弃计入 invalid
// ==========================================

use crate::domain::record::{CleaningStats, InventoryRecord, RawInventoryRecord};
use crate::domain::types::{StockStatus, ValidationStatus};
use tracing::{info, instrument};

/// 空描述的占位文本
pub const UNKNOWN_ITEM_PLACEHOLDER: &str = "Unknown Item";

// 强转成功但数值非有限(NaN/Inf)一律视为缺失
fn coerce_numeric(raw: &Option<String>) -> Option<f64> {
    raw.as_deref()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

// 已强转值的中位数(偶数个取中间两值均值);无样本时为 None
fn median(values: &mut Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    // 样本已过滤为有限值,可全序比较
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = values.len();
    if n % 2 == 1 {
        Some(values[n / 2])
    } else {
        Some((values[n / 2 - 1] + values[n / 2]) / 2.0)
    }
}

// 第一趟扫描的中间行(规范化完成,数值仍可缺失)
struct PartialRecord {
    sku: String,
    description: String,
    location: String,
    on_hand_qty: Option<f64>,
    reorder_point: Option<f64>,
    unit_cost: Option<f64>,
}

// ==========================================
// RecordCleaner - 记录清洗器
// ==========================================
// 红线: 无状态,纯函数式,统计随返回值交还
pub struct RecordCleaner;

impl RecordCleaner {
    /// 创建新的清洗器实例
    pub fn new() -> Self {
        Self
    }

    /// 清洗原始行(主入口)
    ///
    /// # 返回
    /// - (存活记录, CleaningStats)
    ///
    /// # 幂等性
    /// 对已清洗的表再次清洗,输出与输入逐行一致
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub fn clean(&self, records: Vec<RawInventoryRecord>) -> (Vec<InventoryRecord>, CleaningStats) {
        let original_count = records.len();
        let mut negative_fixed = 0usize;

        // === 第一趟: 文本规范化 + 数值强转 ===
        let mut partials = Vec::with_capacity(records.len());
        let mut observed_costs = Vec::new();

        for record in records {
            // 规则1: 整行空白直接丢弃
            if record.is_blank() {
                continue;
            }

            // 规则2: SKU 规范化,空值行丢弃
            let sku = record
                .sku
                .as_deref()
                .map(|s| s.trim().to_uppercase())
                .unwrap_or_default();
            if sku.is_empty() {
                continue;
            }

            // 规则3: 描述规范化,空值用占位文本
            let description = record
                .description
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(UNKNOWN_ITEM_PLACEHOLDER)
                .to_string();

            // 规则4: 库位规范化
            let location = record
                .location
                .as_deref()
                .map(|s| s.trim().to_uppercase())
                .unwrap_or_default();

            // 规则5: 数值强转(失败 → 缺失)
            let on_hand_qty = coerce_numeric(&record.on_hand_qty);
            let reorder_point = coerce_numeric(&record.reorder_point);
            let unit_cost = coerce_numeric(&record.unit_cost);

            if let Some(cost) = unit_cost {
                observed_costs.push(cost);
            }

            partials.push(PartialRecord {
                sku,
                description,
                location,
                on_hand_qty,
                reorder_point,
                unit_cost,
            });
        }

        // 单位成本缺省值: 已强转成功值的列中位数
        let cost_median = median(&mut observed_costs);

        // === 第二趟: 缺省填补 + 负值钳制 + 终检 ===
        let mut cleaned = Vec::with_capacity(partials.len());
        for partial in partials {
            let mut on_hand_qty = partial.on_hand_qty.unwrap_or(0.0);
            let reorder_point = partial.reorder_point.unwrap_or(0.0);

            // 缺失成本无中位数可补时,该行过不了终检,丢弃
            let unit_cost = match partial.unit_cost.or(cost_median) {
                Some(cost) => cost,
                None => continue,
            };

            // 规则6: 负数量钳为 0(业务口径: 按 0 处理)
            if on_hand_qty < 0.0 {
                on_hand_qty = 0.0;
                negative_fixed += 1;
            }

            // 规则7: 终检
            if reorder_point < 0.0 || unit_cost <= 0.0 {
                continue;
            }

            cleaned.push(InventoryRecord {
                sku: partial.sku,
                description: partial.description,
                location: partial.location,
                on_hand_qty,
                reorder_point,
                unit_cost,
                // 派生列留给 MetricsCalculator 填充
                reorder_qty: 0.0,
                stock_status: StockStatus::Normal,
                days_of_supply: 0.0,
                total_value: 0.0,
                processed_at: None,
                validation_status: ValidationStatus::Passed,
            });
        }

        let stats = CleaningStats {
            records_processed: cleaned.len(),
            invalid_records: original_count - cleaned.len(),
            negative_quantities_fixed: negative_fixed,
        };

        info!(
            survived = stats.records_processed,
            dropped = stats.invalid_records,
            negative_fixed = stats.negative_quantities_fixed,
            "数据清洗完成"
        );

        (cleaned, stats)
    }
}

impl Default for RecordCleaner {
    fn default() -> Self {
        Self::new()
    }
}
