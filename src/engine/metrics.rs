// ==========================================
// 库存管理自动化流水线 - 补货指标计算引擎
// ==========================================
// 职责: 派生补货量 + 库存状态 + 供应天数 + 库存价值
// 红线: 状态是"顺序判定制",不是评分制 —— 区间有重叠,
//       判定顺序即优先级,最特异规则先命中
// 输入: 去重后记录
// 输出: (含派生列记录, 指标统计)
// ==========================================

use crate::config::PipelineConfig;
use crate::domain::record::{InventoryRecord, MetricsStats};
use crate::domain::types::StockStatus;
use chrono::Utc;
use tracing::{info, instrument};

// 理论补货周期(天),供应天数按此折算
const REORDER_CYCLE_DAYS: f64 = 30.0;

// ==========================================
// MetricsCalculator - 补货指标计算引擎
// ==========================================
pub struct MetricsCalculator {
    critical_stock_threshold: f64,
}

impl MetricsCalculator {
    /// 创建新的指标计算引擎
    ///
    /// # 参数
    /// - config: 流水线配置(取 critical_stock_threshold)
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            critical_stock_threshold: f64::from(config.critical_stock_threshold),
        }
    }

    /// 批量计算派生指标(主入口)
    ///
    /// 同批次所有记录使用同一 processed_at 时间戳,
    /// 除该时间戳外输出对输入完全确定
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub fn calculate(&self, records: Vec<InventoryRecord>) -> (Vec<InventoryRecord>, MetricsStats) {
        let processed_at = Utc::now();
        let mut stats = MetricsStats::default();

        let computed: Vec<InventoryRecord> = records
            .into_iter()
            .map(|mut record| {
                record.reorder_qty = (record.reorder_point - record.on_hand_qty).max(0.0);
                record.stock_status =
                    self.classify_stock_status(record.on_hand_qty, record.reorder_point);
                record.days_of_supply =
                    Self::days_of_supply(record.on_hand_qty, record.reorder_point);
                record.total_value = record.on_hand_qty * record.unit_cost;
                record.processed_at = Some(processed_at);

                match record.stock_status {
                    StockStatus::LowStock => stats.low_stock_items += 1,
                    StockStatus::Critical | StockStatus::OutOfStock => {
                        stats.critical_stock_items += 1
                    }
                    StockStatus::Normal => {}
                }

                record
            })
            .collect();

        info!(
            items = computed.len(),
            low_stock = stats.low_stock_items,
            critical = stats.critical_stock_items,
            "指标计算完成"
        );

        (computed, stats)
    }

    /// 库存状态判定
    ///
    /// 顺序（优先级递减,命中即返回）:
    /// 1) on_hand_qty == 0 → Out of Stock (压倒一切)
    /// 2) on_hand_qty <= critical_stock_threshold → Critical
    /// 3) on_hand_qty < reorder_point → Low Stock
    /// 4) 默认 → Normal
    pub fn classify_stock_status(&self, on_hand_qty: f64, reorder_point: f64) -> StockStatus {
        if on_hand_qty == 0.0 {
            return StockStatus::OutOfStock;
        }
        if on_hand_qty <= self.critical_stock_threshold {
            return StockStatus::Critical;
        }
        if on_hand_qty < reorder_point {
            return StockStatus::LowStock;
        }
        StockStatus::Normal
    }

    /// 供应天数: on_hand_qty / (reorder_point / 30)
    ///
    /// reorder_point = 0 时无补货周期定义,视为无界供应
    pub fn days_of_supply(on_hand_qty: f64, reorder_point: f64) -> f64 {
        if reorder_point > 0.0 {
            on_hand_qty / (reorder_point / REORDER_CYCLE_DAYS)
        } else {
            f64::INFINITY
        }
    }
}
