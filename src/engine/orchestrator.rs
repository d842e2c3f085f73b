// ==========================================
// 库存管理自动化流水线 - 流水线编排器
// ==========================================
// 用途: 协调五段核心阶段的执行顺序
// 控制流: 原始行 → 清洗 → 去重 → 指标 → 校验 → 汇总
// 红线: 单线程同步执行,各阶段整表进整表出,
//       除 processed_at 外输出对输入完全确定
// ==========================================

use crate::config::PipelineConfig;
use crate::domain::record::{PipelineOutcome, PipelineStats, RawInventoryRecord};
use crate::domain::types::DedupStrategy;
use crate::engine::{
    Deduplicator, MetricsCalculator, RecordCleaner, RuleValidator, SummaryBuilder,
};
use crate::error::{PipelineError, PipelineResult};
use tracing::{info, instrument};

// ==========================================
// PipelineOptions - 单次运行开关
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    pub remove_duplicates: bool,       // 是否执行去重阶段
    pub dedup_strategy: DedupStrategy, // 去重策略
    pub validate_rules: bool,          // 是否执行业务规则校验
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            remove_duplicates: true,
            dedup_strategy: DedupStrategy::KeepLast,
            validate_rules: true,
        }
    }
}

// ==========================================
// InventoryPipeline - 流水线编排器
// ==========================================
pub struct InventoryPipeline {
    cleaner: RecordCleaner,
    deduplicator: Deduplicator,
    calculator: MetricsCalculator,
    validator: RuleValidator,
    summary_builder: SummaryBuilder,
}

impl InventoryPipeline {
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - config: 流水线配置
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            cleaner: RecordCleaner::new(),
            deduplicator: Deduplicator::new(),
            calculator: MetricsCalculator::new(config),
            validator: RuleValidator::new(),
            summary_builder: SummaryBuilder::new(),
        }
    }

    /// 执行完整处理流程(主入口)
    ///
    /// # 参数
    /// - raw_records: 原始行(来自导入层)
    /// - options: 单次运行开关
    ///
    /// # 返回
    /// - PipelineOutcome: 最终表 + 摘要 + 违规清单 + 合并统计
    ///
    /// # 错误
    /// - EmptyInput: 空输入是结构性致命错误
    ///
    /// 行级数据问题不会中止流程,统一降级为统计计数器
    #[instrument(skip(self, raw_records), fields(count = raw_records.len()))]
    pub fn run(
        &self,
        raw_records: Vec<RawInventoryRecord>,
        options: PipelineOptions,
    ) -> PipelineResult<PipelineOutcome> {
        if raw_records.is_empty() {
            return Err(PipelineError::EmptyInput(
                "流水线输入不含任何数据行".to_string(),
            ));
        }

        info!("开始库存处理流水线");

        // === 阶段 1: 数据清洗 ===
        let (records, cleaning_stats) = self.cleaner.clean(raw_records);

        // === 阶段 2: 去重(可选) ===
        let (records, dedup_stats) = if options.remove_duplicates {
            self.deduplicator.deduplicate(records, options.dedup_strategy)
        } else {
            (records, Default::default())
        };

        // === 阶段 3: 补货指标计算 ===
        let (records, metrics_stats) = self.calculator.calculate(records);

        // === 阶段 4: 业务规则校验(可选) ===
        let (records, violations) = if options.validate_rules {
            self.validator.validate(records)
        } else {
            (records, Vec::new())
        };

        // === 阶段 5: 汇总统计 ===
        let stats = PipelineStats::combine(cleaning_stats, dedup_stats, metrics_stats);
        let summary = self.summary_builder.build(&records, stats);

        info!(
            records = records.len(),
            violations = violations.len(),
            "库存处理流水线完成"
        );

        Ok(PipelineOutcome {
            records,
            summary,
            violations,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(sku: &str, qty: &str, reorder: &str, cost: &str) -> RawInventoryRecord {
        RawInventoryRecord {
            sku: Some(sku.to_string()),
            description: Some("Item".to_string()),
            location: Some("WH1".to_string()),
            on_hand_qty: Some(qty.to_string()),
            reorder_point: Some(reorder.to_string()),
            unit_cost: Some(cost.to_string()),
            row_number: 2,
        }
    }

    #[test]
    fn test_empty_input_is_fatal() {
        let pipeline = InventoryPipeline::new(&PipelineConfig::default());
        let result = pipeline.run(Vec::new(), PipelineOptions::default());
        assert!(matches!(result, Err(PipelineError::EmptyInput(_))));
    }

    #[test]
    fn test_full_run_combines_stage_stats() {
        let pipeline = InventoryPipeline::new(&PipelineConfig::default());
        let outcome = pipeline
            .run(
                vec![
                    raw("A1", "-5", "20", "10"),  // 负数量钳 0 → Out of Stock
                    raw("A2", "50", "25", "10"),  // Normal
                    raw("A2", "60", "25", "10"),  // 与上行同键 → keep_last 存活
                ],
                PipelineOptions::default(),
            )
            .unwrap();

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.stats.negative_quantities_fixed, 1);
        assert_eq!(outcome.stats.duplicates_removed, 1);
        assert_eq!(outcome.summary.total_records, 2);
        assert_eq!(outcome.records[1].on_hand_qty, 60.0);
    }

    #[test]
    fn test_dedup_can_be_skipped() {
        let pipeline = InventoryPipeline::new(&PipelineConfig::default());
        let outcome = pipeline
            .run(
                vec![raw("A1", "10", "5", "1"), raw("A1", "20", "5", "1")],
                PipelineOptions {
                    remove_duplicates: false,
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.stats.duplicates_removed, 0);
    }

    #[test]
    fn test_validation_can_be_skipped() {
        let pipeline = InventoryPipeline::new(&PipelineConfig::default());
        let outcome = pipeline
            .run(
                vec![raw("A1", "100", "10", "0.05")], // 本应触发成本规则
                PipelineOptions {
                    validate_rules: false,
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(outcome.violations.is_empty());
    }
}
