// ==========================================
// 库存管理自动化流水线 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、统计快照
// 红线: 不含文件访问逻辑,不含引擎逻辑
// ==========================================

pub mod record;
pub mod types;

// 重导出核心类型
pub use record::{
    CleaningStats, DedupStats, ExtractionReport, InventoryRecord, MetricsStats, PipelineOutcome,
    PipelineStats, RawInventoryRecord, StockStatusBreakdown, SummaryStatistics, TopValueItem,
    Violation,
};
pub use types::{DedupStrategy, StockStatus, ValidationStatus, ViolationRule};
