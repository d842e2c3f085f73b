// ==========================================
// 库存管理自动化流水线 - 核心库
// ==========================================
// 技术栈: Rust + serde + csv/calamine
// 系统定位: 批处理数据流水线 (单线程同步,整表进整表出)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 五段处理阶段 + 编排器
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 流水线配置
pub mod config;

// 写出层 - 结果落盘
pub mod writer;

// 工作流层 - 端到端编排
pub mod workflow;

// 错误类型
pub mod error;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DedupStrategy, StockStatus, ValidationStatus, ViolationRule};

// 领域实体
pub use domain::{
    CleaningStats, DedupStats, ExtractionReport, InventoryRecord, MetricsStats, PipelineOutcome,
    PipelineStats, RawInventoryRecord, StockStatusBreakdown, SummaryStatistics, TopValueItem,
    Violation,
};

// 引擎
pub use engine::{
    Deduplicator, InventoryPipeline, MetricsCalculator, PipelineOptions, RecordCleaner,
    RuleValidator, SummaryBuilder,
};

// 导入/写出/工作流
pub use importer::{InventoryExtractor, REQUIRED_COLUMNS};
pub use writer::ResultWriter;
pub use workflow::{InventoryWorkflow, WorkflowReport};

// 配置与错误
pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "库存管理自动化流水线";

// ==========================================
// 预编译检查
// ==========================================

// 确保编译时所有模块可见
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
