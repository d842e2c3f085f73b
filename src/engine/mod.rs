// ==========================================
// 库存管理自动化流水线 - 引擎层
// ==========================================
// 职责: 五段核心处理阶段 + 编排器
// 红线: 引擎无状态,整表进整表出,不做文件访问
// ==========================================

pub mod cleaner;
pub mod dedup;
pub mod metrics;
pub mod orchestrator;
pub mod summary;
pub mod validator;

// 重导出引擎
pub use cleaner::RecordCleaner;
pub use dedup::Deduplicator;
pub use metrics::MetricsCalculator;
pub use orchestrator::{InventoryPipeline, PipelineOptions};
pub use summary::SummaryBuilder;
pub use validator::RuleValidator;
