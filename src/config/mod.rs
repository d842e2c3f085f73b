// ==========================================
// 库存管理自动化流水线 - 配置层
// ==========================================
// 职责: 流水线配置的定义与文件加载
// 红线: 不做运行环境探测,配置来源由调用方决定
// ==========================================

pub mod pipeline_config;

pub use pipeline_config::PipelineConfig;
