// ==========================================
// 库存管理自动化流水线 - 工作流编排
// ==========================================
// 职责: 提取 → 流水线处理 → 结果落盘 的端到端编排
// 红线: 三段任一结构性失败即整体失败,不产出半套文件;
//       告警/通知不在本层职责内
// ==========================================

use crate::config::PipelineConfig;
use crate::domain::record::{ExtractionReport, PipelineOutcome};
use crate::engine::{InventoryPipeline, PipelineOptions};
use crate::error::PipelineResult;
use crate::importer::InventoryExtractor;
use crate::writer::ResultWriter;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

// 输出文件名(与下游消费方约定)
pub const PROCESSED_CSV: &str = "inventory_processed.csv";
pub const PROCESSED_JSON: &str = "inventory_processed.json";
pub const SUMMARY_REPORT: &str = "processing_report.json";

// ==========================================
// WorkflowReport - 工作流执行结果
// ==========================================
#[derive(Debug)]
pub struct WorkflowReport {
    pub extraction: ExtractionReport,
    pub outcome: PipelineOutcome,
    pub output_files: Vec<PathBuf>,
}

// ==========================================
// InventoryWorkflow - 端到端工作流
// ==========================================
pub struct InventoryWorkflow {
    config: PipelineConfig,
}

impl InventoryWorkflow {
    /// 创建新的工作流实例
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// 执行完整工作流(主入口)
    ///
    /// # 参数
    /// - input_file: 库存快照文件 (.csv/.xlsx/.xls)
    /// - output_dir: 输出目录(不存在时创建)
    /// - options: 流水线开关
    ///
    /// # 输出文件
    /// - inventory_processed.csv / inventory_processed.json: 最终表
    /// - processing_report.json: 摘要 + 违规清单
    #[instrument(skip_all, fields(input = %input_file.as_ref().display()))]
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_file: P,
        output_dir: Q,
        options: PipelineOptions,
    ) -> PipelineResult<WorkflowReport> {
        let output_dir = output_dir.as_ref();

        info!("============================================================");
        info!("库存管理自动化工作流启动");
        info!("============================================================");

        // === 阶段 1: 数据提取 ===
        info!("阶段 1: 数据提取");
        let extraction = InventoryExtractor::new().extract(&input_file)?;
        info!(rows = extraction.report.rows_extracted, "提取完成");

        // === 阶段 2: 流水线处理 ===
        info!("阶段 2: 流水线处理");
        let pipeline = InventoryPipeline::new(&self.config);
        let outcome = pipeline.run(extraction.records, options)?;
        info!(
            records = outcome.records.len(),
            violations = outcome.violations.len(),
            "处理完成"
        );

        // === 阶段 3: 结果落盘 ===
        info!("阶段 3: 结果落盘");
        let writer = ResultWriter::new();
        let csv_path = output_dir.join(PROCESSED_CSV);
        let json_path = output_dir.join(PROCESSED_JSON);
        let report_path = output_dir.join(SUMMARY_REPORT);

        writer.save_to_csv(&outcome.records, &csv_path)?;
        writer.save_to_json(&outcome.records, &json_path)?;
        writer.save_summary_report(&outcome.summary, &outcome.violations, &report_path)?;

        let output_files = vec![csv_path, json_path, report_path];
        info!(files = output_files.len(), "工作流完成");

        Ok(WorkflowReport {
            extraction: extraction.report,
            outcome,
            output_files,
        })
    }
}
