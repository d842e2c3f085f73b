// ==========================================
// 库存管理自动化流水线 - 结果写出器
// ==========================================
// 职责: 最终表落盘 (CSV/JSON) + 摘要报告落盘 (JSON)
// 红线: 不做样式渲染,输出是无样式数据文件;
//       列名由领域模型的序列化契约决定,写出器不改名
// ==========================================

use crate::domain::record::{InventoryRecord, SummaryStatistics, Violation};
use crate::error::{PipelineError, PipelineResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, instrument};

// ==========================================
// SummaryReport - 摘要报告 JSON 结构
// ==========================================
// 键名与下游报表消费方约定一致,不可改动
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    pub report_generated_at: DateTime<Utc>,
    pub summary_statistics: SummaryStatistics,
    pub business_rule_violations: Vec<Violation>,
    pub violation_count: usize,
}

// ==========================================
// ResultWriter - 结果写出器
// ==========================================
pub struct ResultWriter;

impl ResultWriter {
    /// 创建新的写出器实例
    pub fn new() -> Self {
        Self
    }

    /// 最终表写出为 CSV
    ///
    /// 表头与 JSON 列名一致; days_of_supply 为无穷时落为空字段
    #[instrument(skip_all, fields(count = records.len(), path = %path.as_ref().display()))]
    pub fn save_to_csv<P: AsRef<Path>>(
        &self,
        records: &[InventoryRecord],
        path: P,
    ) -> PipelineResult<()> {
        let path = path.as_ref();
        Self::ensure_parent_dir(path)?;

        let mut writer = csv::Writer::from_path(path).map_err(|e| PipelineError::WriteError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        for record in records {
            writer
                .serialize(record)
                .map_err(|e| PipelineError::WriteError {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
        }

        writer.flush().map_err(|e| PipelineError::WriteError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        info!("最终表 CSV 写出完成");
        Ok(())
    }

    /// 最终表写出为 JSON(记录数组,缩进2)
    #[instrument(skip_all, fields(count = records.len(), path = %path.as_ref().display()))]
    pub fn save_to_json<P: AsRef<Path>>(
        &self,
        records: &[InventoryRecord],
        path: P,
    ) -> PipelineResult<()> {
        let path = path.as_ref();
        Self::ensure_parent_dir(path)?;

        let json = serde_json::to_string_pretty(records)?;
        fs::write(path, json).map_err(|e| PipelineError::WriteError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        info!("最终表 JSON 写出完成");
        Ok(())
    }

    /// 摘要报告写出(摘要 + 违规清单 + 违规计数)
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn save_summary_report<P: AsRef<Path>>(
        &self,
        summary: &SummaryStatistics,
        violations: &[Violation],
        path: P,
    ) -> PipelineResult<()> {
        let path = path.as_ref();
        Self::ensure_parent_dir(path)?;

        let report = SummaryReport {
            report_generated_at: Utc::now(),
            summary_statistics: summary.clone(),
            business_rule_violations: violations.to_vec(),
            violation_count: violations.len(),
        };

        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json).map_err(|e| PipelineError::WriteError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        info!(violations = violations.len(), "摘要报告写出完成");
        Ok(())
    }

    // 输出目录不存在时级联创建
    fn ensure_parent_dir(path: &Path) -> PipelineResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| PipelineError::WriteError {
                    path: parent.display().to_string(),
                    message: e.to_string(),
                })?;
            }
        }
        Ok(())
    }
}

impl Default for ResultWriter {
    fn default() -> Self {
        Self::new()
    }
}
