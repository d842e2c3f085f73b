// ==========================================
// 库存管理自动化流水线 - 库存快照提取器
// ==========================================
// 职责: CSV/Excel 文件读取 + 表头模式校验 + 原始行生成
// 红线: 只产出未定型原始行,数值强转/修复归清洗器
// 口径: 缺列/空输入是结构性致命错误,在清洗开始前抛出
// ==========================================

use crate::domain::record::{ExtractionReport, RawInventoryRecord};
use crate::error::{PipelineError, PipelineResult};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::Utc;
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

/// 必需列全集,缺任意一列即致命(错误携带完整缺失清单)
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "SKU",
    "Description",
    "Location",
    "OnHandQty",
    "ReorderPoint",
    "UnitCost",
];

// ==========================================
// ExtractionResult - 提取结果
// ==========================================
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    pub records: Vec<RawInventoryRecord>,
    pub report: ExtractionReport,
}

// ==========================================
// InventoryExtractor - 库存快照提取器
// ==========================================
pub struct InventoryExtractor;

impl InventoryExtractor {
    /// 创建新的提取器实例
    pub fn new() -> Self {
        Self
    }

    /// 按扩展名自动选择解析器(主入口)
    ///
    /// # 参数
    /// - file_path: 输入文件路径(.csv/.xlsx/.xls)
    ///
    /// # 返回
    /// - ExtractionResult: 原始行列表 + 批次报告
    pub fn extract<P: AsRef<Path>>(&self, file_path: P) -> PipelineResult<ExtractionResult> {
        let path = file_path.as_ref();

        if !path.exists() {
            return Err(PipelineError::FileNotFound(path.display().to_string()));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        info!(file = %path.display(), format = %ext, "开始提取库存快照");

        match ext.as_str() {
            "csv" => self.extract_from_csv(path),
            "xlsx" | "xls" => self.extract_from_excel(path),
            _ => Err(PipelineError::UnsupportedFormat(ext)),
        }
    }

    /// 从 CSV 文件提取
    ///
    /// # 流程
    /// 1. 读取表头并 TRIM
    /// 2. 模式校验(必需列全集)
    /// 3. 逐行生成 RawInventoryRecord(行号从 2 起,跳过表头)
    ///
    /// 空白行保留,由清洗器第一步丢弃并计入 invalid_records
    pub fn extract_from_csv(&self, path: &Path) -> PipelineResult<ExtractionResult> {
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let column_index = Self::validate_schema(&headers)?;

        let mut records = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            let get = |col: usize| -> Option<String> {
                record
                    .get(col)
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
            };

            records.push(RawInventoryRecord {
                sku: get(column_index[0]),
                description: get(column_index[1]),
                location: get(column_index[2]),
                on_hand_qty: get(column_index[3]),
                reorder_point: get(column_index[4]),
                unit_cost: get(column_index[5]),
                row_number: row_idx + 2, // 行号从1开始,且跳过header
            });
        }

        self.finish(path, records)
    }

    /// 从 Excel 文件提取(第一个工作表)
    pub fn extract_from_excel(&self, path: &Path) -> PipelineResult<ExtractionResult> {
        let mut workbook = open_workbook_auto(path)?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| PipelineError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| PipelineError::EmptyInput(path.display().to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let column_index = Self::validate_schema(&headers)?;

        let mut records = Vec::new();
        for (row_idx, data_row) in rows.enumerate() {
            let get = |col: usize| -> Option<String> {
                data_row
                    .get(col)
                    .map(Self::cell_to_string)
                    .filter(|s| !s.is_empty())
            };

            records.push(RawInventoryRecord {
                sku: get(column_index[0]),
                description: get(column_index[1]),
                location: get(column_index[2]),
                on_hand_qty: get(column_index[3]),
                reorder_point: get(column_index[4]),
                unit_cost: get(column_index[5]),
                row_number: row_idx + 2,
            });
        }

        self.finish(path, records)
    }

    /// 表头模式校验
    ///
    /// # 返回
    /// - [usize; 6]: 必需列在表头中的下标(REQUIRED_COLUMNS 顺序)
    ///
    /// # 错误
    /// - MissingColumns: 携带全部缺失列名,一次性暴露
    fn validate_schema(headers: &[String]) -> PipelineResult<[usize; 6]> {
        let mut indexes = [0usize; 6];
        let mut missing = Vec::new();

        for (slot, required) in REQUIRED_COLUMNS.iter().enumerate() {
            match headers.iter().position(|h| h == required) {
                Some(idx) => indexes[slot] = idx,
                None => missing.push(required.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(PipelineError::MissingColumns { columns: missing });
        }

        Ok(indexes)
    }

    /// 空行数检查 + 批次报告生成
    fn finish(&self, path: &Path, records: Vec<RawInventoryRecord>) -> PipelineResult<ExtractionResult> {
        if records.is_empty() {
            return Err(PipelineError::EmptyInput(path.display().to_string()));
        }

        let report = ExtractionReport {
            batch_id: Uuid::new_v4().to_string(),
            source_file: path.display().to_string(),
            rows_extracted: records.len(),
            extracted_at: Utc::now(),
        };

        info!(
            batch_id = %report.batch_id,
            rows = report.rows_extracted,
            "提取完成"
        );

        Ok(ExtractionResult { records, report })
    }

    /// Excel 单元格转原始文本(空单元格 → 空串)
    fn cell_to_string(cell: &Data) -> String {
        match cell {
            Data::Empty => String::new(),
            other => other.to_string().trim().to_string(),
        }
    }
}

impl Default for InventoryExtractor {
    fn default() -> Self {
        Self::new()
    }
}
