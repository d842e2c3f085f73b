// ==========================================
// 库存管理自动化流水线 - 错误类型
// ==========================================
// 工具: thiserror 派生宏
// 口径: 仅结构性输入错误中止流水线;
//       行级数据问题在清洗策略内就地消化为计数器
// ==========================================

use thiserror::Error;

/// 流水线错误类型
#[derive(Error, Debug)]
pub enum PipelineError {
    // ===== 结构性输入错误(致命,清洗开始前抛出)=====
    #[error("缺少必需列: {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("输入为空: {0}")]
    EmptyInput(String),

    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 配置错误 =====
    #[error("配置读取失败 ({path}): {message}")]
    ConfigError { path: String, message: String },

    // ===== 输出错误 =====
    #[error("结果写出失败 ({path}): {message}")]
    WriteError { path: String, message: String },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for PipelineError {
    fn from(err: csv::Error) -> Self {
        PipelineError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for PipelineError {
    fn from(err: calamine::Error) -> Self {
        PipelineError::ExcelParseError(err.to_string())
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::InternalError(format!("JSON 序列化失败: {}", err))
    }
}

/// Result 类型别名
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_lists_all() {
        let err = PipelineError::MissingColumns {
            columns: vec!["OnHandQty".to_string(), "UnitCost".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("OnHandQty"));
        assert!(msg.contains("UnitCost"));
    }
}
