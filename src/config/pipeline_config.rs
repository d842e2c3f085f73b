// ==========================================
// 库存管理自动化流水线 - 流水线配置
// ==========================================
// 职责: 核心流水线识别的配置项加载与校验
// 存储: JSON 配置文件(可选),缺省走默认值
// ==========================================

use crate::error::{PipelineError, PipelineResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// 默认值口径与原系统一致
const DEFAULT_LOW_STOCK_MULTIPLIER: f64 = 1.2;
const DEFAULT_CRITICAL_STOCK_THRESHOLD: u32 = 5;

// ==========================================
// PipelineConfig - 核心流水线配置
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// 低库存乘数
    ///
    /// 历史遗留参数: 被加载、被识别,但当前不参与状态判定逻辑。
    /// 在与业务方确认语义前不得赋予新含义。
    pub low_stock_multiplier: f64,

    /// 危急库存阈值: on_hand_qty <= 该值 且 > 0 时判为 Critical
    pub critical_stock_threshold: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            low_stock_multiplier: DEFAULT_LOW_STOCK_MULTIPLIER,
            critical_stock_threshold: DEFAULT_CRITICAL_STOCK_THRESHOLD,
        }
    }
}

impl PipelineConfig {
    /// 从 JSON 配置文件加载
    ///
    /// # 参数
    /// - path: 配置文件路径
    ///
    /// # 返回
    /// - PipelineConfig: 未出现的键取默认值
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> PipelineResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| PipelineError::ConfigError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config: PipelineConfig =
            serde_json::from_str(&raw).map_err(|e| PipelineError::ConfigError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// 配置合法性校验
    pub fn validate(&self) -> PipelineResult<()> {
        if !self.low_stock_multiplier.is_finite() || self.low_stock_multiplier <= 0.0 {
            return Err(PipelineError::ConfigError {
                path: "low_stock_multiplier".to_string(),
                message: format!("必须为正有限数,实际 {}", self.low_stock_multiplier),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_values() {
        let config = PipelineConfig::default();
        assert_eq!(config.low_stock_multiplier, 1.2);
        assert_eq!(config.critical_stock_threshold, 5);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{{\"critical_stock_threshold\": 10}}").unwrap();

        let config = PipelineConfig::from_json_file(temp_file.path()).unwrap();
        assert_eq!(config.critical_stock_threshold, 10);
        assert_eq!(config.low_stock_multiplier, 1.2);
    }

    #[test]
    fn test_invalid_multiplier_rejected() {
        let config = PipelineConfig {
            low_stock_multiplier: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = PipelineConfig::from_json_file("no_such_config.json");
        assert!(matches!(result, Err(PipelineError::ConfigError { .. })));
    }
}
