// ==========================================
// 库存管理自动化流水线 - 领域类型定义
// ==========================================
// 职责: 库存状态/校验状态/去重策略的封闭枚举
// 红线: 状态是封闭枚举,不是自由字符串
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 库存状态 (Stock Status)
// ==========================================
// 判定顺序见 MetricsCalculator::classify_stock_status
// 序列化格式: 报表展示字符串 (与下游报表口径一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockStatus {
    #[serde(rename = "Normal")]
    Normal, // 正常
    #[serde(rename = "Low Stock")]
    LowStock, // 低库存
    #[serde(rename = "Critical")]
    Critical, // 危急
    #[serde(rename = "Out of Stock")]
    OutOfStock, // 缺货
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockStatus::Normal => write!(f, "Normal"),
            StockStatus::LowStock => write!(f, "Low Stock"),
            StockStatus::Critical => write!(f, "Critical"),
            StockStatus::OutOfStock => write!(f, "Out of Stock"),
        }
    }
}

impl StockStatus {
    /// 是否需要补货关注（危急或缺货）
    pub fn is_actionable(&self) -> bool {
        matches!(self, StockStatus::Critical | StockStatus::OutOfStock)
    }
}

// ==========================================
// 校验状态 (Validation Status)
// ==========================================
// 业务规则校验结果,附加在记录上的咨询性标志
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationStatus {
    #[serde(rename = "Passed")]
    Passed, // 通过
    #[serde(rename = "Flagged")]
    Flagged, // 触发业务规则
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationStatus::Passed => write!(f, "Passed"),
            ValidationStatus::Flagged => write!(f, "Flagged"),
        }
    }
}

// ==========================================
// 去重策略 (Dedup Strategy)
// ==========================================
// 键: (sku, location)
// remove_all: 重复组全部剔除(含"原始"行),歧义数据不可信
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupStrategy {
    KeepFirst, // 保留组内最早一行
    KeepLast,  // 保留组内最晚一行
    RemoveAll, // 重复组零存活
}

impl fmt::Display for DedupStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DedupStrategy::KeepFirst => write!(f, "keep_first"),
            DedupStrategy::KeepLast => write!(f, "keep_last"),
            DedupStrategy::RemoveAll => write!(f, "remove_all"),
        }
    }
}

impl DedupStrategy {
    /// 从配置/命令行字符串解析
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "keep_first" => Some(DedupStrategy::KeepFirst),
            "keep_last" => Some(DedupStrategy::KeepLast),
            "remove_all" => Some(DedupStrategy::RemoveAll),
            _ => None,
        }
    }
}

// ==========================================
// 业务规则 (Violation Rule)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationRule {
    #[serde(rename = "High Reorder Point")]
    HighReorderPoint, // 再订货点过高
    #[serde(rename = "Unusual Unit Cost")]
    UnusualUnitCost, // 单位成本异常
}

impl fmt::Display for ViolationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationRule::HighReorderPoint => write!(f, "High Reorder Point"),
            ViolationRule::UnusualUnitCost => write!(f, "Unusual Unit Cost"),
        }
    }
}
