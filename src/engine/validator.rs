// ==========================================
// 库存管理自动化流水线 - 业务规则校验引擎
// ==========================================
// 职责: 扫描计算后表,产出违规清单 + 写入校验状态列
// 红线: 违规不是错误 —— 表依然可用,违规是给下游告警的
//       咨询性标志;两条规则独立评估,不跨规则去重
// 输入: 含派生列记录
// 输出: (含 validation_status 记录, 违规清单)
// ==========================================
// 顺序保证: 规则1全部行在前,规则2全部行在后,
//           规则内保持表内行序;同一 SKU 可出现两次
// ==========================================

use crate::domain::record::{InventoryRecord, Violation};
use crate::domain::types::{ValidationStatus, ViolationRule};
use std::collections::{HashMap, HashSet};
use tracing::{info, instrument};

// 再订货点合理性比例: 不应超过该 SKU 最大观测数量的 50%
const HIGH_REORDER_RATIO: f64 = 0.5;

// 单位成本合理区间(绝对界,不随数据集变化)
const UNIT_COST_MIN: f64 = 0.1;
const UNIT_COST_MAX: f64 = 1000.0;

// ==========================================
// RuleValidator - 业务规则校验引擎
// ==========================================
pub struct RuleValidator;

impl RuleValidator {
    /// 创建新的校验引擎
    pub fn new() -> Self {
        Self
    }

    /// 校验业务规则(主入口)
    ///
    /// # 返回
    /// - (写入 validation_status 的记录, 违规清单)
    ///
    /// SKU 出现在违规清单中的记录标记 Flagged,其余 Passed
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub fn validate(
        &self,
        mut records: Vec<InventoryRecord>,
    ) -> (Vec<InventoryRecord>, Vec<Violation>) {
        let mut violations = Vec::new();

        // 每 SKU 最大观测数量,整表一次性预计算(跨库位口径)
        let max_qty_per_sku = Self::max_qty_per_sku(&records);

        // === 规则1: 再订货点过高 ===
        for record in &records {
            // 该 SKU 必在映射中(映射由同一张表构建)
            let max_qty = max_qty_per_sku
                .get(record.sku.as_str())
                .copied()
                .unwrap_or(record.on_hand_qty);

            if record.reorder_point > max_qty * HIGH_REORDER_RATIO {
                violations.push(Violation {
                    sku: record.sku.clone(),
                    location: record.location.clone(),
                    rule: ViolationRule::HighReorderPoint,
                    details: format!(
                        "Reorder point ({}) > 50% of max quantity ({})",
                        record.reorder_point, max_qty
                    ),
                });
            }
        }

        // === 规则2: 单位成本异常(绝对界) ===
        for record in &records {
            if record.unit_cost < UNIT_COST_MIN || record.unit_cost > UNIT_COST_MAX {
                violations.push(Violation {
                    sku: record.sku.clone(),
                    location: record.location.clone(),
                    rule: ViolationRule::UnusualUnitCost,
                    details: format!("Unit cost ${:.2} may be incorrect", record.unit_cost),
                });
            }
        }

        // === 标记校验状态(按 SKU 交叉引用) ===
        let flagged_skus: HashSet<&str> = violations.iter().map(|v| v.sku.as_str()).collect();
        for record in &mut records {
            record.validation_status = if flagged_skus.contains(record.sku.as_str()) {
                ValidationStatus::Flagged
            } else {
                ValidationStatus::Passed
            };
        }

        info!(violations = violations.len(), "业务规则校验完成");

        (records, violations)
    }

    // 每 SKU 的最大在库数量(跨全部库位)
    fn max_qty_per_sku(records: &[InventoryRecord]) -> HashMap<&str, f64> {
        let mut map: HashMap<&str, f64> = HashMap::new();
        for record in records {
            map.entry(record.sku.as_str())
                .and_modify(|max| *max = max.max(record.on_hand_qty))
                .or_insert(record.on_hand_qty);
        }
        map
    }
}

impl Default for RuleValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::StockStatus;

    fn record(sku: &str, location: &str, qty: f64, reorder_point: f64, cost: f64) -> InventoryRecord {
        InventoryRecord {
            sku: sku.to_string(),
            description: "Item".to_string(),
            location: location.to_string(),
            on_hand_qty: qty,
            reorder_point,
            unit_cost: cost,
            reorder_qty: 0.0,
            stock_status: StockStatus::Normal,
            days_of_supply: 0.0,
            total_value: 0.0,
            processed_at: None,
            validation_status: ValidationStatus::Passed,
        }
    }

    #[test]
    fn test_unusual_unit_cost_low_bound() {
        // 场景 E: 单位成本 0.05 触发规则并标记 Flagged
        let validator = RuleValidator::new();
        let (records, violations) =
            validator.validate(vec![record("A1", "WH1", 100.0, 10.0, 0.05)]);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, ViolationRule::UnusualUnitCost);
        assert_eq!(records[0].validation_status, ValidationStatus::Flagged);
    }

    #[test]
    fn test_unusual_unit_cost_high_bound() {
        let validator = RuleValidator::new();
        let (_, violations) = validator.validate(vec![record("A1", "WH1", 100.0, 10.0, 1500.0)]);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, ViolationRule::UnusualUnitCost);
    }

    #[test]
    fn test_cost_bounds_are_inclusive_safe() {
        // 边界值本身不违规
        let validator = RuleValidator::new();
        let (_, violations) = validator.validate(vec![
            record("A1", "WH1", 100.0, 10.0, 0.1),
            record("A2", "WH1", 100.0, 10.0, 1000.0),
        ]);
        assert!(violations.is_empty());
    }

    #[test]
    fn test_high_reorder_point_uses_cross_location_max() {
        // SKU 在 WH2 的最大数量 100 抬高了基准,WH1 行不违规
        let validator = RuleValidator::new();
        let (_, violations) = validator.validate(vec![
            record("A1", "WH1", 10.0, 40.0, 5.0),
            record("A1", "WH2", 100.0, 40.0, 5.0),
        ]);
        assert!(violations.is_empty());
    }

    #[test]
    fn test_high_reorder_point_flagged() {
        let validator = RuleValidator::new();
        let (records, violations) = validator.validate(vec![record("A1", "WH1", 10.0, 6.0, 5.0)]);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, ViolationRule::HighReorderPoint);
        assert!(violations[0].details.contains("Reorder point (6)"));
        assert_eq!(records[0].validation_status, ValidationStatus::Flagged);
    }

    #[test]
    fn test_both_rules_can_fire_for_same_sku() {
        // 不跨规则去重: 同一 SKU 两条违规
        let validator = RuleValidator::new();
        let (_, violations) = validator.validate(vec![record("A1", "WH1", 10.0, 6.0, 0.05)]);

        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].rule, ViolationRule::HighReorderPoint);
        assert_eq!(violations[1].rule, ViolationRule::UnusualUnitCost);
    }

    #[test]
    fn test_rule_order_in_violation_list() {
        // 规则1的行先于规则2,规则内保持表序
        let validator = RuleValidator::new();
        let (_, violations) = validator.validate(vec![
            record("COST", "WH1", 100.0, 10.0, 2000.0),
            record("HIGH", "WH1", 10.0, 6.0, 5.0),
        ]);

        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].rule, ViolationRule::HighReorderPoint);
        assert_eq!(violations[0].sku, "HIGH");
        assert_eq!(violations[1].rule, ViolationRule::UnusualUnitCost);
        assert_eq!(violations[1].sku, "COST");
    }

    #[test]
    fn test_clean_table_all_passed() {
        let validator = RuleValidator::new();
        let (records, violations) = validator.validate(vec![
            record("A1", "WH1", 100.0, 20.0, 5.0),
            record("A2", "WH1", 50.0, 25.0, 9.0),
        ]);

        assert!(violations.is_empty());
        assert!(records
            .iter()
            .all(|r| r.validation_status == ValidationStatus::Passed));
    }

    #[test]
    fn test_flag_propagates_to_all_rows_of_sku() {
        // 同 SKU 其他库位的行也被标记(按 SKU 交叉引用)
        let validator = RuleValidator::new();
        let (records, _) = validator.validate(vec![
            record("A1", "WH1", 100.0, 10.0, 0.05),
            record("A1", "WH2", 100.0, 10.0, 5.0),
        ]);

        assert_eq!(records[0].validation_status, ValidationStatus::Flagged);
        assert_eq!(records[1].validation_status, ValidationStatus::Flagged);
    }
}
