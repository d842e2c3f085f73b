// ==========================================
// 库存管理自动化流水线 - 导入层
// ==========================================
// 职责: 外部库存快照读取,生成内部原始行
// 支持: CSV, Excel
// ==========================================

pub mod extractor;

pub use extractor::{ExtractionResult, InventoryExtractor, REQUIRED_COLUMNS};
