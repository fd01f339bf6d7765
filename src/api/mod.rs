// ==========================================
// 区域能源需求分解系统 - 对外接口层
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 结果表约定
// ==========================================
// 职责: 结果的扁平化与导出
// ==========================================

pub mod export;

pub use export::{flatten_result, write_result_csv, ResultRow};
