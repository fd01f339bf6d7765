// ==========================================
// 区域能源需求分解系统 - 空间分配引擎
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 空间分配
// 红线: 片段之和 + 未下分量 必须等于源聚合量（容差内），违规即致命
// 红线: 逐层下探，每层独立归一化，不跨层直接分配
// ==========================================
// 职责: 把一个聚合需求量按组合键逐层分配到目标层级
// ==========================================

mod core;


pub use self::core::{AllocationEngine, SpatialAllocation};
