// ==========================================
// 区域能源需求分解系统 - 键目录
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 键目录
// 红线: 归一化发生在使用时；未知权重不进分母
// 红线: 键组合在边界一次性校验，递归内部不再复查
// ==========================================
// 职责: 空间权重键 / 负荷曲线 / 温度序列的注册与查询
// ==========================================

mod combination;
mod core;


pub use combination::KeyCombination;
pub use self::core::KeyRegistry;
