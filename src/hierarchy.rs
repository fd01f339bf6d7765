// ==========================================
// 区域能源需求分解系统 - 区域层级树
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 区域层级
// 红线: 层级树加载后只读，遍历顺序确定（按编码稳定排序）
// 红线: 构造期校验无环/唯一父，违规即 MalformedHierarchy 快速失败
// ==========================================
// 职责: 国家 → 联邦州 → 行政区 → 市镇 的静态树与遍历
// 输入: 静态层级表 (code, level, parent_code) 三元组
// ==========================================

mod core;

#[cfg(test)]
mod tests;

pub use self::core::RegionHierarchy;
