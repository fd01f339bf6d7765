// ==========================================
// 区域能源需求分解系统 - 时空联合管线
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 联合管线
// 红线: 空间优先执行，完成后对列和做顺序无关性自检，违规即致命
// 红线: 任一步骤失败整个请求失败，不产出部分结果
// ==========================================
// 职责: 校验 → 指纹/缓存 → 空间分配 → 逐片段时间展开 → 自检 → 持久化
// ==========================================

mod core;

#[cfg(test)]
mod tests;

pub use self::core::DisaggregationPipeline;
