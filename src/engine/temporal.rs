// ==========================================
// 区域能源需求分解系统 - 时间展开引擎
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 时间展开
// 红线: 天气修正只改形状，不改总量；展开序列之和必须等于年度值
// 红线: 曲线长度与目标网格不一致即 ResolutionMismatch，绝不重采样
// ==========================================
// 职责: 把一个年度需求量按归一化曲线展开为时间序列
// ==========================================

mod core;


pub use self::core::TemporalProfileEngine;
