// ==========================================
// 区域能源需求分解系统 - 引擎层
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 引擎总览
// ==========================================
// 职责: 空间分配 / 时间展开 / 时空联合管线
// 红线: 守恒校验失败永远致命，绝不静默修正
// ==========================================

pub mod allocation;
pub mod error;
pub mod pipeline;
pub mod temporal;
pub mod timegrid;

pub use allocation::{AllocationEngine, SpatialAllocation};
pub use error::{check_conservation, DisaggError, DisaggResult};
pub use pipeline::DisaggregationPipeline;
pub use temporal::TemporalProfileEngine;
pub use timegrid::TimeGrid;
