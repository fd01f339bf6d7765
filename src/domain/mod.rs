// ==========================================
// 区域能源需求分解系统 - 领域模型层
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 数据模型
// ==========================================
// 职责: 定义领域实体、值对象与类型
// 红线: 不含数据访问逻辑，不含引擎逻辑
// ==========================================

pub mod key;
pub mod profile;
pub mod quantity;
pub mod region;
pub mod request;
pub mod result;
pub mod types;

// 重导出核心类型
pub use key::WeightingKey;
pub use profile::{TemperatureSeries, TemporalProfile, PROFILE_NORM_TOLERANCE};
pub use quantity::{DemandQuantity, Scope};
pub use region::{Region, RegionRecord};
pub use request::DisaggregationRequest;
pub use result::{
    CoverageGap, CoverageGapReason, CoverageReport, DisaggregationResult, ResultCell,
};
pub use types::{
    is_leap_year, EnergyCarrier, EnergyUnit, RegionLevel, Sector, TemporalResolution,
};
