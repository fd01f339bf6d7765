// ==========================================
// 区域能源需求分解系统 - 核心库
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 系统宪法
// 技术栈: Rust + SQLite
// 系统定位: 区域/时间维度的能源需求分解引擎
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 区域层级树
pub mod hierarchy;

// 键目录 - 权重键 / 曲线 / 温度序列
pub mod registry;

// 引擎层 - 空间分配 / 时间展开 / 联合管线
pub mod engine;

// 数据提供层 - 外部统计表
pub mod provider;

// 结果存储层 - 指纹与缓存
pub mod repository;

// 配置层 - 系统配置
pub mod config;

// 对外接口层 - 结果导出
pub mod api;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    is_leap_year, CoverageGap, CoverageGapReason, CoverageReport, DemandQuantity,
    DisaggregationRequest, DisaggregationResult, EnergyCarrier, EnergyUnit, Region, RegionLevel,
    RegionRecord, ResultCell, Scope, Sector, TemperatureSeries, TemporalProfile,
    TemporalResolution, WeightingKey,
};

// 层级与目录
pub use hierarchy::RegionHierarchy;
pub use registry::{KeyCombination, KeyRegistry};

// 引擎
pub use engine::{
    AllocationEngine, DisaggError, DisaggResult, DisaggregationPipeline, SpatialAllocation,
    TemporalProfileEngine, TimeGrid,
};

// 数据提供与存储
pub use provider::{DataProvider, DatasetId, FileDataProvider, SnapshotLoader, TableRow, TableScope};
pub use repository::ResultStore;

// 配置
pub use config::{ConfigManager, DisaggConfigReader, StaticConfigReader};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "区域能源需求分解系统";

// ==========================================
// 预编译检查
// ==========================================

// 确保编译时所有模块可见
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
