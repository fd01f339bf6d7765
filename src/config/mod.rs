// ==========================================
// 区域能源需求分解系统 - 配置层
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 配置项全集
// ==========================================
// 职责: 配置读取接口与 config_kv 表实现
// 红线: 引擎只依赖 trait，不直接依赖存储实现
// ==========================================

pub mod config_manager;
pub mod reader_trait;

pub use config_manager::ConfigManager;
pub use reader_trait::{DisaggConfigReader, StaticConfigReader};

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    /// 守恒校验默认相对容差
    pub const DEFAULT_TOLERANCE: &str = "engine.default_tolerance";
    /// 天气修正采暖阈值温度（摄氏度）
    pub const HEATING_THRESHOLD_C: &str = "temporal.heating_threshold_c";
    /// 天气修正基础负荷占比
    pub const BASE_LOAD_SHARE: &str = "temporal.base_load_share";
}

// ==========================================
// 配置默认值
// ==========================================
pub mod config_defaults {
    pub const DEFAULT_TOLERANCE: f64 = 1e-9;
    pub const HEATING_THRESHOLD_C: f64 = 15.0;
    pub const BASE_LOAD_SHARE: f64 = 0.05;
}
