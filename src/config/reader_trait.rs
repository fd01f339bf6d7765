// ==========================================
// 区域能源需求分解系统 - 配置读取 Trait
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 配置项全集
// 职责: 定义引擎所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

// ==========================================
// DisaggConfigReader Trait
// ==========================================
// 用途: 分解引擎所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）、StaticConfigReader（测试用）
#[async_trait]
pub trait DisaggConfigReader: Send + Sync {
    /// 获取守恒校验默认相对容差
    ///
    /// # 默认值
    /// - 1e-9
    async fn get_default_tolerance(&self) -> Result<f64, Box<dyn Error>>;

    /// 获取天气修正采暖阈值温度（摄氏度）
    ///
    /// # 默认值
    /// - 15.0
    ///
    /// # 用途
    /// - 温度低于阈值的时间点采暖需求上调（度日数法）
    async fn get_heating_threshold_c(&self) -> Result<f64, Box<dyn Error>>;

    /// 获取天气修正基础负荷占比
    ///
    /// # 默认值
    /// - 0.05
    ///
    /// # 用途
    /// - 与温度无关的基础负荷份额，保证暖时段因子不归零
    async fn get_base_load_share(&self) -> Result<f64, Box<dyn Error>>;
}

// ==========================================
// StaticConfigReader - 内存固定值实现
// ==========================================
// 用途: 测试与无数据库场景；全部字段公开，按需覆写
#[derive(Debug, Clone)]
pub struct StaticConfigReader {
    pub default_tolerance: f64,
    pub heating_threshold_c: f64,
    pub base_load_share: f64,
}

impl Default for StaticConfigReader {
    fn default() -> Self {
        Self {
            default_tolerance: crate::config::config_defaults::DEFAULT_TOLERANCE,
            heating_threshold_c: crate::config::config_defaults::HEATING_THRESHOLD_C,
            base_load_share: crate::config::config_defaults::BASE_LOAD_SHARE,
        }
    }
}

#[async_trait]
impl DisaggConfigReader for StaticConfigReader {
    async fn get_default_tolerance(&self) -> Result<f64, Box<dyn Error>> {
        Ok(self.default_tolerance)
    }

    async fn get_heating_threshold_c(&self) -> Result<f64, Box<dyn Error>> {
        Ok(self.heating_threshold_c)
    }

    async fn get_base_load_share(&self) -> Result<f64, Box<dyn Error>> {
        Ok(self.base_load_share)
    }
}
