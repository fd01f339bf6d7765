// ==========================================
// 区域能源需求分解系统 - 分解请求
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 配置项全集
// 注: 请求只是载体，键组合的合法性在 KeyCombination 构造时一次性校验
// ==========================================

use crate::domain::quantity::DemandQuantity;
use crate::domain::types::{RegionLevel, TemporalResolution};
use serde::{Deserialize, Serialize};

// ==========================================
// DisaggregationRequest - 分解请求
// ==========================================
// 空间与时间维度都可选；两者都给出时执行时空联合分解
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisaggregationRequest {
    /// 源聚合需求量
    pub demand: DemandQuantity,
    /// 目标空间层级（None = 不做空间分解）
    pub target_level: Option<RegionLevel>,
    /// 目标时间分辨率（Annual = 不做时间分解）
    pub target_resolution: TemporalResolution,
    /// 键组合: 有序 (键名, 相对权重) 列表，相对权重之和必须为 1
    pub key_combination: Vec<(String, f64)>,
    /// 负荷曲线名（时间分解时必填）
    pub profile_name: Option<String>,
    /// 是否做天气修正
    pub weather_adjusted: bool,
    /// 温度序列名（weather_adjusted = true 时必填）
    #[serde(default)]
    pub temperature_name: Option<String>,
    /// 守恒校验容差覆写（None = 用配置默认值）
    pub tolerance_override: Option<f64>,
    /// 覆盖缺口非空时是否仍然继续（默认 false: 报 IncompleteCoverage 中止）
    #[serde(default)]
    pub allow_incomplete: bool,
}

impl DisaggregationRequest {
    /// 纯空间分解请求
    pub fn spatial(
        demand: DemandQuantity,
        target_level: RegionLevel,
        key_combination: Vec<(String, f64)>,
    ) -> Self {
        Self {
            demand,
            target_level: Some(target_level),
            target_resolution: TemporalResolution::Annual,
            key_combination,
            profile_name: None,
            weather_adjusted: false,
            temperature_name: None,
            tolerance_override: None,
            allow_incomplete: false,
        }
    }

    /// 纯时间分解请求
    pub fn temporal(
        demand: DemandQuantity,
        target_resolution: TemporalResolution,
        profile_name: &str,
    ) -> Self {
        Self {
            demand,
            target_level: None,
            target_resolution,
            key_combination: Vec::new(),
            profile_name: Some(profile_name.to_string()),
            weather_adjusted: false,
            temperature_name: None,
            tolerance_override: None,
            allow_incomplete: false,
        }
    }

    /// 是否请求了空间分解
    pub fn wants_spatial(&self) -> bool {
        self.target_level.is_some()
    }

    /// 是否请求了时间分解
    pub fn wants_temporal(&self) -> bool {
        self.target_resolution != TemporalResolution::Annual
    }
}
