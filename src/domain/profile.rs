// ==========================================
// 区域能源需求分解系统 - 时间负荷曲线
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 键目录
// 红线: 曲线因子之和必须等于归一化目标 1.0（校验，而非假设）
// ==========================================

use crate::domain::types::{EnergyCarrier, Sector, TemporalResolution};
use serde::{Deserialize, Serialize};

/// 曲线归一化校验容差
pub const PROFILE_NORM_TOLERANCE: f64 = 1e-9;

// ==========================================
// TemporalProfile - 标准负荷曲线
// ==========================================
// 覆盖恰好一个参考年，固定分辨率（小时分辨率下 8760/8784 点）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalProfile {
    /// 曲线名（注册目录内唯一，如 "slp_household_elc"）
    pub name: String,
    /// 目标部门
    pub sector: Sector,
    /// 目标载体
    pub carrier: EnergyCarrier,
    /// 参考年份
    pub year: i32,
    /// 时间分辨率
    pub resolution: TemporalResolution,
    /// 数据版本标签
    pub version: String,
    /// 归一化因子序列（与参考年网格一一对应）
    pub factors: Vec<f64>,
}

impl TemporalProfile {
    /// 注册前校验
    ///
    /// # 校验规则
    /// 1. 因子数必须与 (year, resolution) 网格点数一致（闰年感知）
    /// 2. 因子必须有限且非负
    /// 3. 因子之和必须等于 1.0（容差 1e-9）
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("曲线名称不能为空".to_string());
        }

        let expected = self.resolution.points_in_year(self.year);
        if self.factors.len() != expected {
            return Err(format!(
                "曲线 {} 因子数 {} 与 {} 年 {} 网格点数 {} 不一致",
                self.name,
                self.factors.len(),
                self.year,
                self.resolution,
                expected
            ));
        }

        let mut sum = 0.0;
        for (i, f) in self.factors.iter().enumerate() {
            if !f.is_finite() {
                return Err(format!("曲线 {} 第 {} 个因子非有限值", self.name, i));
            }
            if *f < 0.0 {
                return Err(format!("曲线 {} 第 {} 个因子为负: {}", self.name, i, f));
            }
            sum += f;
        }

        if (sum - 1.0).abs() > PROFILE_NORM_TOLERANCE {
            return Err(format!(
                "曲线 {} 因子之和 {:.12} 偏离归一化目标 1.0",
                self.name, sum
            ));
        }

        Ok(())
    }
}

// ==========================================
// TemperatureSeries - 温度时间序列
// ==========================================
// 天气修正输入：与曲线同一参考年、同一分辨率
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureSeries {
    /// 序列名（如 "temperature_de"）
    pub name: String,
    /// 参考年份
    pub year: i32,
    /// 时间分辨率
    pub resolution: TemporalResolution,
    /// 数据版本标签
    pub version: String,
    /// 温度值序列（摄氏度）
    pub values_c: Vec<f64>,
}

impl TemperatureSeries {
    /// 注册前校验：长度与网格一致、数值有限
    pub fn validate(&self) -> Result<(), String> {
        let expected = self.resolution.points_in_year(self.year);
        if self.values_c.len() != expected {
            return Err(format!(
                "温度序列 {} 点数 {} 与 {} 年 {} 网格点数 {} 不一致",
                self.name,
                self.values_c.len(),
                self.year,
                self.resolution,
                expected
            ));
        }
        if self.values_c.iter().any(|v| !v.is_finite()) {
            return Err(format!("温度序列 {} 含非有限值", self.name));
        }
        Ok(())
    }
}
