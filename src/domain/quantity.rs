// ==========================================
// 区域能源需求分解系统 - 需求量值对象
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 数据模型
// 红线: DemandQuantity 一经产生不可变更
// ==========================================

use crate::domain::types::{EnergyCarrier, EnergyUnit, Sector};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Scope - 需求量的归属范围
// ==========================================
// (区域编码, 年份) 二元组，标识一个需求量指向什么
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    /// 源区域编码
    pub region_code: String,
    /// 参考年份
    pub year: i32,
}

impl Scope {
    pub fn new(region_code: &str, year: i32) -> Self {
        Self {
            region_code: region_code.to_string(),
            year,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.region_code, self.year)
    }
}

// ==========================================
// DemandQuantity - 聚合需求量
// ==========================================
// 分解引擎的输入（聚合值）或输出（分解片段）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandQuantity {
    /// 需求量数值
    pub value: f64,
    /// 能量单位
    pub unit: EnergyUnit,
    /// 需求部门
    pub sector: Sector,
    /// 能源载体
    pub carrier: EnergyCarrier,
    /// 归属范围
    pub scope: Scope,
}

impl DemandQuantity {
    /// 构造需求量并做边界校验
    ///
    /// # 校验规则
    /// 1. 数值必须有限（拒绝 NaN / 无穷大）
    /// 2. 需求量不可为负
    pub fn new(
        value: f64,
        unit: EnergyUnit,
        sector: Sector,
        carrier: EnergyCarrier,
        scope: Scope,
    ) -> Result<Self, String> {
        if !value.is_finite() {
            return Err(format!("需求量数值非有限值: {}", value));
        }
        if value < 0.0 {
            return Err(format!("需求量不可为负: {}", value));
        }
        Ok(Self {
            value,
            unit,
            sector,
            carrier,
            scope,
        })
    }

    /// 派生一个同单位/部门/载体、但换了范围与数值的子需求量
    ///
    /// 分解过程中片段继承源需求量的全部元数据
    pub fn derive(&self, value: f64, scope: Scope) -> Self {
        Self {
            value,
            unit: self.unit,
            sector: self.sector,
            carrier: self.carrier,
            scope,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> Scope {
        Scope::new("DE", 2019)
    }

    #[test]
    fn test_quantity_valid() {
        let q = DemandQuantity::new(
            100.0,
            EnergyUnit::GigawattHours,
            Sector::Household,
            EnergyCarrier::Electricity,
            scope(),
        )
        .unwrap();
        assert_eq!(q.value, 100.0);
        assert_eq!(q.scope.region_code, "DE");
    }

    #[test]
    fn test_quantity_rejects_nan_and_negative() {
        assert!(DemandQuantity::new(
            f64::NAN,
            EnergyUnit::GigawattHours,
            Sector::Household,
            EnergyCarrier::Electricity,
            scope(),
        )
        .is_err());
        assert!(DemandQuantity::new(
            -1.0,
            EnergyUnit::GigawattHours,
            Sector::Household,
            EnergyCarrier::Electricity,
            scope(),
        )
        .is_err());
    }

    #[test]
    fn test_derive_keeps_metadata() {
        let q = DemandQuantity::new(
            100.0,
            EnergyUnit::MegawattHours,
            Sector::Industry,
            EnergyCarrier::Gas,
            scope(),
        )
        .unwrap();
        let d = q.derive(45.0, Scope::new("DE1", 2019));
        assert_eq!(d.unit, EnergyUnit::MegawattHours);
        assert_eq!(d.sector, Sector::Industry);
        assert_eq!(d.carrier, EnergyCarrier::Gas);
        assert_eq!(d.value, 45.0);
        assert_eq!(d.scope.region_code, "DE1");
    }
}
