// ==========================================
// 集成测试共享辅助
// ==========================================

#![allow(dead_code)]

use regio_disagg::domain::{
    DemandQuantity, EnergyCarrier, EnergyUnit, RegionLevel, RegionRecord, Scope, Sector,
    TemporalProfile, TemporalResolution, WeightingKey,
};
use regio_disagg::{KeyRegistry, RegionHierarchy};

/// 三层样例层级: DE → {DE1, DE2} → 行政区
pub fn sample_hierarchy() -> RegionHierarchy {
    RegionHierarchy::from_records(vec![
        RegionRecord::new("DE", RegionLevel::Country, None).with_name("Deutschland"),
        RegionRecord::new("DE1", RegionLevel::State, Some("DE")).with_name("Baden-Württemberg"),
        RegionRecord::new("DE2", RegionLevel::State, Some("DE")).with_name("Bayern"),
        RegionRecord::new("DE111", RegionLevel::District, Some("DE1")),
        RegionRecord::new("DE112", RegionLevel::District, Some("DE1")),
        RegionRecord::new("DE211", RegionLevel::District, Some("DE2")),
        RegionRecord::new("DE212", RegionLevel::District, Some("DE2")),
    ])
    .unwrap()
}

/// 联邦州层级人口键（百万人口量级的原始值）
pub fn population_key() -> WeightingKey {
    WeightingKey::new("population", RegionLevel::State, "2023-01")
        .with_weight("DE1", 11.1)
        .with_weight("DE2", 13.1)
}

/// 行政区层级就业键
pub fn employment_key() -> WeightingKey {
    WeightingKey::new("employment", RegionLevel::District, "2023-01")
        .with_weight("DE111", 2.0)
        .with_weight("DE112", 3.0)
        .with_weight("DE211", 4.0)
        .with_weight("DE212", 1.0)
}

/// 均匀日度曲线（平年 365 点）
pub fn uniform_daily_profile(name: &str, year: i32) -> TemporalProfile {
    let n = TemporalResolution::Daily.points_in_year(year);
    TemporalProfile {
        name: name.to_string(),
        sector: Sector::Household,
        carrier: EnergyCarrier::Electricity,
        year,
        resolution: TemporalResolution::Daily,
        version: "v1".to_string(),
        factors: vec![1.0 / n as f64; n],
    }
}

/// 装好人口/就业键与均匀曲线的目录
pub fn sample_registry() -> KeyRegistry {
    let mut registry = KeyRegistry::new();
    registry.register_key(population_key()).unwrap();
    registry.register_key(employment_key()).unwrap();
    registry
        .register_profile(uniform_daily_profile("slp_household_elc", 2019))
        .unwrap();
    registry
}

pub fn demand(value: f64, region: &str, year: i32) -> DemandQuantity {
    DemandQuantity::new(
        value,
        EnergyUnit::GigawattHours,
        Sector::Household,
        EnergyCarrier::Electricity,
        Scope::new(region, year),
    )
    .unwrap()
}
