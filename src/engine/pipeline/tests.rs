use super::DisaggregationPipeline;
use crate::config::reader_trait::StaticConfigReader;
use crate::domain::key::WeightingKey;
use crate::domain::profile::TemporalProfile;
use crate::domain::quantity::{DemandQuantity, Scope};
use crate::domain::region::RegionRecord;
use crate::domain::request::DisaggregationRequest;
use crate::domain::types::{
    EnergyCarrier, EnergyUnit, RegionLevel, Sector, TemporalResolution,
};
use crate::engine::error::DisaggError;
use crate::hierarchy::RegionHierarchy;
use crate::registry::KeyRegistry;
use std::sync::Arc;

// ==========================================
// 测试辅助函数
// ==========================================

fn sample_hierarchy() -> Arc<RegionHierarchy> {
    Arc::new(
        RegionHierarchy::from_records(vec![
            RegionRecord::new("DE", RegionLevel::Country, None),
            RegionRecord::new("DE1", RegionLevel::State, Some("DE")),
            RegionRecord::new("DE2", RegionLevel::State, Some("DE")),
        ])
        .unwrap(),
    )
}

fn sample_registry() -> KeyRegistry {
    let mut registry = KeyRegistry::new();
    registry
        .register_key(
            WeightingKey::new("population", RegionLevel::State, "2023-01")
                .with_weight("DE1", 11.1)
                .with_weight("DE2", 13.1),
        )
        .unwrap();

    let n = TemporalResolution::Daily.points_in_year(2019);
    registry
        .register_profile(TemporalProfile {
            name: "slp_household_elc".to_string(),
            sector: Sector::Household,
            carrier: EnergyCarrier::Electricity,
            year: 2019,
            resolution: TemporalResolution::Daily,
            version: "v1".to_string(),
            factors: vec![1.0 / n as f64; n],
        })
        .unwrap();
    registry
}

fn pipeline(registry: KeyRegistry) -> DisaggregationPipeline<StaticConfigReader> {
    DisaggregationPipeline::new(
        sample_hierarchy(),
        Arc::new(registry),
        Arc::new(StaticConfigReader::default()),
        None,
    )
}

fn demand(value: f64) -> DemandQuantity {
    DemandQuantity::new(
        value,
        EnergyUnit::GigawattHours,
        Sector::Household,
        EnergyCarrier::Electricity,
        Scope::new("DE", 2019),
    )
    .unwrap()
}

// ==========================================
// 单维分解
// ==========================================

#[tokio::test]
async fn test_spatial_only_run() {
    let p = pipeline(sample_registry());
    let request = DisaggregationRequest::spatial(
        demand(100.0),
        RegionLevel::State,
        vec![("population".to_string(), 1.0)],
    );

    let result = p.run(&request).await.unwrap();
    assert_eq!(result.cells.len(), 2);
    assert!(result.cells.iter().all(|c| c.timestamp.is_none()));
    assert!((result.total() - 100.0).abs() < 1e-9);
    assert!(result.coverage.is_complete());
}

#[tokio::test]
async fn test_temporal_only_run() {
    let p = pipeline(sample_registry());
    let mut d = demand(365.0);
    d.scope = Scope::new("DE1", 2019);
    let request =
        DisaggregationRequest::temporal(d, TemporalResolution::Daily, "slp_household_elc");

    let result = p.run(&request).await.unwrap();
    assert_eq!(result.cells.len(), 365);
    assert!(result.cells.iter().all(|c| c.timestamp.is_some()));
    assert!((result.total() - 365.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_combined_run_conserves() {
    let p = pipeline(sample_registry());
    let mut request = DisaggregationRequest::spatial(
        demand(1000.0),
        RegionLevel::State,
        vec![("population".to_string(), 1.0)],
    );
    request.target_resolution = TemporalResolution::Daily;
    request.profile_name = Some("slp_household_elc".to_string());

    let result = p.run(&request).await.unwrap();
    assert_eq!(result.cells.len(), 2 * 365);
    assert!((result.total() - 1000.0).abs() < 1e-6);

    // 单元格按 (区域, 时间点) 升序
    let first = &result.cells[0];
    assert_eq!(first.region_code, "DE1");
}

#[tokio::test]
async fn test_request_without_any_target_rejected() {
    let p = pipeline(sample_registry());
    let mut request = DisaggregationRequest::spatial(
        demand(100.0),
        RegionLevel::State,
        vec![("population".to_string(), 1.0)],
    );
    request.target_level = None;

    let err = p.run(&request).await.unwrap_err();
    assert!(matches!(err, DisaggError::Validation(_)));
}

#[tokio::test]
async fn test_temporal_requires_profile_name() {
    let p = pipeline(sample_registry());
    let mut request = DisaggregationRequest::spatial(
        demand(100.0),
        RegionLevel::State,
        vec![("population".to_string(), 1.0)],
    );
    request.target_resolution = TemporalResolution::Daily;

    let err = p.run(&request).await.unwrap_err();
    assert!(matches!(err, DisaggError::Validation(_)));
}

#[tokio::test]
async fn test_weather_requires_temperature_name() {
    let p = pipeline(sample_registry());
    let mut request = DisaggregationRequest::temporal(
        demand(100.0),
        TemporalResolution::Daily,
        "slp_household_elc",
    );
    request.weather_adjusted = true;

    let err = p.run(&request).await.unwrap_err();
    assert!(matches!(err, DisaggError::Validation(_)));
}

// ==========================================
// 覆盖缺口
// ==========================================

#[tokio::test]
async fn test_incomplete_coverage_aborts_by_default() {
    let mut registry = sample_registry();
    registry
        .register_key(
            WeightingKey::new("partial", RegionLevel::State, "v1")
                .with_weight("DE1", 5.0)
                .with_unknown("DE2"),
        )
        .unwrap();
    let p = pipeline(registry);

    let request = DisaggregationRequest::spatial(
        demand(100.0),
        RegionLevel::State,
        vec![("partial".to_string(), 1.0)],
    );

    let err = p.run(&request).await.unwrap_err();
    assert!(matches!(err, DisaggError::IncompleteCoverage { .. }));
}

#[tokio::test]
async fn test_incomplete_coverage_allowed_when_requested() {
    let mut registry = sample_registry();
    registry
        .register_key(
            WeightingKey::new("partial", RegionLevel::State, "v1")
                .with_weight("DE1", 5.0)
                .with_unknown("DE2"),
        )
        .unwrap();
    let p = pipeline(registry);

    let mut request = DisaggregationRequest::spatial(
        demand(100.0),
        RegionLevel::State,
        vec![("partial".to_string(), 1.0)],
    );
    request.allow_incomplete = true;

    let result = p.run(&request).await.unwrap();
    assert!(!result.coverage.is_complete());
    assert_eq!(result.cells.len(), 1);
    assert!((result.total() - 100.0).abs() < 1e-9);
}

// ==========================================
// 缓存
// ==========================================

#[tokio::test]
async fn test_cache_hit_returns_stored_result() {
    use crate::repository::result_store::ResultStore;

    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(
        ResultStore::new(dir.path().join("results.db").to_str().unwrap()).unwrap(),
    );
    let p = DisaggregationPipeline::new(
        sample_hierarchy(),
        Arc::new(sample_registry()),
        Arc::new(StaticConfigReader::default()),
        Some(Arc::clone(&store)),
    );

    let request = DisaggregationRequest::spatial(
        demand(100.0),
        RegionLevel::State,
        vec![("population".to_string(), 1.0)],
    );

    let first = p.run(&request).await.unwrap();
    let second = p.run(&request).await.unwrap();
    // 第二次命中缓存: 返回同一结果而非重算
    assert_eq!(first.result_id, second.result_id);
    assert_eq!(store.count().unwrap(), 1);
}

#[tokio::test]
async fn test_version_bump_invalidates_cache() {
    use crate::repository::result_store::ResultStore;

    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(
        ResultStore::new(dir.path().join("results.db").to_str().unwrap()).unwrap(),
    );

    let request = DisaggregationRequest::spatial(
        demand(100.0),
        RegionLevel::State,
        vec![("population".to_string(), 1.0)],
    );

    let p1 = DisaggregationPipeline::new(
        sample_hierarchy(),
        Arc::new(sample_registry()),
        Arc::new(StaticConfigReader::default()),
        Some(Arc::clone(&store)),
    );
    let first = p1.run(&request).await.unwrap();

    // 同名键换版本: 指纹变化，旧缓存不可见
    let mut registry = sample_registry();
    registry
        .register_key(
            WeightingKey::new("population", RegionLevel::State, "2024-01")
                .with_weight("DE1", 12.0)
                .with_weight("DE2", 12.0),
        )
        .unwrap();
    let p2 = DisaggregationPipeline::new(
        sample_hierarchy(),
        Arc::new(registry),
        Arc::new(StaticConfigReader::default()),
        Some(Arc::clone(&store)),
    );
    let second = p2.run(&request).await.unwrap();

    assert_ne!(first.fingerprint, second.fingerprint);
    assert_ne!(first.result_id, second.result_id);
    assert_eq!(store.count().unwrap(), 2);
}
