use super::RegionHierarchy;
use crate::domain::region::RegionRecord;
use crate::domain::types::RegionLevel;
use crate::engine::error::DisaggError;

// ==========================================
// 测试辅助函数
// ==========================================

/// DE → {DE1(BW), DE2(BY)} → DE1 下两个行政区
fn sample_records() -> Vec<RegionRecord> {
    vec![
        RegionRecord::new("DE", RegionLevel::Country, None).with_name("Deutschland"),
        RegionRecord::new("DE1", RegionLevel::State, Some("DE")).with_name("Baden-Württemberg"),
        RegionRecord::new("DE2", RegionLevel::State, Some("DE")).with_name("Bayern"),
        RegionRecord::new("DE111", RegionLevel::District, Some("DE1")).with_name("Stuttgart"),
        RegionRecord::new("DE112", RegionLevel::District, Some("DE1")).with_name("Böblingen"),
    ]
}

// ==========================================
// 构造与校验
// ==========================================

#[test]
fn test_build_valid_hierarchy() {
    let h = RegionHierarchy::from_records(sample_records()).unwrap();
    assert_eq!(h.len(), 5);
    assert_eq!(h.root().code, "DE");
}

#[test]
fn test_duplicate_code_rejected() {
    let mut records = sample_records();
    records.push(RegionRecord::new("DE1", RegionLevel::State, Some("DE")));
    let err = RegionHierarchy::from_records(records).unwrap_err();
    assert!(matches!(err, DisaggError::MalformedHierarchy(_)));
}

#[test]
fn test_missing_parent_rejected() {
    let records = vec![
        RegionRecord::new("DE", RegionLevel::Country, None),
        RegionRecord::new("DE1", RegionLevel::State, Some("FR")),
    ];
    let err = RegionHierarchy::from_records(records).unwrap_err();
    assert!(matches!(err, DisaggError::MalformedHierarchy(_)));
}

#[test]
fn test_level_skip_rejected() {
    // 行政区直接挂在国家下（跳过联邦州）
    let records = vec![
        RegionRecord::new("DE", RegionLevel::Country, None),
        RegionRecord::new("DE111", RegionLevel::District, Some("DE")),
    ];
    let err = RegionHierarchy::from_records(records).unwrap_err();
    assert!(matches!(err, DisaggError::MalformedHierarchy(_)));
}

#[test]
fn test_two_roots_rejected() {
    let records = vec![
        RegionRecord::new("DE", RegionLevel::Country, None),
        RegionRecord::new("FR", RegionLevel::Country, None),
    ];
    let err = RegionHierarchy::from_records(records).unwrap_err();
    assert!(matches!(err, DisaggError::MalformedHierarchy(_)));
}

#[test]
fn test_orphan_non_root_rejected() {
    let records = vec![
        RegionRecord::new("DE", RegionLevel::Country, None),
        RegionRecord::new("DE1", RegionLevel::State, None),
    ];
    let err = RegionHierarchy::from_records(records).unwrap_err();
    assert!(matches!(err, DisaggError::MalformedHierarchy(_)));
}

// ==========================================
// 遍历操作
// ==========================================

#[test]
fn test_resolve_not_found() {
    let h = RegionHierarchy::from_records(sample_records()).unwrap();
    let err = h.resolve("XX").unwrap_err();
    assert!(matches!(err, DisaggError::NotFound { .. }));
}

#[test]
fn test_children_ordered_by_code() {
    let h = RegionHierarchy::from_records(sample_records()).unwrap();
    let children = h.children("DE").unwrap();
    let codes: Vec<&str> = children.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, vec!["DE1", "DE2"]);
}

#[test]
fn test_children_of_leaf_is_empty() {
    let h = RegionHierarchy::from_records(sample_records()).unwrap();
    assert!(h.children("DE111").unwrap().is_empty());
}

#[test]
fn test_descendants_at_level() {
    let h = RegionHierarchy::from_records(sample_records()).unwrap();
    let districts = h.descendants_at_level("DE", RegionLevel::District).unwrap();
    let codes: Vec<&str> = districts.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, vec!["DE111", "DE112"]);
}

#[test]
fn test_descendants_requires_strictly_finer_level() {
    let h = RegionHierarchy::from_records(sample_records()).unwrap();
    // 同层级
    let err = h.descendants_at_level("DE1", RegionLevel::State).unwrap_err();
    assert!(matches!(err, DisaggError::InvalidLevel { .. }));
    // 更粗层级
    let err = h
        .descendants_at_level("DE1", RegionLevel::Country)
        .unwrap_err();
    assert!(matches!(err, DisaggError::InvalidLevel { .. }));
}

#[test]
fn test_ancestor_at_level() {
    let h = RegionHierarchy::from_records(sample_records()).unwrap();
    let state = h.ancestor_at_level("DE112", RegionLevel::State).unwrap();
    assert_eq!(state.code, "DE1");
    let country = h.ancestor_at_level("DE112", RegionLevel::Country).unwrap();
    assert_eq!(country.code, "DE");
}

#[test]
fn test_ancestor_requires_strictly_coarser_level() {
    let h = RegionHierarchy::from_records(sample_records()).unwrap();
    let err = h
        .ancestor_at_level("DE112", RegionLevel::District)
        .unwrap_err();
    assert!(matches!(err, DisaggError::InvalidLevel { .. }));
}
