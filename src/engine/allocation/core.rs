// ==========================================
// 区域能源需求分解系统 - 空间分配核心
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 空间分配
// ==========================================

use crate::domain::quantity::{DemandQuantity, Scope};
use crate::domain::result::{CoverageGap, CoverageGapReason, CoverageReport};
use crate::domain::types::RegionLevel;
use crate::engine::error::{check_conservation, DisaggError, DisaggResult};
use crate::hierarchy::RegionHierarchy;
use crate::registry::{KeyCombination, KeyRegistry};
use tracing::{debug, info, warn};

// ==========================================
// SpatialAllocation - 空间分配输出
// ==========================================
#[derive(Debug, Clone)]
pub struct SpatialAllocation {
    /// 目标层级上的需求量片段（按区域编码升序）
    pub fragments: Vec<DemandQuantity>,
    /// 覆盖报告（缺口与未下分量）
    pub coverage: CoverageReport,
}

impl SpatialAllocation {
    /// 片段数值之和（不含未下分量）
    pub fn allocated_total(&self) -> f64 {
        self.fragments.iter().map(|f| f.value).sum()
    }
}

// ==========================================
// AllocationEngine - 空间分配引擎
// ==========================================
// 无内部状态；层级树与键目录按次调用传入
#[derive(Debug, Default)]
pub struct AllocationEngine;

impl AllocationEngine {
    pub fn new() -> Self {
        Self
    }

    /// 把聚合需求量分配到目标层级
    ///
    /// # 算法
    /// 1. 源区域层级 == 目标层级: 恒等分配（单片段，值不变）
    /// 2. 源区域层级细于目标层级: InvalidLevel（分配只向下，不聚合）
    /// 3. 否则显式工作栈逐层下探:
    ///    - 每个父区域在其直接子区域上取组合归一化权重
    ///    - 子片段 = 父值 * 归一化权重（浮点和恰为父值，容差内）
    ///    - 子层级 == 目标层级时产出片段，否则继续下探
    ///
    /// # 覆盖缺口
    /// - 中途区域无法继续下分（无子区域 / 键无覆盖）: 记缺口，未下分量入账
    /// - 权重未知被排除的子区域: 记缺口，未下分量为 0（分母已排除）
    /// - 源区域自身无覆盖: 直接报 NoCoverage（无任何片段可产出）
    ///
    /// # 守恒
    /// - 返回前校验 片段之和 + 未下分量 == 源值（相对容差 tolerance）
    pub fn allocate(
        &self,
        demand: &DemandQuantity,
        target_level: RegionLevel,
        combination: &KeyCombination,
        registry: &KeyRegistry,
        hierarchy: &RegionHierarchy,
        tolerance: f64,
    ) -> DisaggResult<SpatialAllocation> {
        let source = hierarchy.resolve(&demand.scope.region_code)?;

        if source.level == target_level {
            debug!(region = %source.code, "源层级即目标层级，恒等分配");
            return Ok(SpatialAllocation {
                fragments: vec![demand.clone()],
                coverage: CoverageReport::default(),
            });
        }

        if source.level > target_level {
            return Err(DisaggError::InvalidLevel {
                region: source.code.clone(),
                region_level: source.level,
                requested: target_level,
            });
        }

        let mut fragments: Vec<DemandQuantity> = Vec::new();
        let mut coverage = CoverageReport::default();

        // 显式工作栈: (区域编码, 区域层级, 待下分值)
        let mut stack: Vec<(String, RegionLevel, f64)> =
            vec![(source.code.clone(), source.level, demand.value)];

        while let Some((code, level, value)) = stack.pop() {
            let weights = match combination.weights_for(&code, registry, hierarchy) {
                Ok(w) => w,
                Err(DisaggError::NoCoverage { message, .. }) => {
                    // 源区域自身无覆盖时整个请求失败；中途缺口记账后继续
                    if code == demand.scope.region_code {
                        return Err(DisaggError::NoCoverage {
                            key: combination
                                .key_names()
                                .collect::<Vec<_>>()
                                .join("+"),
                            region: code,
                            message,
                        });
                    }
                    warn!(region = %code, value, %message, "区域无法继续下分，记入覆盖缺口");
                    let reason = if hierarchy.children(&code)?.is_empty() {
                        CoverageGapReason::NoChildren
                    } else {
                        CoverageGapReason::UnknownWeight
                    };
                    coverage.add_gap(CoverageGap {
                        region_code: code,
                        level,
                        reason,
                        value_unallocated: value,
                    });
                    continue;
                }
                Err(e) => return Err(e),
            };

            let children = hierarchy.children(&code)?;
            let child_level = match children.first() {
                Some(child) => child.level,
                None => continue,
            };

            // 权重未知被排除的子区域: 缺口记账（未下分量为 0，分母已排除）
            for child in &children {
                if !weights.contains_key(&child.code) {
                    coverage.add_gap(CoverageGap {
                        region_code: child.code.clone(),
                        level: child.level,
                        reason: CoverageGapReason::UnknownWeight,
                        value_unallocated: 0.0,
                    });
                }
            }

            for (child_code, weight) in &weights {
                let child_value = value * weight;
                if child_level == target_level {
                    fragments.push(demand.derive(
                        child_value,
                        Scope::new(child_code, demand.scope.year),
                    ));
                } else {
                    stack.push((child_code.clone(), child_level, child_value));
                }
            }
        }

        fragments.sort_by(|a, b| a.scope.region_code.cmp(&b.scope.region_code));

        let allocated: f64 = fragments.iter().map(|f| f.value).sum();
        check_conservation(
            &format!("空间分配 {}", demand.scope),
            demand.value,
            allocated + coverage.unallocated,
            tolerance,
        )?;

        info!(
            source = %demand.scope,
            target_level = %target_level,
            fragments = fragments.len(),
            gaps = coverage.gaps.len(),
            unallocated = coverage.unallocated,
            "空间分配完成"
        );

        Ok(SpatialAllocation {
            fragments,
            coverage,
        })
    }
}
