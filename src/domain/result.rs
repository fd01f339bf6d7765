// ==========================================
// 区域能源需求分解系统 - 分解结果与覆盖报告
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 结果表约定
// 红线: 结果一经产生不可变更，只能被新计算整体取代
// 红线: 单元格集合必须恰为 目标区域 × 目标时间点 的笛卡尔积，无重复键
// ==========================================

use crate::domain::quantity::DemandQuantity;
use crate::domain::types::RegionLevel;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ==========================================
// CoverageGap - 覆盖缺口
// ==========================================
// 某次分解中未能被权重数据支撑的区域，以及原因
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageGap {
    /// 缺口区域编码
    pub region_code: String,
    /// 缺口区域层级
    pub level: RegionLevel,
    /// 缺口原因
    pub reason: CoverageGapReason,
    /// 因该缺口未能继续下分的需求量（未知权重子区域为 0，分母已排除）
    pub value_unallocated: f64,
}

/// 覆盖缺口原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoverageGapReason {
    /// 该区域在目标层级方向上没有子区域
    NoChildren,
    /// 该子区域在组合键下权重未知，被排除在分配之外
    UnknownWeight,
}

impl fmt::Display for CoverageGapReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverageGapReason::NoChildren => write!(f, "NO_CHILDREN"),
            CoverageGapReason::UnknownWeight => write!(f, "UNKNOWN_WEIGHT"),
        }
    }
}

// ==========================================
// CoverageReport - 覆盖报告
// ==========================================
// 缺口描述随结果一并返回，由调用方决定继续或中止
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub gaps: Vec<CoverageGap>,
    /// 所有缺口合计未下分的需求量（参与守恒校验）
    pub unallocated: f64,
}

impl CoverageReport {
    pub fn is_complete(&self) -> bool {
        self.gaps.is_empty()
    }

    pub fn add_gap(&mut self, gap: CoverageGap) {
        self.unallocated += gap.value_unallocated;
        self.gaps.push(gap);
    }

    /// 缺口摘要（日志与错误信息用）
    pub fn summary(&self) -> String {
        format!(
            "{} 个缺口, 未下分需求量 {:.6}",
            self.gaps.len(),
            self.unallocated
        )
    }
}

// ==========================================
// ResultCell - 结果单元格
// ==========================================
// (区域, 时间点) -> 需求量片段；timestamp = None 表示 "annual"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultCell {
    pub region_code: String,
    pub timestamp: Option<NaiveDateTime>,
    pub value: f64,
}

// ==========================================
// DisaggregationResult - 分解结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisaggregationResult {
    /// 结果标识
    pub result_id: Uuid,
    /// 请求指纹（含键/曲线版本标签）
    pub fingerprint: String,
    /// 源聚合需求量（守恒校验基准，单位/部门/载体元数据随之而来）
    pub source: DemandQuantity,
    /// 结果单元格（按 区域编码, 时间点 升序，无重复键）
    pub cells: Vec<ResultCell>,
    /// 覆盖报告
    pub coverage: CoverageReport,
    /// 计算时间
    pub created_at: DateTime<Utc>,
}

impl DisaggregationResult {
    /// 全部单元格数值之和
    pub fn total(&self) -> f64 {
        self.cells.iter().map(|c| c.value).sum()
    }

    /// 结果中出现的区域编码（去重，保持排序）
    pub fn region_codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.cells.iter().map(|c| c.region_code.clone()).collect();
        codes.dedup();
        codes
    }
}
