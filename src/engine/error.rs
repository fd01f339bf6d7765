// ==========================================
// 区域能源需求分解系统 - 核心错误体系
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 错误分级
// 工具: thiserror 派生宏
// ==========================================
// 红线: 核心内部不吞错、不记日志后继续、不自动重试
// 红线: ConservationViolation 永远致命，绝不静默修正
// ==========================================

use crate::domain::result::CoverageReport;
use crate::domain::types::RegionLevel;
use crate::provider::error::ProviderError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 核心分解错误类型
#[derive(Error, Debug)]
pub enum DisaggError {
    // ===== 用户输入错误 =====
    #[error("未找到: {entity} (id={id})")]
    NotFound { entity: String, id: String },

    #[error("键组合非法: {0}")]
    InvalidCombination(String),

    #[error("输入校验失败: {0}")]
    Validation(String),

    // ===== 结构完整性错误（加载期致命）=====
    #[error("层级结构非法: {0}")]
    MalformedHierarchy(String),

    #[error("层级非法: 区域 {region} 层级为 {region_level}, 请求层级 {requested}")]
    InvalidLevel {
        region: String,
        region_level: RegionLevel,
        requested: RegionLevel,
    },

    // ===== 覆盖错误 =====
    #[error("权重键 {key} 对区域 {region} 无覆盖: {message}")]
    NoCoverage {
        key: String,
        region: String,
        message: String,
    },

    #[error("覆盖不完整: {}", .report.summary())]
    IncompleteCoverage { report: CoverageReport },

    // ===== 时间网格错误 =====
    #[error("分辨率不匹配: 期望 {expected} 点, 实际 {actual} 点 ({message})")]
    ResolutionMismatch {
        expected: usize,
        actual: usize,
        message: String,
    },

    // ===== 内部不变式错误（永远致命）=====
    #[error(
        "守恒校验失败 ({context}): 期望 {expected:.12}, 实际 {actual:.12}, 容差 {tolerance:e}"
    )]
    ConservationViolation {
        context: String,
        expected: f64,
        actual: f64,
        tolerance: f64,
    },

    // ===== 协作方错误（透传）=====
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Store(#[from] RepositoryError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DisaggError {
    /// NotFound 便捷构造
    pub fn not_found(entity: &str, id: &str) -> Self {
        DisaggError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }
}

/// Result 类型别名
pub type DisaggResult<T> = Result<T, DisaggError>;

/// 相对误差守恒校验
///
/// # 参数
/// - context: 校验场景描述（出错时进入错误信息）
/// - expected: 守恒基准值（源聚合量）
/// - actual: 校验对象（片段之和 + 未下分量）
/// - tolerance: 相对容差
///
/// # 规则
/// - 基准为 0 时退化为绝对误差校验
pub fn check_conservation(
    context: &str,
    expected: f64,
    actual: f64,
    tolerance: f64,
) -> DisaggResult<()> {
    let denom = expected.abs().max(1.0e-300);
    let violated = if expected == 0.0 {
        actual.abs() > tolerance
    } else {
        ((actual - expected) / denom).abs() > tolerance
    };

    if violated {
        return Err(DisaggError::ConservationViolation {
            context: context.to_string(),
            expected,
            actual,
            tolerance,
        });
    }
    Ok(())
}
