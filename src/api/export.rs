// ==========================================
// 区域能源需求分解系统 - 结果导出
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 结果表约定
// 红线: 行集合恰为 目标区域 × 目标时间点 的笛卡尔积，无重复键
// 红线: 年度结果的时间列固定写 "annual"
// ==========================================

use crate::domain::result::DisaggregationResult;
use crate::engine::error::{DisaggError, DisaggResult};
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// 年度结果（无时间展开）的时间列占位值
const ANNUAL_TIMESTAMP: &str = "annual";

// ==========================================
// ResultRow - 导出行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub region_code: String,
    pub timestamp: String,
    pub value: f64,
    pub unit: String,
    pub sector: String,
    pub carrier: String,
    pub year: i32,
}

/// 结果扁平化为导出行（保持单元格顺序: 区域, 时间点 升序）
pub fn flatten_result(result: &DisaggregationResult) -> Vec<ResultRow> {
    result
        .cells
        .iter()
        .map(|cell| ResultRow {
            region_code: cell.region_code.clone(),
            timestamp: cell
                .timestamp
                .map(|ts| ts.format("%Y-%m-%dT%H:%M:%S").to_string())
                .unwrap_or_else(|| ANNUAL_TIMESTAMP.to_string()),
            value: cell.value,
            unit: result.source.unit.to_string(),
            sector: result.source.sector.to_string(),
            carrier: result.source.carrier.to_string(),
            year: result.source.scope.year,
        })
        .collect()
}

/// 结果写出为 CSV 文件
pub fn write_result_csv<P: AsRef<Path>>(
    result: &DisaggregationResult,
    path: P,
) -> DisaggResult<()> {
    let rows = flatten_result(result);

    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path.as_ref())
        .map_err(|e| DisaggError::Validation(format!("导出文件创建失败: {}", e)))?;

    for row in &rows {
        writer
            .serialize(row)
            .map_err(|e| DisaggError::Validation(format!("导出行写入失败: {}", e)))?;
    }
    writer
        .flush()
        .map_err(|e| DisaggError::Validation(format!("导出文件刷盘失败: {}", e)))?;

    info!(
        file = %path.as_ref().display(),
        rows = rows.len(),
        "结果导出完成"
    );
    Ok(())
}
