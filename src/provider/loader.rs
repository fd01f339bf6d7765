// ==========================================
// 区域能源需求分解系统 - 快照装载器
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 外部数据接口
// ==========================================
// 职责: 把原始统计表装载为层级树 / 权重键 / 曲线 / 温度序列
// 红线: 快照每进程装载一次，之后只读
// 红线: 原始曲线在注册前归一化；权重键保持原始值不归一化
// ==========================================

use crate::domain::key::WeightingKey;
use crate::domain::profile::{TemperatureSeries, TemporalProfile};
use crate::domain::region::RegionRecord;
use crate::domain::types::{EnergyCarrier, RegionLevel, Sector, TemporalResolution};
use crate::engine::error::{DisaggError, DisaggResult};
use crate::hierarchy::RegionHierarchy;
use crate::provider::table::{DataProvider, DatasetId, TableScope};
use csv::ReaderBuilder;
use std::path::Path;
use tracing::info;

// ==========================================
// SnapshotLoader - 快照装载器
// ==========================================
pub struct SnapshotLoader<P: DataProvider> {
    provider: P,
}

impl<P: DataProvider> SnapshotLoader<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// 从静态 CSV 装载区域层级树
    ///
    /// 列约定: code, level, parent_code, name（parent_code/name 可空）
    pub fn load_hierarchy_csv<Q: AsRef<Path>>(path: Q) -> DisaggResult<RegionHierarchy> {
        let file = std::fs::File::open(path.as_ref()).map_err(|e| {
            DisaggError::MalformedHierarchy(format!(
                "层级表 {} 打开失败: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

        let mut records: Vec<RegionRecord> = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                DisaggError::MalformedHierarchy(format!("层级表第 {} 行解析失败: {}", idx + 2, e))
            })?;

            let code = record.get(0).unwrap_or("").trim();
            let level_raw = record.get(1).unwrap_or("").trim();
            let parent = record.get(2).unwrap_or("").trim();
            let name = record.get(3).unwrap_or("").trim();

            if code.is_empty() && level_raw.is_empty() {
                continue;
            }

            let level = RegionLevel::parse(level_raw).ok_or_else(|| {
                DisaggError::MalformedHierarchy(format!(
                    "层级表第 {} 行层级非法: {}",
                    idx + 2,
                    level_raw
                ))
            })?;

            let mut rec = RegionRecord::new(
                code,
                level,
                if parent.is_empty() { None } else { Some(parent) },
            );
            if !name.is_empty() {
                rec = rec.with_name(name);
            }
            records.push(rec);
        }

        RegionHierarchy::from_records(records)
    }

    /// 装载一个空间权重键
    ///
    /// 数据集行: region_code + value；value 为空 -> 未知权重
    pub async fn load_key(
        &self,
        dataset: &DatasetId,
        level: RegionLevel,
        version: &str,
        scope: &TableScope,
    ) -> DisaggResult<WeightingKey> {
        let rows = self.provider.fetch_table(dataset, scope).await?;

        let mut key = WeightingKey::new(dataset.as_str(), level, version);
        for row in rows {
            match row.value {
                Some(v) => key = key.with_weight(&row.region_code, v),
                None => key = key.with_unknown(&row.region_code),
            }
        }

        info!(
            key = %key.name,
            level = %key.level,
            regions = key.weights.len(),
            "权重键装载完成"
        );
        Ok(key)
    }

    /// 装载一条负荷曲线
    ///
    /// 数据集行: timestamp + value；按时间点升序；原始序列在此归一化
    pub async fn load_profile(
        &self,
        dataset: &DatasetId,
        sector: Sector,
        carrier: EnergyCarrier,
        year: i32,
        resolution: TemporalResolution,
        version: &str,
    ) -> DisaggResult<TemporalProfile> {
        let raw = self
            .load_series(dataset, &TableScope::for_year(year))
            .await?;

        // 原始序列归一化为因子（曲线只承载形状）
        let total: f64 = raw.iter().sum();
        if total <= 0.0 {
            return Err(DisaggError::Validation(format!(
                "曲线数据集 {} 原始值合计为 {}，无法归一化",
                dataset, total
            )));
        }
        let factors: Vec<f64> = raw.iter().map(|v| v / total).collect();

        let profile = TemporalProfile {
            name: dataset.as_str().to_string(),
            sector,
            carrier,
            year,
            resolution,
            version: version.to_string(),
            factors,
        };
        info!(profile = %profile.name, points = profile.factors.len(), "负荷曲线装载完成");
        Ok(profile)
    }

    /// 装载一条温度序列
    pub async fn load_temperature(
        &self,
        dataset: &DatasetId,
        year: i32,
        resolution: TemporalResolution,
        version: &str,
    ) -> DisaggResult<TemperatureSeries> {
        let values_c = self
            .load_series(dataset, &TableScope::for_year(year))
            .await?;

        let series = TemperatureSeries {
            name: dataset.as_str().to_string(),
            year,
            resolution,
            version: version.to_string(),
            values_c,
        };
        info!(series = %series.name, points = series.values_c.len(), "温度序列装载完成");
        Ok(series)
    }

    /// 时间序列表 -> 按时间点升序的数值序列
    ///
    /// 时间序列里未知单元格无意义，直接拒绝
    async fn load_series(
        &self,
        dataset: &DatasetId,
        scope: &TableScope,
    ) -> DisaggResult<Vec<f64>> {
        let mut rows = self.provider.fetch_table(dataset, scope).await?;
        rows.sort_by_key(|r| r.timestamp);

        let mut values = Vec::with_capacity(rows.len());
        for row in rows {
            match row.value {
                Some(v) => values.push(v),
                None => {
                    return Err(DisaggError::Validation(format!(
                        "时间序列数据集 {} 含空值单元格 (区域 {}, 时间点 {:?})",
                        dataset, row.region_code, row.timestamp
                    )));
                }
            }
        }
        Ok(values)
    }
}
