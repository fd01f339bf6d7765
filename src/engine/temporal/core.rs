// ==========================================
// 区域能源需求分解系统 - 时间展开核心
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 时间展开 / 天气修正
// ==========================================

use crate::config::reader_trait::DisaggConfigReader;
use crate::domain::profile::{TemperatureSeries, TemporalProfile};
use crate::domain::quantity::DemandQuantity;
use crate::domain::types::TemporalResolution;
use crate::engine::error::{check_conservation, DisaggError, DisaggResult};
use crate::engine::timegrid::TimeGrid;
use chrono::NaiveDateTime;
use std::sync::Arc;
use tracing::{debug, info};

// ==========================================
// TemporalProfileEngine - 时间展开引擎
// ==========================================
pub struct TemporalProfileEngine<C: DisaggConfigReader> {
    config: Arc<C>,
}

impl<C: DisaggConfigReader> TemporalProfileEngine<C> {
    pub fn new(config: Arc<C>) -> Self {
        Self { config }
    }

    /// 把年度需求量按曲线展开到时间网格
    ///
    /// # 算法
    /// 1. 构造 (曲线年份, 曲线分辨率) 网格，长度闰年感知
    /// 2. 可选天气修正: 逐点重塑因子后整体重归一化（总量不变）
    /// 3. 逐点值 = 年度值 * 因子
    /// 4. 返回前守恒校验: 逐点值之和 == 年度值（相对容差 tolerance）
    ///
    /// # 错误
    /// - ResolutionMismatch: 曲线参考年或分辨率与目标不符 / 温度序列与网格长度不符
    /// - Validation: 曲线与需求量的部门/载体不匹配
    pub async fn expand(
        &self,
        demand: &DemandQuantity,
        target_resolution: TemporalResolution,
        profile: &TemporalProfile,
        temperature: Option<&TemperatureSeries>,
        tolerance: f64,
    ) -> DisaggResult<Vec<(NaiveDateTime, f64)>> {
        // 参考年不一致即网格不一致（平年曲线套闰年需求是典型场景）
        if profile.year != demand.scope.year {
            return Err(DisaggError::ResolutionMismatch {
                expected: target_resolution.points_in_year(demand.scope.year),
                actual: profile.factors.len(),
                message: format!(
                    "曲线 {} 参考年 {} 与需求量年份 {} 不一致",
                    profile.name, profile.year, demand.scope.year
                ),
            });
        }
        if profile.sector != demand.sector || profile.carrier != demand.carrier {
            return Err(DisaggError::Validation(format!(
                "曲线 {} ({}/{}) 与需求量 ({}/{}) 部门或载体不匹配",
                profile.name, profile.sector, profile.carrier, demand.sector, demand.carrier
            )));
        }
        if profile.resolution != target_resolution {
            return Err(DisaggError::ResolutionMismatch {
                expected: target_resolution.points_in_year(demand.scope.year),
                actual: profile.factors.len(),
                message: format!(
                    "曲线 {} 分辨率 {} 与目标分辨率 {} 不符",
                    profile.name, profile.resolution, target_resolution
                ),
            });
        }

        let grid = TimeGrid::build(profile.year, profile.resolution)?;
        grid.check_len(profile.factors.len(), "曲线因子")?;

        let factors = match temperature {
            Some(series) => {
                self.weather_adjusted_factors(profile, series, &grid).await?
            }
            None => profile.factors.clone(),
        };

        let values: Vec<(NaiveDateTime, f64)> = grid
            .points()
            .iter()
            .zip(factors.iter())
            .map(|(ts, f)| (*ts, demand.value * f))
            .collect();

        let total: f64 = values.iter().map(|(_, v)| v).sum();
        check_conservation(
            &format!("时间展开 {} * {}", demand.scope, profile.name),
            demand.value,
            total,
            tolerance,
        )?;

        info!(
            scope = %demand.scope,
            profile = %profile.name,
            points = values.len(),
            weather_adjusted = temperature.is_some(),
            "时间展开完成"
        );

        Ok(values)
    }

    /// 度日数法天气修正
    ///
    /// 逐点重塑: adj_i = f_i * (base + max(threshold - t_i, 0))
    /// 之后整体重归一化，保证因子之和回到 1（形状变、总量不变）
    async fn weather_adjusted_factors(
        &self,
        profile: &TemporalProfile,
        series: &TemperatureSeries,
        grid: &TimeGrid,
    ) -> DisaggResult<Vec<f64>> {
        if series.year != profile.year || series.resolution != profile.resolution {
            return Err(DisaggError::ResolutionMismatch {
                expected: grid.len(),
                actual: series.values_c.len(),
                message: format!(
                    "温度序列 {} ({} 年 {}) 与曲线 {} ({} 年 {}) 不在同一网格",
                    series.name,
                    series.year,
                    series.resolution,
                    profile.name,
                    profile.year,
                    profile.resolution
                ),
            });
        }
        grid.check_len(series.values_c.len(), "温度序列")?;

        let threshold = self
            .config
            .get_heating_threshold_c()
            .await
            .map_err(|e| DisaggError::Validation(format!("读取采暖阈值失败: {}", e)))?;
        let base = self
            .config
            .get_base_load_share()
            .await
            .map_err(|e| DisaggError::Validation(format!("读取基础负荷占比失败: {}", e)))?;

        let mut adjusted: Vec<f64> = profile
            .factors
            .iter()
            .zip(series.values_c.iter())
            .map(|(f, t)| f * (base + (threshold - t).max(0.0)))
            .collect();

        let sum: f64 = adjusted.iter().sum();
        if sum <= 0.0 {
            return Err(DisaggError::Validation(format!(
                "曲线 {} 天气修正后因子全为零（阈值 {}, 基础占比 {}）",
                profile.name, threshold, base
            )));
        }
        for f in adjusted.iter_mut() {
            *f /= sum;
        }

        debug!(
            profile = %profile.name,
            series = %series.name,
            threshold,
            base,
            "天气修正因子重塑完成"
        );

        Ok(adjusted)
    }
}
