// ==========================================
// 区域能源需求分解系统 - 时间网格
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 时间展开
// 红线: 网格点数闰年感知（8760 / 8784），长度不一致即 ResolutionMismatch
// ==========================================

use crate::domain::types::TemporalResolution;
use crate::engine::error::{DisaggError, DisaggResult};
use chrono::{Duration, NaiveDate, NaiveDateTime};

// ==========================================
// TimeGrid - 参考年时间网格
// ==========================================
// 覆盖恰好一个参考年的等距时间点序列，首点为 1 月 1 日 00:00
#[derive(Debug, Clone)]
pub struct TimeGrid {
    pub year: i32,
    pub resolution: TemporalResolution,
    points: Vec<NaiveDateTime>,
}

impl TimeGrid {
    /// 构造参考年网格
    ///
    /// # 错误
    /// - Validation: 分辨率为 Annual（年度值不展开，无网格）
    pub fn build(year: i32, resolution: TemporalResolution) -> DisaggResult<Self> {
        let step = resolution.step_minutes().ok_or_else(|| {
            DisaggError::Validation("年度分辨率不构造时间网格".to_string())
        })?;

        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(|| DisaggError::Validation(format!("年份非法: {}", year)))?;

        let n = resolution.points_in_year(year);
        let mut points = Vec::with_capacity(n);
        let mut current = start;
        for _ in 0..n {
            points.push(current);
            current += Duration::minutes(step);
        }

        Ok(Self {
            year,
            resolution,
            points,
        })
    }

    /// 网格点序列（升序）
    pub fn points(&self) -> &[NaiveDateTime] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 校验外部序列长度与网格一致
    ///
    /// # 错误
    /// - ResolutionMismatch: 长度不一致（如平年曲线套闰年网格）
    pub fn check_len(&self, actual: usize, what: &str) -> DisaggResult<()> {
        if actual != self.points.len() {
            return Err(DisaggError::ResolutionMismatch {
                expected: self.points.len(),
                actual,
                message: format!("{} 与 {} 年 {} 网格不一致", what, self.year, self.resolution),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_hourly_grid_plain_year() {
        let grid = TimeGrid::build(2019, TemporalResolution::Hourly).unwrap();
        assert_eq!(grid.len(), 8760);
        let first = grid.points()[0];
        assert_eq!(first.hour(), 0);
        let last = grid.points()[8759];
        assert_eq!(last.date().to_string(), "2019-12-31");
        assert_eq!(last.hour(), 23);
    }

    #[test]
    fn test_hourly_grid_leap_year() {
        let grid = TimeGrid::build(2020, TemporalResolution::Hourly).unwrap();
        assert_eq!(grid.len(), 8784);
    }

    #[test]
    fn test_quarter_hourly_grid() {
        let grid = TimeGrid::build(2019, TemporalResolution::QuarterHourly).unwrap();
        assert_eq!(grid.len(), 35040);
    }

    #[test]
    fn test_annual_has_no_grid() {
        let err = TimeGrid::build(2019, TemporalResolution::Annual).unwrap_err();
        assert!(matches!(err, DisaggError::Validation(_)));
    }

    #[test]
    fn test_check_len_mismatch() {
        let grid = TimeGrid::build(2020, TemporalResolution::Daily).unwrap();
        let err = grid.check_len(365, "曲线").unwrap_err();
        assert!(matches!(err, DisaggError::ResolutionMismatch { .. }));
    }
}
