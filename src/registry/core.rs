// ==========================================
// 区域能源需求分解系统 - 键目录核心
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 键目录
// ==========================================
// 注: 目录加载完成后只读，多请求可无锁并发读取
// ==========================================

use crate::domain::key::WeightingKey;
use crate::domain::profile::{TemperatureSeries, TemporalProfile};
use crate::engine::error::{DisaggError, DisaggResult};
use crate::hierarchy::RegionHierarchy;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

// ==========================================
// KeyRegistry - 键目录
// ==========================================
#[derive(Debug, Default)]
pub struct KeyRegistry {
    keys: HashMap<String, WeightingKey>,
    profiles: HashMap<String, TemporalProfile>,
    temperatures: HashMap<String, TemperatureSeries>,
}

impl KeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================
    // 注册
    // ==========================================

    /// 注册空间权重键（注册前校验；同名覆盖并告警）
    pub fn register_key(&mut self, key: WeightingKey) -> DisaggResult<()> {
        key.validate().map_err(DisaggError::Validation)?;
        if self.keys.contains_key(&key.name) {
            warn!(key = %key.name, "权重键重复注册，旧版本被覆盖");
        }
        debug!(key = %key.name, level = %key.level, version = %key.version, "注册权重键");
        self.keys.insert(key.name.clone(), key);
        Ok(())
    }

    /// 注册负荷曲线（归一化在此校验，而非假设）
    pub fn register_profile(&mut self, profile: TemporalProfile) -> DisaggResult<()> {
        profile.validate().map_err(DisaggError::Validation)?;
        if self.profiles.contains_key(&profile.name) {
            warn!(profile = %profile.name, "负荷曲线重复注册，旧版本被覆盖");
        }
        debug!(
            profile = %profile.name,
            year = profile.year,
            resolution = %profile.resolution,
            version = %profile.version,
            "注册负荷曲线"
        );
        self.profiles.insert(profile.name.clone(), profile);
        Ok(())
    }

    /// 注册温度序列
    pub fn register_temperature(&mut self, series: TemperatureSeries) -> DisaggResult<()> {
        series.validate().map_err(DisaggError::Validation)?;
        if self.temperatures.contains_key(&series.name) {
            warn!(series = %series.name, "温度序列重复注册，旧版本被覆盖");
        }
        self.temperatures.insert(series.name.clone(), series);
        Ok(())
    }

    // ==========================================
    // 查询
    // ==========================================

    pub fn lookup_key(&self, name: &str) -> DisaggResult<&WeightingKey> {
        self.keys
            .get(name)
            .ok_or_else(|| DisaggError::not_found("weighting_key", name))
    }

    pub fn lookup_profile(&self, name: &str) -> DisaggResult<&TemporalProfile> {
        self.profiles
            .get(name)
            .ok_or_else(|| DisaggError::not_found("temporal_profile", name))
    }

    pub fn lookup_temperature(&self, name: &str) -> DisaggResult<&TemperatureSeries> {
        self.temperatures
            .get(name)
            .ok_or_else(|| DisaggError::not_found("temperature_series", name))
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.keys.contains_key(name)
    }

    /// 指定名称的版本标签（键 / 曲线 / 温度序列，指纹计算用）
    pub fn version_tag(&self, name: &str) -> Option<&str> {
        self.keys
            .get(name)
            .map(|k| k.version.as_str())
            .or_else(|| self.profiles.get(name).map(|p| p.version.as_str()))
            .or_else(|| self.temperatures.get(name).map(|t| t.version.as_str()))
    }

    // ==========================================
    // 归一化权重
    // ==========================================

    /// 父区域直接子区域上的归一化权重
    ///
    /// # 归一化规则
    /// 1. 未知权重子区域不进分母，也不出现在结果中
    /// 2. 键层级细于子区域层级: 对已知后代权重求和后上卷（和是精确的，守恒不受影响）
    /// 3. 键层级粗于子区域层级: NoCoverage（不做插值猜测）
    /// 4. 全部未知 / 无子区域 / 已知权重合计为零: NoCoverage
    ///
    /// # 返回
    /// - BTreeMap<子区域编码, 归一化权重>，值之和为 1（容差内）
    pub fn weights_for(
        &self,
        name: &str,
        parent_code: &str,
        hierarchy: &RegionHierarchy,
    ) -> DisaggResult<BTreeMap<String, f64>> {
        let key = self.lookup_key(name)?;
        let children = hierarchy.children(parent_code)?;

        if children.is_empty() {
            return Err(DisaggError::NoCoverage {
                key: name.to_string(),
                region: parent_code.to_string(),
                message: "区域没有子区域".to_string(),
            });
        }

        // 子区域层级一致性由层级树构造期保证
        let child_level = children[0].level;

        if key.level < child_level {
            return Err(DisaggError::NoCoverage {
                key: name.to_string(),
                region: parent_code.to_string(),
                message: format!(
                    "键定义层级 {} 粗于子区域层级 {}，不做插值",
                    key.level, child_level
                ),
            });
        }

        let mut known: Vec<(String, f64)> = Vec::with_capacity(children.len());
        for child in &children {
            let raw = if key.level == child_level {
                key.known_weight(&child.code)
            } else {
                // 细层级键: 对该子区域在键层级上的已知后代权重求和
                let descendants = hierarchy.descendants_at_level(&child.code, key.level)?;
                let mut sum = 0.0;
                let mut any_known = false;
                for d in descendants {
                    if let Some(w) = key.known_weight(&d.code) {
                        sum += w;
                        any_known = true;
                    }
                }
                if any_known {
                    Some(sum)
                } else {
                    None
                }
            };
            if let Some(w) = raw {
                known.push((child.code.clone(), w));
            }
        }

        if known.is_empty() {
            return Err(DisaggError::NoCoverage {
                key: name.to_string(),
                region: parent_code.to_string(),
                message: "全部子区域权重未知".to_string(),
            });
        }

        let total: f64 = known.iter().map(|(_, w)| w).sum();
        if total <= 0.0 {
            return Err(DisaggError::NoCoverage {
                key: name.to_string(),
                region: parent_code.to_string(),
                message: format!("已知权重合计为零 ({} 个已知子区域)", known.len()),
            });
        }

        Ok(known
            .into_iter()
            .map(|(code, w)| (code, w / total))
            .collect())
    }
}
