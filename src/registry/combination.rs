// ==========================================
// 区域能源需求分解系统 - 权重键凸组合
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 键组合
// 红线: 组合系数在边界一次性校验（和为 1），分配递归内部不再复查
// ==========================================

use crate::engine::error::{DisaggError, DisaggResult};
use crate::hierarchy::RegionHierarchy;
use crate::registry::KeyRegistry;
use std::collections::BTreeMap;

/// 组合系数归一化容差
const COMBINATION_TOLERANCE: f64 = 1e-9;

// ==========================================
// KeyCombination - 权重键凸组合
// ==========================================
/// 若干权重键的凸组合，如 0.6 * 人口 + 0.4 * 就业
///
/// 构造时校验系数，之后可反复用于任意父区域。
#[derive(Debug, Clone)]
pub struct KeyCombination {
    components: Vec<(String, f64)>,
}

impl KeyCombination {
    /// 构造并校验组合
    ///
    /// # 校验规则
    /// 1. 组合非空
    /// 2. 每个键已注册（NotFound 快速失败）
    /// 3. 系数有限、非负、和为 1（容差内）
    pub fn build(
        components: Vec<(String, f64)>,
        registry: &KeyRegistry,
    ) -> DisaggResult<Self> {
        if components.is_empty() {
            return Err(DisaggError::InvalidCombination(
                "键组合为空".to_string(),
            ));
        }

        for (name, lambda) in &components {
            registry.lookup_key(name)?;
            if !lambda.is_finite() || *lambda < 0.0 {
                return Err(DisaggError::InvalidCombination(format!(
                    "键 {} 的组合系数非法: {}",
                    name, lambda
                )));
            }
        }

        let total: f64 = components.iter().map(|(_, l)| l).sum();
        if (total - 1.0).abs() > COMBINATION_TOLERANCE {
            return Err(DisaggError::InvalidCombination(format!(
                "组合系数之和为 {:.12}，应为 1",
                total
            )));
        }

        Ok(Self { components })
    }

    /// 组合内的键名（指纹计算用）
    pub fn key_names(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(|(name, _)| name.as_str())
    }

    /// 父区域直接子区域上的组合归一化权重
    ///
    /// # 组合规则
    /// 1. 单键组合直接透传该键的归一化权重
    /// 2. 多键组合: 无覆盖的分量整体跳过（其系数从分母中剔除），
    ///    每个子区域按覆盖它的分量做凸组合，最后整表重归一化
    /// 3. 所有分量都无覆盖: NoCoverage
    pub fn weights_for(
        &self,
        parent_code: &str,
        registry: &KeyRegistry,
        hierarchy: &RegionHierarchy,
    ) -> DisaggResult<BTreeMap<String, f64>> {
        if self.components.len() == 1 {
            return registry.weights_for(&self.components[0].0, parent_code, hierarchy);
        }

        // 每个分量独立求权重，NoCoverage 的分量跳过
        let mut covering: Vec<(f64, BTreeMap<String, f64>)> = Vec::new();
        for (name, lambda) in &self.components {
            match registry.weights_for(name, parent_code, hierarchy) {
                Ok(weights) => covering.push((*lambda, weights)),
                Err(DisaggError::NoCoverage { .. }) => continue,
                Err(e) => return Err(e),
            }
        }

        if covering.is_empty() {
            return Err(DisaggError::NoCoverage {
                key: self.describe(),
                region: parent_code.to_string(),
                message: "组合内所有键均无覆盖".to_string(),
            });
        }

        // 子区域级凸组合: 只对覆盖该子区域的分量取平均
        let mut combined: BTreeMap<String, f64> = BTreeMap::new();
        let mut lambda_sums: BTreeMap<String, f64> = BTreeMap::new();
        for (lambda, weights) in &covering {
            for (code, w) in weights {
                *combined.entry(code.clone()).or_insert(0.0) += lambda * w;
                *lambda_sums.entry(code.clone()).or_insert(0.0) += lambda;
            }
        }
        for (code, value) in combined.iter_mut() {
            let ls = lambda_sums[code];
            if ls > 0.0 {
                *value /= ls;
            }
        }

        // 整表重归一化，保证和为 1
        let total: f64 = combined.values().sum();
        if total <= 0.0 {
            return Err(DisaggError::NoCoverage {
                key: self.describe(),
                region: parent_code.to_string(),
                message: "组合权重合计为零".to_string(),
            });
        }
        for value in combined.values_mut() {
            *value /= total;
        }

        Ok(combined)
    }

    fn describe(&self) -> String {
        self.components
            .iter()
            .map(|(name, lambda)| format!("{:.3}*{}", lambda, name))
            .collect::<Vec<_>>()
            .join(" + ")
    }
}
