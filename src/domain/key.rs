// ==========================================
// 区域能源需求分解系统 - 空间权重键
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 键目录
// 红线: "未知" 与 "真零" 必须区分，未知不参与归一化分母
// 红线: 原始权重存储时不归一化，归一化发生在使用时
// ==========================================

use crate::domain::types::RegionLevel;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// WeightingKey - 空间权重键
// ==========================================
// 例: 人口、分部门从业人数、建筑供暖面积、采暖度日数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightingKey {
    /// 键名（注册目录内唯一，如 "population"）
    pub name: String,
    /// 权重定义所在的区域层级
    pub level: RegionLevel,
    /// 数据版本标签（源统计数据更新时必须变更）
    pub version: String,
    /// 区域编码 -> 权重；None 表示未知（区别于 Some(0.0)）
    /// 映射中缺失的编码同样视为未知
    pub weights: HashMap<String, Option<f64>>,
}

impl WeightingKey {
    pub fn new(name: &str, level: RegionLevel, version: &str) -> Self {
        Self {
            name: name.to_string(),
            level,
            version: version.to_string(),
            weights: HashMap::new(),
        }
    }

    /// 设置已知权重
    pub fn with_weight(mut self, code: &str, weight: f64) -> Self {
        self.weights.insert(code.to_string(), Some(weight));
        self
    }

    /// 显式标记未知权重
    pub fn with_unknown(mut self, code: &str) -> Self {
        self.weights.insert(code.to_string(), None);
        self
    }

    /// 读取已知权重；未知或缺失返回 None
    pub fn known_weight(&self, code: &str) -> Option<f64> {
        self.weights.get(code).copied().flatten()
    }

    /// 注册前校验: 已知权重必须有限且非负
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("权重键名称不能为空".to_string());
        }
        for (code, weight) in &self.weights {
            if let Some(w) = weight {
                if !w.is_finite() {
                    return Err(format!("权重键 {} 区域 {} 的权重非有限值", self.name, code));
                }
                if *w < 0.0 {
                    return Err(format!(
                        "权重键 {} 区域 {} 的权重为负: {}",
                        self.name, code, w
                    ));
                }
            }
        }
        Ok(())
    }
}
