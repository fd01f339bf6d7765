// ==========================================
// 区域能源需求分解系统 - 区域实体
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 区域层级
// 红线: 父子关系用编码映射表示，不做对象互引用
// ==========================================

use crate::domain::types::RegionLevel;
use serde::{Deserialize, Serialize};

// ==========================================
// Region - 区域实体
// ==========================================
// 不变式: 除根以外每个区域恰有一个父区域；编码全树唯一
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// 区域编码（全树唯一，如 "DE" / "DE1" / "DE111"）
    pub code: String,
    /// 区域名称（展示用，可为空）
    pub name: String,
    /// 区域层级
    pub level: RegionLevel,
    /// 父区域编码（仅根为 None）
    pub parent: Option<String>,
}

// ==========================================
// RegionRecord - 层级表原始记录
// ==========================================
// 来源: 静态层级表 (code, level, parent_code[, name])，进程内只加载一次
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionRecord {
    pub code: String,
    pub level: RegionLevel,
    pub parent_code: Option<String>,
    pub name: Option<String>,
}

impl RegionRecord {
    pub fn new(code: &str, level: RegionLevel, parent_code: Option<&str>) -> Self {
        Self {
            code: code.to_string(),
            level,
            parent_code: parent_code.map(|s| s.to_string()),
            name: None,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }
}
