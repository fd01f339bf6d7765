// ==========================================
// 区域能源需求分解系统 - 数据表抽象
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 外部数据接口
// 红线: 空单元格表示 "未知"，不得折算为 0
// ==========================================

use crate::provider::error::ProviderResult;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// DatasetId - 数据集标识
// ==========================================
// 例: "population", "slp_household_elc", "temperature_de", "regions"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetId(pub String);

impl DatasetId {
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ==========================================
// TableScope - 抓取范围过滤
// ==========================================
// 全 None 表示不过滤（整表）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableScope {
    /// 限定年份
    pub year: Option<i32>,
    /// 限定分类（如部门编码）
    pub category: Option<String>,
}

impl TableScope {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_year(year: i32) -> Self {
        Self {
            year: Some(year),
            category: None,
        }
    }

    /// 行是否落在范围内
    pub fn matches(&self, row: &TableRow) -> bool {
        if let Some(year) = self.year {
            if row.year != Some(year) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if row.category.as_deref() != Some(category.as_str()) {
                return false;
            }
        }
        true
    }
}

// ==========================================
// TableRow - 统一数据行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// 区域编码
    pub region_code: String,
    /// 年份（层级表等静态表可为 None）
    pub year: Option<i32>,
    /// 时间点（时间序列表用）
    pub timestamp: Option<NaiveDateTime>,
    /// 分类（部门 / 载体 / 自由维度）
    pub category: Option<String>,
    /// 数值；None 表示未知单元格
    pub value: Option<f64>,
}

// ==========================================
// DataProvider Trait
// ==========================================
// 用途: 统一抓取接口；实现者负责格式解析，不负责重试与缓存
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// 抓取一个数据集并应用范围过滤
    ///
    /// # 错误
    /// - Unavailable: 数据集不存在或不可达
    /// - Malformed: 表结构或单元格内容非法
    async fn fetch_table(
        &self,
        dataset: &DatasetId,
        scope: &TableScope,
    ) -> ProviderResult<Vec<TableRow>>;
}
