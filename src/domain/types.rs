// ==========================================
// 区域能源需求分解系统 - 领域类型定义
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 数据模型
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 区域层级 (Region Level)
// ==========================================
// 顺序: Country < State < District < Municipality (粗 → 细)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegionLevel {
    Country,      // 国家 (NUTS-0)
    State,        // 联邦州 (NUTS-1)
    District,     // 行政区 (NUTS-3)
    Municipality, // 市镇 (LAU)
}

impl fmt::Display for RegionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionLevel::Country => write!(f, "COUNTRY"),
            RegionLevel::State => write!(f, "STATE"),
            RegionLevel::District => write!(f, "DISTRICT"),
            RegionLevel::Municipality => write!(f, "MUNICIPALITY"),
        }
    }
}

impl RegionLevel {
    /// 层级深度 (根 = 0)
    pub fn depth(&self) -> u8 {
        match self {
            RegionLevel::Country => 0,
            RegionLevel::State => 1,
            RegionLevel::District => 2,
            RegionLevel::Municipality => 3,
        }
    }

    /// 上一级（更粗一级）层级
    pub fn parent_level(&self) -> Option<RegionLevel> {
        match self {
            RegionLevel::Country => None,
            RegionLevel::State => Some(RegionLevel::Country),
            RegionLevel::District => Some(RegionLevel::State),
            RegionLevel::Municipality => Some(RegionLevel::District),
        }
    }

    /// 下一级（更细一级）层级
    pub fn child_level(&self) -> Option<RegionLevel> {
        match self {
            RegionLevel::Country => Some(RegionLevel::State),
            RegionLevel::State => Some(RegionLevel::District),
            RegionLevel::District => Some(RegionLevel::Municipality),
            RegionLevel::Municipality => None,
        }
    }

    /// 从字符串解析层级（层级表加载用）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "COUNTRY" | "NUTS0" => Some(RegionLevel::Country),
            "STATE" | "NUTS1" => Some(RegionLevel::State),
            "DISTRICT" | "NUTS3" => Some(RegionLevel::District),
            "MUNICIPALITY" | "LAU" => Some(RegionLevel::Municipality),
            _ => None,
        }
    }
}

// ==========================================
// 能源载体 (Energy Carrier)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnergyCarrier {
    Electricity, // 电力
    Heat,        // 热力
    Gas,         // 天然气
}

impl fmt::Display for EnergyCarrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnergyCarrier::Electricity => write!(f, "ELECTRICITY"),
            EnergyCarrier::Heat => write!(f, "HEAT"),
            EnergyCarrier::Gas => write!(f, "GAS"),
        }
    }
}

// ==========================================
// 需求部门 (Sector)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sector {
    Household,            // 居民
    CommerceTradeService, // 商业/贸易/服务 (CTS)
    Industry,             // 工业
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sector::Household => write!(f, "HOUSEHOLD"),
            Sector::CommerceTradeService => write!(f, "COMMERCE_TRADE_SERVICE"),
            Sector::Industry => write!(f, "INDUSTRY"),
        }
    }
}

// ==========================================
// 时间分辨率 (Temporal Resolution)
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 配置项全集
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemporalResolution {
    Annual,        // 年度（不展开）
    Daily,         // 日度
    Hourly,        // 小时
    QuarterHourly, // 15 分钟
}

impl fmt::Display for TemporalResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemporalResolution::Annual => write!(f, "ANNUAL"),
            TemporalResolution::Daily => write!(f, "DAILY"),
            TemporalResolution::Hourly => write!(f, "HOURLY"),
            TemporalResolution::QuarterHourly => write!(f, "QUARTER_HOURLY"),
        }
    }
}

impl TemporalResolution {
    /// 指定年份下一年的网格点数（闰年感知）
    ///
    /// # 示例
    /// - Hourly + 2019 -> 8760
    /// - Hourly + 2020 -> 8784
    pub fn points_in_year(&self, year: i32) -> usize {
        let days = if is_leap_year(year) { 366 } else { 365 };
        match self {
            TemporalResolution::Annual => 1,
            TemporalResolution::Daily => days,
            TemporalResolution::Hourly => days * 24,
            TemporalResolution::QuarterHourly => days * 96,
        }
    }

    /// 每个网格点的时长（分钟）；Annual 返回 None
    pub fn step_minutes(&self) -> Option<i64> {
        match self {
            TemporalResolution::Annual => None,
            TemporalResolution::Daily => Some(24 * 60),
            TemporalResolution::Hourly => Some(60),
            TemporalResolution::QuarterHourly => Some(15),
        }
    }
}

/// 闰年判定（公历规则）
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

// ==========================================
// 能量单位 (Energy Unit)
// ==========================================
// 注: 单位不做自动换算，分解前后单位保持一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnergyUnit {
    GigawattHours, // GWh
    MegawattHours, // MWh
    Terajoules,    // TJ
}

impl fmt::Display for EnergyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnergyUnit::GigawattHours => write!(f, "GWh"),
            EnergyUnit::MegawattHours => write!(f, "MWh"),
            EnergyUnit::Terajoules => write!(f, "TJ"),
        }
    }
}
