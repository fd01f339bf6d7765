// ==========================================
// 区域能源需求分解系统 - 数据提供层
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 外部数据接口
// ==========================================
// 职责: 原始统计表的抓取、解析与快照装载
// 红线: 核心不重试、不缓存原始抓取；错误即时上抛
// ==========================================

pub mod error;
pub mod file_provider;
pub mod loader;
pub mod table;

pub use error::{ProviderError, ProviderResult};
pub use file_provider::FileDataProvider;
pub use loader::SnapshotLoader;
pub use table::{DataProvider, DatasetId, TableRow, TableScope};
