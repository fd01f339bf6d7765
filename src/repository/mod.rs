// ==========================================
// 区域能源需求分解系统 - 结果存储层
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 结果缓存
// ==========================================
// 职责: 请求指纹计算与分解结果的持久化缓存
// 红线: 指纹必须包含键/曲线版本标签，源数据更新即失效
// ==========================================

pub mod error;
pub mod fingerprint;
pub mod result_store;

pub use error::{RepositoryError, RepositoryResult};
pub use fingerprint::request_fingerprint;
pub use result_store::ResultStore;
