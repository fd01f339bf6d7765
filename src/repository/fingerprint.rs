// ==========================================
// 区域能源需求分解系统 - 请求指纹
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 结果缓存
// 红线: 指纹覆盖请求全字段 + 所引用键/曲线/温度序列的版本标签
// 红线: 版本对按名称排序后参与哈希，与引用顺序无关
// ==========================================

use crate::domain::request::DisaggregationRequest;
use crate::repository::error::RepositoryResult;
use serde_json::json;
use xxhash_rust::xxh64::xxh64;

/// 指纹哈希种子（协议常量，变更即缓存整体失效）
const FINGERPRINT_SEED: u64 = 0x44_45_4d_52;

/// 计算分解请求指纹
///
/// # 参数
/// - request: 分解请求（全字段参与哈希）
/// - versions: 请求引用的 (名称, 版本标签) 对；内部排序，调用方无需有序
///
/// # 返回
/// - 16 位十六进制指纹字符串
pub fn request_fingerprint(
    request: &DisaggregationRequest,
    versions: &[(String, String)],
) -> RepositoryResult<String> {
    let mut sorted: Vec<&(String, String)> = versions.iter().collect();
    sorted.sort();

    // serde_json::Value 的对象键有序，序列化结果即规范形式
    let canonical = serde_json::to_string(&json!({
        "request": request,
        "versions": sorted,
    }))?;

    Ok(format!("{:016x}", xxh64(canonical.as_bytes(), FINGERPRINT_SEED)))
}
