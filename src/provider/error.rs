// ==========================================
// 区域能源需求分解系统 - 数据提供层错误类型
// ==========================================
// 依据: Rust 错误处理最佳实践
// 工具: thiserror 派生宏
// ==========================================
// 红线: 核心不重试、不缓存原始抓取，错误即时上抛
// ==========================================

use thiserror::Error;

/// 数据提供层错误类型
#[derive(Error, Debug)]
pub enum ProviderError {
    // ===== 可用性错误 =====
    #[error("数据集不可用: {dataset} ({message})")]
    Unavailable { dataset: String, message: String },

    // ===== 数据格式错误 =====
    #[error("数据集格式错误: {dataset} ({message})")]
    Malformed { dataset: String, message: String },

    #[error("文件格式不支持: {0}（仅支持 .csv/.xlsx/.xls）")]
    UnsupportedFormat(String),

    #[error("字段解析失败 (行 {row}, 字段 {field}): {message}")]
    FieldParseError {
        row: usize,
        field: String,
        message: String,
    },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ProviderError {
    fn from(err: std::io::Error) -> Self {
        ProviderError::InternalError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ProviderError {
    fn from(err: csv::Error) -> Self {
        ProviderError::InternalError(format!("CSV 解析失败: {}", err))
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ProviderError {
    fn from(err: calamine::Error) -> Self {
        ProviderError::InternalError(format!("Excel 解析失败: {}", err))
    }
}

/// Result 类型别名
pub type ProviderResult<T> = Result<T, ProviderError>;
