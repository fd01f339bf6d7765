// ==========================================
// 区域能源需求分解系统 - 文件数据提供器
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 外部数据接口
// 支持: CSV (.csv) / Excel (.xlsx/.xls)
// ==========================================
// 列约定: region_code, year, timestamp, category, value
// 红线: value 列为空 -> 未知单元格（None），不折算为 0
// ==========================================

use crate::provider::error::{ProviderError, ProviderResult};
use crate::provider::table::{DataProvider, DatasetId, TableRow, TableScope};
use async_trait::async_trait;
use calamine::{open_workbook, Reader, Xlsx};
use chrono::NaiveDateTime;
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 时间戳列接受的格式
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

// ==========================================
// FileDataProvider - 目录式文件提供器
// ==========================================
// 数据集 "population" 解析为 <data_dir>/population.csv（或 .xlsx/.xls）
pub struct FileDataProvider {
    data_dir: PathBuf,
}

impl FileDataProvider {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    /// 按扩展名优先级定位数据集文件
    fn locate(&self, dataset: &DatasetId) -> ProviderResult<PathBuf> {
        for ext in ["csv", "xlsx", "xls"] {
            let candidate = self.data_dir.join(format!("{}.{}", dataset, ext));
            if candidate.exists() {
                return Ok(candidate);
            }
        }
        Err(ProviderError::Unavailable {
            dataset: dataset.to_string(),
            message: format!("目录 {} 下无对应文件", self.data_dir.display()),
        })
    }

    /// 解析原始记录（表头 -> 值），跳过全空行
    fn parse_raw(&self, path: &Path) -> ProviderResult<Vec<HashMap<String, String>>> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => self.parse_csv(path),
            "xlsx" | "xls" => self.parse_excel(path),
            _ => Err(ProviderError::UnsupportedFormat(ext)),
        }
    }

    fn parse_csv(&self, path: &Path) -> ProviderResult<Vec<HashMap<String, String>>> {
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut row_map = HashMap::new();
            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), value.trim().to_string());
                }
            }
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }
            records.push(row_map);
        }

        Ok(records)
    }

    fn parse_excel(&self, path: &Path) -> ProviderResult<Vec<HashMap<String, String>>> {
        let dataset = path.display().to_string();
        let mut workbook: Xlsx<_> =
            open_workbook(path).map_err(|e: calamine::XlsxError| ProviderError::Malformed {
                dataset: dataset.clone(),
                message: e.to_string(),
            })?;

        let sheet_names = workbook.sheet_names();
        if sheet_names.is_empty() {
            return Err(ProviderError::Malformed {
                dataset,
                message: "Excel 文件无工作表".to_string(),
            });
        }

        let sheet_name = sheet_names[0].clone();
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ProviderError::Malformed {
                dataset: dataset.clone(),
                message: e.to_string(),
            })?;

        let mut rows = range.rows();
        let header_row = rows.next().ok_or_else(|| ProviderError::Malformed {
            dataset: dataset.clone(),
            message: "Excel 文件无数据行".to_string(),
        })?;
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut records = Vec::new();
        for data_row in rows {
            let mut row_map = HashMap::new();
            for (col_idx, cell) in data_row.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), cell.to_string().trim().to_string());
                }
            }
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }
            records.push(row_map);
        }

        Ok(records)
    }

    /// 原始记录 -> 统一数据行
    fn to_table_row(
        dataset: &DatasetId,
        row_idx: usize,
        raw: &HashMap<String, String>,
    ) -> ProviderResult<TableRow> {
        let region_code = raw
            .get("region_code")
            .filter(|v| !v.is_empty())
            .cloned()
            .ok_or_else(|| ProviderError::FieldParseError {
                row: row_idx,
                field: "region_code".to_string(),
                message: format!("数据集 {} 缺少区域编码", dataset),
            })?;

        let year = match raw.get("year").filter(|v| !v.is_empty()) {
            Some(v) => Some(v.parse::<i32>().map_err(|e| ProviderError::FieldParseError {
                row: row_idx,
                field: "year".to_string(),
                message: e.to_string(),
            })?),
            None => None,
        };

        let timestamp = match raw.get("timestamp").filter(|v| !v.is_empty()) {
            Some(v) => Some(parse_timestamp(v).ok_or_else(|| {
                ProviderError::FieldParseError {
                    row: row_idx,
                    field: "timestamp".to_string(),
                    message: format!("无法解析时间点: {}", v),
                }
            })?),
            None => None,
        };

        let category = raw.get("category").filter(|v| !v.is_empty()).cloned();

        // 空值单元格是 "未知"，不是 0
        let value = match raw.get("value").filter(|v| !v.is_empty()) {
            Some(v) => {
                let parsed =
                    v.parse::<f64>()
                        .map_err(|e| ProviderError::FieldParseError {
                            row: row_idx,
                            field: "value".to_string(),
                            message: e.to_string(),
                        })?;
                if !parsed.is_finite() {
                    return Err(ProviderError::FieldParseError {
                        row: row_idx,
                        field: "value".to_string(),
                        message: format!("非有限数值: {}", v),
                    });
                }
                Some(parsed)
            }
            None => None,
        };

        Ok(TableRow {
            region_code,
            year,
            timestamp,
            category,
            value,
        })
    }
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

#[async_trait]
impl DataProvider for FileDataProvider {
    async fn fetch_table(
        &self,
        dataset: &DatasetId,
        scope: &TableScope,
    ) -> ProviderResult<Vec<TableRow>> {
        let path = self.locate(dataset)?;
        let raw_records = self.parse_raw(&path)?;

        let mut rows = Vec::with_capacity(raw_records.len());
        for (idx, raw) in raw_records.iter().enumerate() {
            // 表头行占第 1 行，数据行号从 2 起
            let row = Self::to_table_row(dataset, idx + 2, raw)?;
            if scope.matches(&row) {
                rows.push(row);
            }
        }

        debug!(
            dataset = %dataset,
            file = %path.display(),
            rows = rows.len(),
            "数据集抓取完成"
        );
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_dataset(dir: &Path, name: &str, content: &str) {
        let mut f = File::create(dir.join(name)).unwrap();
        write!(f, "{}", content).unwrap();
    }

    #[tokio::test]
    async fn test_fetch_csv_dataset() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(
            dir.path(),
            "population.csv",
            "region_code,year,category,value\nDE1,2019,,11.1\nDE2,2019,,13.1\n",
        );

        let provider = FileDataProvider::new(dir.path());
        let rows = provider
            .fetch_table(&DatasetId::new("population"), &TableScope::all())
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].region_code, "DE1");
        assert_eq!(rows[0].value, Some(11.1));
    }

    #[tokio::test]
    async fn test_empty_value_is_unknown() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(
            dir.path(),
            "population.csv",
            "region_code,year,value\nDE1,2019,5.0\nDE2,2019,\n",
        );

        let provider = FileDataProvider::new(dir.path());
        let rows = provider
            .fetch_table(&DatasetId::new("population"), &TableScope::all())
            .await
            .unwrap();

        assert_eq!(rows[1].value, None);
    }

    #[tokio::test]
    async fn test_scope_filter_by_year() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(
            dir.path(),
            "population.csv",
            "region_code,year,value\nDE1,2018,10.0\nDE1,2019,11.1\n",
        );

        let provider = FileDataProvider::new(dir.path());
        let rows = provider
            .fetch_table(&DatasetId::new("population"), &TableScope::for_year(2019))
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].year, Some(2019));
    }

    #[tokio::test]
    async fn test_missing_dataset_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileDataProvider::new(dir.path());
        let err = provider
            .fetch_table(&DatasetId::new("employment"), &TableScope::all())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_bad_value_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(
            dir.path(),
            "population.csv",
            "region_code,year,value\nDE1,2019,abc\n",
        );

        let provider = FileDataProvider::new(dir.path());
        let err = provider
            .fetch_table(&DatasetId::new("population"), &TableScope::all())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::FieldParseError { .. }));
    }
}
