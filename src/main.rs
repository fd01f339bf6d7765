// ==========================================
// 区域能源需求分解系统 - 命令行入口
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md
// 用法: regio-disagg <数据目录> <请求JSON> [--out 导出CSV] [--db 结果库]
// ==========================================
// 数据目录约定:
// - snapshot.json: 快照清单（层级表 + 键 / 曲线 / 温度序列声明）
// - 清单内各数据集对应 <dataset>.csv / <dataset>.xlsx
// ==========================================

use anyhow::{bail, Context, Result};
use regio_disagg::config::{ConfigManager, DisaggConfigReader, StaticConfigReader};
use regio_disagg::domain::{
    DisaggregationRequest, EnergyCarrier, RegionLevel, Sector, TemporalResolution,
};
use regio_disagg::provider::{DatasetId, FileDataProvider, SnapshotLoader, TableScope};
use regio_disagg::registry::KeyRegistry;
use regio_disagg::repository::ResultStore;
use regio_disagg::{api, logging, DisaggregationPipeline, RegionHierarchy};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

// ==========================================
// 快照清单
// ==========================================

#[derive(Debug, Deserialize)]
struct SnapshotManifest {
    /// 层级表文件名（数据目录内）
    hierarchy: String,
    #[serde(default)]
    keys: Vec<KeyDecl>,
    #[serde(default)]
    profiles: Vec<ProfileDecl>,
    #[serde(default)]
    temperatures: Vec<TemperatureDecl>,
}

#[derive(Debug, Deserialize)]
struct KeyDecl {
    dataset: String,
    level: RegionLevel,
    version: String,
    #[serde(default)]
    year: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct ProfileDecl {
    dataset: String,
    sector: Sector,
    carrier: EnergyCarrier,
    year: i32,
    resolution: TemporalResolution,
    version: String,
}

#[derive(Debug, Deserialize)]
struct TemperatureDecl {
    dataset: String,
    year: i32,
    resolution: TemporalResolution,
    version: String,
}

// ==========================================
// 命令行参数
// ==========================================

struct CliArgs {
    data_dir: PathBuf,
    request_path: PathBuf,
    out_path: Option<PathBuf>,
    db_path: Option<PathBuf>,
}

fn parse_args() -> Result<CliArgs> {
    let mut positional: Vec<String> = Vec::new();
    let mut out_path = None;
    let mut db_path = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out" => {
                out_path = Some(PathBuf::from(
                    args.next().context("--out 缺少文件参数")?,
                ));
            }
            "--db" => {
                db_path = Some(PathBuf::from(args.next().context("--db 缺少文件参数")?));
            }
            _ => positional.push(arg),
        }
    }

    if positional.len() != 2 {
        bail!("用法: regio-disagg <数据目录> <请求JSON> [--out 导出CSV] [--db 结果库]");
    }

    Ok(CliArgs {
        data_dir: PathBuf::from(&positional[0]),
        request_path: PathBuf::from(&positional[1]),
        out_path,
        db_path,
    })
}

// ==========================================
// 快照装载
// ==========================================

async fn load_snapshot(
    data_dir: &Path,
) -> Result<(Arc<RegionHierarchy>, Arc<KeyRegistry>)> {
    let manifest_path = data_dir.join("snapshot.json");
    let manifest_raw = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("读取快照清单失败: {}", manifest_path.display()))?;
    let manifest: SnapshotManifest =
        serde_json::from_str(&manifest_raw).context("快照清单格式非法")?;

    let hierarchy = SnapshotLoader::<FileDataProvider>::load_hierarchy_csv(
        data_dir.join(&manifest.hierarchy),
    )?;

    let loader = SnapshotLoader::new(FileDataProvider::new(data_dir));
    let mut registry = KeyRegistry::new();

    for decl in &manifest.keys {
        let scope = decl
            .year
            .map(TableScope::for_year)
            .unwrap_or_else(TableScope::all);
        let key = loader
            .load_key(
                &DatasetId::new(&decl.dataset),
                decl.level,
                &decl.version,
                &scope,
            )
            .await?;
        registry.register_key(key)?;
    }
    for decl in &manifest.profiles {
        let profile = loader
            .load_profile(
                &DatasetId::new(&decl.dataset),
                decl.sector,
                decl.carrier,
                decl.year,
                decl.resolution,
                &decl.version,
            )
            .await?;
        registry.register_profile(profile)?;
    }
    for decl in &manifest.temperatures {
        let series = loader
            .load_temperature(
                &DatasetId::new(&decl.dataset),
                decl.year,
                decl.resolution,
                &decl.version,
            )
            .await?;
        registry.register_temperature(series)?;
    }

    Ok((Arc::new(hierarchy), Arc::new(registry)))
}

// ==========================================
// 执行
// ==========================================

async fn run_request<C: DisaggConfigReader>(
    hierarchy: Arc<RegionHierarchy>,
    registry: Arc<KeyRegistry>,
    config: Arc<C>,
    store: Option<Arc<ResultStore>>,
    request: &DisaggregationRequest,
    out_path: Option<&Path>,
) -> Result<()> {
    let pipeline = DisaggregationPipeline::new(hierarchy, registry, config, store);
    let result = pipeline.run(request).await?;

    tracing::info!(
        result_id = %result.result_id,
        fingerprint = %result.fingerprint,
        cells = result.cells.len(),
        total = result.total(),
        coverage = %result.coverage.summary(),
        "分解完成"
    );

    if let Some(path) = out_path {
        api::export::write_result_csv(&result, path)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", regio_disagg::APP_NAME);
    tracing::info!("系统版本: {}", regio_disagg::VERSION);
    tracing::info!("==================================================");

    let args = parse_args()?;

    let (hierarchy, registry) = load_snapshot(&args.data_dir).await?;
    tracing::info!(regions = hierarchy.len(), "快照装载完成");

    let request_raw = std::fs::read_to_string(&args.request_path)
        .with_context(|| format!("读取请求文件失败: {}", args.request_path.display()))?;
    let request: DisaggregationRequest =
        serde_json::from_str(&request_raw).context("请求格式非法")?;

    let store = match &args.db_path {
        Some(path) => Some(Arc::new(ResultStore::new(
            path.to_str().context("结果库路径非法")?,
        )?)),
        None => None,
    };

    match &args.db_path {
        Some(path) => {
            // 结果库同时承载 config_kv 表
            let config = Arc::new(ConfigManager::new(
                path.to_str().context("结果库路径非法")?,
            )
            .map_err(|e| anyhow::anyhow!("配置管理器初始化失败: {}", e))?);
            run_request(
                hierarchy,
                registry,
                config,
                store,
                &request,
                args.out_path.as_deref(),
            )
            .await
        }
        None => {
            let config = Arc::new(StaticConfigReader::default());
            run_request(
                hierarchy,
                registry,
                config,
                store,
                &request,
                args.out_path.as_deref(),
            )
            .await
        }
    }
}
