// ==========================================
// 区域能源需求分解系统 - 联合管线核心
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 联合管线
// ==========================================

use crate::config::reader_trait::DisaggConfigReader;
use crate::domain::quantity::DemandQuantity;
use crate::domain::request::DisaggregationRequest;
use crate::domain::result::{CoverageReport, DisaggregationResult, ResultCell};
use crate::engine::allocation::AllocationEngine;
use crate::engine::error::{check_conservation, DisaggError, DisaggResult};
use crate::engine::temporal::TemporalProfileEngine;
use crate::hierarchy::RegionHierarchy;
use crate::perf::PerfGuard;
use crate::registry::{KeyCombination, KeyRegistry};
use crate::repository::fingerprint::request_fingerprint;
use crate::repository::result_store::ResultStore;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

// ==========================================
// DisaggregationPipeline - 时空联合管线
// ==========================================
pub struct DisaggregationPipeline<C: DisaggConfigReader> {
    hierarchy: Arc<RegionHierarchy>,
    registry: Arc<KeyRegistry>,
    config: Arc<C>,
    store: Option<Arc<ResultStore>>,
    allocation: AllocationEngine,
    temporal: TemporalProfileEngine<C>,
}

impl<C: DisaggConfigReader> DisaggregationPipeline<C> {
    pub fn new(
        hierarchy: Arc<RegionHierarchy>,
        registry: Arc<KeyRegistry>,
        config: Arc<C>,
        store: Option<Arc<ResultStore>>,
    ) -> Self {
        let temporal = TemporalProfileEngine::new(Arc::clone(&config));
        Self {
            hierarchy,
            registry,
            config,
            store,
            allocation: AllocationEngine::new(),
            temporal,
        }
    }

    /// 执行一次完整分解
    ///
    /// # 流程
    /// 1. 请求校验（曲线名 / 温度序列名 / 容差）
    /// 2. 指纹计算（含版本标签），命中缓存直接返回
    /// 3. 空间分配（未请求时恒等: 源需求量即唯一片段）
    /// 4. 覆盖检查（缺口非空且未放行时中止）
    /// 5. 逐片段时间展开（未请求时产出年度单元格）
    /// 6. 顺序无关性自检 + 时空联合守恒校验
    /// 7. 持久化（有存储时）
    pub async fn run(
        &self,
        request: &DisaggregationRequest,
    ) -> DisaggResult<DisaggregationResult> {
        let _perf = PerfGuard::new("pipeline_run");

        self.validate_request(request)?;
        let tolerance = self.resolve_tolerance(request).await?;

        // ===== 指纹与缓存 =====
        let versions = self.collect_versions(request)?;
        let fingerprint = request_fingerprint(request, &versions)?;

        if let Some(store) = &self.store {
            if let Some(cached) = store.get(&fingerprint)? {
                info!(%fingerprint, "结果缓存命中，跳过计算");
                return Ok(cached);
            }
        }

        // ===== 空间分配 =====
        let (fragments, coverage) = if request.wants_spatial() {
            let combination =
                KeyCombination::build(request.key_combination.clone(), &self.registry)?;
            let allocation = self.allocation.allocate(
                &request.demand,
                request.target_level.ok_or_else(|| {
                    DisaggError::Validation("空间分解缺少目标层级".to_string())
                })?,
                &combination,
                &self.registry,
                &self.hierarchy,
                tolerance,
            )?;
            (allocation.fragments, allocation.coverage)
        } else {
            (vec![request.demand.clone()], CoverageReport::default())
        };

        if !coverage.is_complete() && !request.allow_incomplete {
            return Err(DisaggError::IncompleteCoverage { report: coverage });
        }

        // ===== 时间展开 =====
        let cells = if request.wants_temporal() {
            self.expand_fragments(request, &fragments, tolerance).await?
        } else {
            fragments
                .iter()
                .map(|f| ResultCell {
                    region_code: f.scope.region_code.clone(),
                    timestamp: None,
                    value: f.value,
                })
                .collect()
        };

        // ===== 时空联合守恒 =====
        let total: f64 = cells.iter().map(|c| c.value).sum();
        check_conservation(
            &format!("时空联合 {}", request.demand.scope),
            request.demand.value,
            total + coverage.unallocated,
            tolerance,
        )?;

        let result = DisaggregationResult {
            result_id: Uuid::new_v4(),
            fingerprint,
            source: request.demand.clone(),
            cells,
            coverage,
            created_at: Utc::now(),
        };

        // ===== 持久化 =====
        if let Some(store) = &self.store {
            store.put(&result)?;
        }

        info!(
            result_id = %result.result_id,
            cells = result.cells.len(),
            gaps = result.coverage.gaps.len(),
            "分解请求完成"
        );

        Ok(result)
    }

    // ==========================================
    // 内部步骤
    // ==========================================

    fn validate_request(&self, request: &DisaggregationRequest) -> DisaggResult<()> {
        if request.wants_temporal() && request.profile_name.is_none() {
            return Err(DisaggError::Validation(
                "时间分解必须指定负荷曲线名".to_string(),
            ));
        }
        if request.weather_adjusted && request.temperature_name.is_none() {
            return Err(DisaggError::Validation(
                "天气修正必须指定温度序列名".to_string(),
            ));
        }
        if !request.wants_spatial() && !request.wants_temporal() {
            return Err(DisaggError::Validation(
                "请求既无空间目标也无时间目标".to_string(),
            ));
        }
        if let Some(t) = request.tolerance_override {
            if !t.is_finite() || t <= 0.0 {
                return Err(DisaggError::Validation(format!(
                    "容差覆写非法: {}",
                    t
                )));
            }
        }
        Ok(())
    }

    async fn resolve_tolerance(&self, request: &DisaggregationRequest) -> DisaggResult<f64> {
        match request.tolerance_override {
            Some(t) => Ok(t),
            None => self
                .config
                .get_default_tolerance()
                .await
                .map_err(|e| DisaggError::Validation(format!("读取默认容差失败: {}", e))),
        }
    }

    /// 收集请求引用的 (名称, 版本标签) 对
    ///
    /// 引用对象未注册时快速失败（而非指纹里缺一个版本）
    fn collect_versions(
        &self,
        request: &DisaggregationRequest,
    ) -> DisaggResult<Vec<(String, String)>> {
        let mut versions: Vec<(String, String)> = Vec::new();

        for (name, _) in &request.key_combination {
            let key = self.registry.lookup_key(name)?;
            versions.push((name.clone(), key.version.clone()));
        }
        if let Some(name) = &request.profile_name {
            if request.wants_temporal() {
                let profile = self.registry.lookup_profile(name)?;
                versions.push((name.clone(), profile.version.clone()));
            }
        }
        if request.weather_adjusted {
            if let Some(name) = &request.temperature_name {
                let series = self.registry.lookup_temperature(name)?;
                versions.push((name.clone(), series.version.clone()));
            }
        }

        Ok(versions)
    }

    /// 逐片段时间展开 + 顺序无关性自检
    ///
    /// 自检: 结果按时间点的列和必须等于 "先时间后空间" 路径的边际序列
    /// （即 展开(源量) * 已分配份额），逐点相对容差校验
    async fn expand_fragments(
        &self,
        request: &DisaggregationRequest,
        fragments: &[DemandQuantity],
        tolerance: f64,
    ) -> DisaggResult<Vec<ResultCell>> {
        let profile_name = request
            .profile_name
            .as_deref()
            .ok_or_else(|| DisaggError::Validation("缺少负荷曲线名".to_string()))?;
        let profile = self.registry.lookup_profile(profile_name)?;

        let temperature = match (&request.weather_adjusted, &request.temperature_name) {
            (true, Some(name)) => Some(self.registry.lookup_temperature(name)?),
            _ => None,
        };

        let mut cells: Vec<ResultCell> = Vec::new();
        let mut column_sums: Vec<f64> = Vec::new();

        for fragment in fragments {
            let series = self
                .temporal
                .expand(
                    fragment,
                    request.target_resolution,
                    profile,
                    temperature,
                    tolerance,
                )
                .await?;

            if column_sums.is_empty() {
                column_sums = vec![0.0; series.len()];
            }
            for (i, (ts, value)) in series.iter().enumerate() {
                column_sums[i] += value;
                cells.push(ResultCell {
                    region_code: fragment.scope.region_code.clone(),
                    timestamp: Some(*ts),
                    value: *value,
                });
            }
        }

        // 顺序无关性自检: 先时间后空间的边际序列
        if request.demand.value > 0.0 && !fragments.is_empty() {
            let marginal = self
                .temporal
                .expand(
                    &request.demand,
                    request.target_resolution,
                    profile,
                    temperature,
                    tolerance,
                )
                .await?;
            let allocated_share: f64 =
                fragments.iter().map(|f| f.value).sum::<f64>() / request.demand.value;

            for (i, (_, total_value)) in marginal.iter().enumerate() {
                check_conservation(
                    &format!("顺序无关性自检 点 {}", i),
                    total_value * allocated_share,
                    column_sums[i],
                    tolerance,
                )?;
            }
            debug!(points = marginal.len(), "顺序无关性自检通过");
        }

        cells.sort_by(|a, b| {
            a.region_code
                .cmp(&b.region_code)
                .then(a.timestamp.cmp(&b.timestamp))
        });

        Ok(cells)
    }
}
