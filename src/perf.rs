// ==========================================
// 区域能源需求分解系统 - 性能统计
// ==========================================
// 目标:
// - 以 Drop Guard 记录操作耗时，避免分散在各处的手工计时
// - 网格点数多的请求（小时 / 15 分钟分辨率）必须可观测
// ==========================================

use std::time::Instant;

/// 性能统计 Guard：作用域结束时记录 elapsed_ms
///
/// 使用方式：
/// ```ignore
/// let _perf = regio_disagg::perf::PerfGuard::new("pipeline_run");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        Self {
            op,
            start: Instant::now(),
        }
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;
        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms,
            "done"
        );
    }
}
