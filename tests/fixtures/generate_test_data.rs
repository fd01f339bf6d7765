// ==========================================
// 区域能源需求分解系统 - 示例数据生成器
// ==========================================
// 用法: generate_test_data [输出目录]（默认 ./sample_data）
// ==========================================
// 生成一个可直接喂给 regio-disagg 的数据目录:
// - regions.csv: 三层区域层级 (DE -> 州 -> 行政区)
// - population.csv / employment.csv: 空间权重键
// - slp_household_elc.csv: 冬高夏低的日度曲线（未归一化原始值）
// - temperature_de.csv: 合成日度温度序列
// - snapshot.json: 快照清单
// - request.json: 一条时空联合分解请求
// ==========================================

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use regio_disagg::domain::{
    DemandQuantity, DisaggregationRequest, EnergyCarrier, EnergyUnit, RegionLevel, Scope, Sector,
    TemporalResolution,
};
use std::fs;
use std::path::{Path, PathBuf};

const YEAR: i32 = 2019;

fn write(dir: &Path, name: &str, content: &str) -> Result<()> {
    let path = dir.join(name);
    fs::write(&path, content).with_context(|| format!("写入失败: {}", path.display()))?;
    println!("已生成 {}", path.display());
    Ok(())
}

fn regions_csv() -> String {
    let mut out = String::from("code,level,parent_code,name\n");
    out.push_str("DE,COUNTRY,,Deutschland\n");
    out.push_str("DE1,STATE,DE,Baden-Württemberg\n");
    out.push_str("DE2,STATE,DE,Bayern\n");
    out.push_str("DE111,DISTRICT,DE1,Stuttgart\n");
    out.push_str("DE112,DISTRICT,DE1,Böblingen\n");
    out.push_str("DE211,DISTRICT,DE2,Ingolstadt\n");
    out.push_str("DE212,DISTRICT,DE2,München\n");
    out
}

fn population_csv() -> String {
    format!(
        "region_code,year,value\nDE1,{y},11.1\nDE2,{y},13.1\n",
        y = YEAR
    )
}

fn employment_csv() -> String {
    format!(
        "region_code,year,value\n\
         DE111,{y},2.0\nDE112,{y},3.0\nDE211,{y},4.0\nDE212,{y},1.0\n",
        y = YEAR
    )
}

/// 逐日时间序列表，value 由闭包按第几天给出
fn daily_series_csv(value_at: impl Fn(i64) -> f64) -> String {
    let start = NaiveDate::from_ymd_opt(YEAR, 1, 1).unwrap();
    let days = TemporalResolution::Daily.points_in_year(YEAR) as i64;

    let mut out = String::from("region_code,year,timestamp,value\n");
    for day in 0..days {
        let date = start + Duration::days(day);
        out.push_str(&format!(
            "DE,{},{}T00:00:00,{:.4}\n",
            YEAR,
            date,
            value_at(day)
        ));
    }
    out
}

fn snapshot_json() -> String {
    serde_json::to_string_pretty(&serde_json::json!({
        "hierarchy": "regions.csv",
        "keys": [
            { "dataset": "population", "level": "STATE", "version": "2023-01", "year": YEAR },
            { "dataset": "employment", "level": "DISTRICT", "version": "2023-01", "year": YEAR }
        ],
        "profiles": [
            {
                "dataset": "slp_household_elc",
                "sector": "HOUSEHOLD",
                "carrier": "ELECTRICITY",
                "year": YEAR,
                "resolution": "DAILY",
                "version": "v1"
            }
        ],
        "temperatures": [
            { "dataset": "temperature_de", "year": YEAR, "resolution": "DAILY", "version": "v1" }
        ]
    }))
    .unwrap()
}

fn request_json() -> Result<String> {
    let demand = DemandQuantity::new(
        1000.0,
        EnergyUnit::GigawattHours,
        Sector::Household,
        EnergyCarrier::Electricity,
        Scope::new("DE", YEAR),
    )
    .map_err(|e| anyhow::anyhow!(e))?;

    let mut request = DisaggregationRequest::spatial(
        demand,
        RegionLevel::District,
        vec![
            ("population".to_string(), 0.6),
            ("employment".to_string(), 0.4),
        ],
    );
    request.target_resolution = TemporalResolution::Daily;
    request.profile_name = Some("slp_household_elc".to_string());

    Ok(serde_json::to_string_pretty(&request)?)
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_data"));
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("创建输出目录失败: {}", out_dir.display()))?;

    write(&out_dir, "regions.csv", &regions_csv())?;
    write(&out_dir, "population.csv", &population_csv())?;
    write(&out_dir, "employment.csv", &employment_csv())?;

    // 冬高夏低的余弦形状，叠加周内小波动
    let profile = daily_series_csv(|day| {
        let seasonal = 2.0 + (day as f64 / 365.0 * std::f64::consts::TAU).cos();
        let weekly = if day % 7 >= 5 { 0.9 } else { 1.0 };
        seasonal * weekly
    });
    write(&out_dir, "slp_household_elc.csv", &profile)?;

    // 合成温度: 年均 10 度、振幅 12 度
    let temperature = daily_series_csv(|day| {
        10.0 - 12.0 * (day as f64 / 365.0 * std::f64::consts::TAU).cos()
    });
    write(&out_dir, "temperature_de.csv", &temperature)?;

    write(&out_dir, "snapshot.json", &snapshot_json())?;
    write(&out_dir, "request.json", &request_json()?)?;

    println!(
        "完成。示例运行: regio-disagg {} {}",
        out_dir.display(),
        out_dir.join("request.json").display()
    );
    Ok(())
}
