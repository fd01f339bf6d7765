// ==========================================
// 区域能源需求分解系统 - 区域层级树核心
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 区域层级
// ==========================================
// 设计: 扁平表（编码 -> 区域）+ 编码到编码的父子映射
// 注: 父层级必须恰好粗一级，由此自然保证无环与有界深度
// ==========================================

use crate::domain::region::{Region, RegionRecord};
use crate::domain::types::RegionLevel;
use crate::engine::error::{DisaggError, DisaggResult};
use std::collections::HashMap;
use tracing::info;

// ==========================================
// RegionHierarchy - 区域层级树
// ==========================================
#[derive(Debug, Clone)]
pub struct RegionHierarchy {
    /// 扁平区域表（编码 -> 区域）
    regions: HashMap<String, Region>,
    /// 父编码 -> 子编码列表（按编码升序）
    children: HashMap<String, Vec<String>>,
    /// 根区域编码（唯一的 Country 层级区域）
    root: String,
}

impl RegionHierarchy {
    /// 从层级表记录构造并校验
    ///
    /// # 校验规则
    /// 1. 编码全树唯一
    /// 2. 恰有一个根（Country 层级且无父）
    /// 3. 非根区域必须有父，且父存在、父层级恰好粗一级
    ///
    /// # 错误
    /// - MalformedHierarchy: 任一规则违反（加载期致命，不恢复）
    pub fn from_records(records: Vec<RegionRecord>) -> DisaggResult<Self> {
        if records.is_empty() {
            return Err(DisaggError::MalformedHierarchy(
                "层级表为空".to_string(),
            ));
        }

        // 1. 建扁平表，校验编码唯一
        let mut regions: HashMap<String, Region> = HashMap::with_capacity(records.len());
        for record in &records {
            let code = record.code.trim().to_string();
            if code.is_empty() {
                return Err(DisaggError::MalformedHierarchy(
                    "存在空区域编码".to_string(),
                ));
            }
            let region = Region {
                code: code.clone(),
                name: record.name.clone().unwrap_or_default(),
                level: record.level,
                parent: record.parent_code.clone(),
            };
            if regions.insert(code.clone(), region).is_some() {
                return Err(DisaggError::MalformedHierarchy(format!(
                    "区域编码重复: {}",
                    code
                )));
            }
        }

        // 2. 校验根唯一、父存在且恰好粗一级
        let mut root: Option<String> = None;
        let mut children: HashMap<String, Vec<String>> = HashMap::new();

        for region in regions.values() {
            match &region.parent {
                None => {
                    if region.level != RegionLevel::Country {
                        return Err(DisaggError::MalformedHierarchy(format!(
                            "非 Country 层级区域 {} 无父区域",
                            region.code
                        )));
                    }
                    if let Some(existing) = &root {
                        return Err(DisaggError::MalformedHierarchy(format!(
                            "存在多个根区域: {} 与 {}",
                            existing, region.code
                        )));
                    }
                    root = Some(region.code.clone());
                }
                Some(parent_code) => {
                    let parent = regions.get(parent_code).ok_or_else(|| {
                        DisaggError::MalformedHierarchy(format!(
                            "区域 {} 的父区域 {} 不存在",
                            region.code, parent_code
                        ))
                    })?;
                    if region.level.parent_level() != Some(parent.level) {
                        return Err(DisaggError::MalformedHierarchy(format!(
                            "区域 {} ({}) 的父区域 {} ({}) 层级不是恰好粗一级",
                            region.code, region.level, parent.code, parent.level
                        )));
                    }
                    children
                        .entry(parent_code.clone())
                        .or_default()
                        .push(region.code.clone());
                }
            }
        }

        let root = root.ok_or_else(|| {
            DisaggError::MalformedHierarchy("层级表中没有根区域".to_string())
        })?;

        // 3. 子列表按编码稳定排序，保证遍历确定性
        for list in children.values_mut() {
            list.sort();
        }

        info!(
            regions = regions.len(),
            root = %root,
            "区域层级树加载完成"
        );

        Ok(Self {
            regions,
            children,
            root,
        })
    }

    /// 按编码解析区域
    ///
    /// # 错误
    /// - NotFound: 编码未注册
    pub fn resolve(&self, code: &str) -> DisaggResult<&Region> {
        self.regions
            .get(code)
            .ok_or_else(|| DisaggError::not_found("region", code))
    }

    /// 直接子区域（按编码升序）
    pub fn children(&self, code: &str) -> DisaggResult<Vec<&Region>> {
        self.resolve(code)?;
        let codes = self.children.get(code).map(|v| v.as_slice()).unwrap_or(&[]);
        // 子编码来自构造期校验过的表，缺失即内部缺陷
        codes.iter().map(|c| self.resolve(c)).collect()
    }

    /// 指定层级的全部后代（按编码升序）
    ///
    /// # 错误
    /// - InvalidLevel: 请求层级不严格细于该区域自身层级
    pub fn descendants_at_level(
        &self,
        code: &str,
        level: RegionLevel,
    ) -> DisaggResult<Vec<&Region>> {
        let region = self.resolve(code)?;
        if level <= region.level {
            return Err(DisaggError::InvalidLevel {
                region: region.code.clone(),
                region_level: region.level,
                requested: level,
            });
        }

        // 显式工作栈逐层下探，深度由构造期校验保证有界
        let mut result: Vec<&Region> = Vec::new();
        let mut stack: Vec<&str> = vec![code];
        while let Some(current) = stack.pop() {
            for child in self.children(current)? {
                if child.level == level {
                    result.push(child);
                } else if child.level < level {
                    stack.push(&child.code);
                }
            }
        }
        result.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(result)
    }

    /// 指定层级的祖先区域
    ///
    /// # 错误
    /// - InvalidLevel: 请求层级不严格粗于该区域自身层级
    /// - NotFound: 祖先链在到达目标层级前中断（构造期校验后不应出现）
    pub fn ancestor_at_level(&self, code: &str, level: RegionLevel) -> DisaggResult<&Region> {
        let region = self.resolve(code)?;
        if level >= region.level {
            return Err(DisaggError::InvalidLevel {
                region: region.code.clone(),
                region_level: region.level,
                requested: level,
            });
        }

        let mut current = region;
        while current.level > level {
            let parent_code = current
                .parent
                .as_deref()
                .ok_or_else(|| DisaggError::not_found("ancestor", code))?;
            current = self.resolve(parent_code)?;
        }
        Ok(current)
    }

    /// 根区域
    pub fn root(&self) -> &Region {
        // 根编码在构造期校验存在
        &self.regions[&self.root]
    }

    /// 区域总数
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
