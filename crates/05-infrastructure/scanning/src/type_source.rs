//! 类型来源选择
//!
//! 从显式类型列表、程序集或标记类型所在的程序集收集候选类型

use crate::implementation::ImplementationTypeSelector;
use crate::service_type::ServiceTypeSelector;
use crate::unit::{IntoScanPlan, ScanPlan};
use di_abstractions::TypeCatalog;
use infrastructure_common::{
    AssemblyDescriptor, AssemblyLoadPolicy, ScanError, ScanOptions, ScanResult, TypeDescriptor,
    TypeInfo,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 类型来源选择器
///
/// 扫描的起点。每个 `from_*` 方法加载一组候选类型，
/// 返回作用于这组类型的 [`ImplementationTypeSelector`]。
#[derive(Debug)]
pub struct TypeSourceSelector<'a> {
    plan: ScanPlan<'a>,
}

impl<'a> TypeSourceSelector<'a> {
    /// 使用默认配置创建选择器
    pub fn new(catalog: &'a dyn TypeCatalog) -> Self {
        Self::with_options(catalog, ScanOptions::default())
    }

    /// 使用指定配置创建选择器
    pub fn with_options(catalog: &'a dyn TypeCatalog, options: ScanOptions) -> Self {
        Self::from_plan(ScanPlan::new(catalog, options))
    }

    pub(crate) fn from_plan(plan: ScanPlan<'a>) -> Self {
        Self { plan }
    }

    /// 扫描配置
    pub fn options(&self) -> &ScanOptions {
        self.plan.options()
    }

    /// 从显式类型列表选择
    pub fn from_types(
        self,
        types: impl IntoIterator<Item = TypeDescriptor>,
    ) -> ScanResult<ImplementationTypeSelector<'a>> {
        let types: Vec<TypeDescriptor> = types.into_iter().collect();
        if types.is_empty() {
            return Err(ScanError::invalid_argument("types", "类型列表不能为空"));
        }
        debug!("从显式列表添加 {} 个候选类型", types.len());
        Ok(ImplementationTypeSelector::new(self.plan, types))
    }

    /// 添加显式类型并立即应用默认类过滤
    pub fn add_types(
        self,
        types: impl IntoIterator<Item = TypeDescriptor>,
    ) -> ScanResult<ServiceTypeSelector<'a>> {
        Ok(self.from_types(types)?.add_classes())
    }

    /// 从指定程序集选择
    ///
    /// 显式指定的程序集无法加载时直接返回错误。
    pub fn from_assemblies<I, S>(self, names: I) -> ScanResult<ImplementationTypeSelector<'a>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = names.into_iter().map(|n| n.as_ref().to_string()).collect();
        if names.is_empty() {
            return Err(ScanError::invalid_argument("assemblies", "程序集列表不能为空"));
        }

        let catalog = self.plan.catalog();
        let assemblies = names
            .iter()
            .map(|name| catalog.load_assembly(name))
            .collect::<ScanResult<Vec<_>>>()?;
        Ok(self.select_loaded(assemblies))
    }

    /// 从标记类型所在的程序集选择
    pub fn from_assembly_of(self, marker: &TypeInfo) -> ScanResult<ImplementationTypeSelector<'a>> {
        self.from_assemblies_of([marker.clone()])
    }

    /// 从类型 `T` 所在的程序集选择
    pub fn from_assembly_of_type<T: ?Sized + 'static>(
        self,
    ) -> ScanResult<ImplementationTypeSelector<'a>> {
        self.from_assembly_of(&TypeInfo::of_trait::<T>())
    }

    /// 从多个标记类型所在的程序集选择
    pub fn from_assemblies_of(
        self,
        markers: impl IntoIterator<Item = TypeInfo>,
    ) -> ScanResult<ImplementationTypeSelector<'a>> {
        let markers: Vec<TypeInfo> = markers.into_iter().collect();
        if markers.is_empty() {
            return Err(ScanError::invalid_argument("types", "标记类型列表不能为空"));
        }

        let catalog = self.plan.catalog();
        let assemblies = markers
            .iter()
            .map(|marker| catalog.assembly_of(marker))
            .collect::<ScanResult<Vec<_>>>()?;
        Ok(self.select_loaded(assemblies))
    }

    /// 从程序集及其直接引用的程序集选择
    ///
    /// 引用的程序集无法加载时按 [`AssemblyLoadPolicy`] 处理。
    pub fn from_assembly_dependencies(
        self,
        name: &str,
    ) -> ScanResult<ImplementationTypeSelector<'a>> {
        let root = self.plan.catalog().load_assembly(name)?;
        let mut assemblies = vec![root.clone()];
        for reference in &root.references {
            if let Some(assembly) = self.load_with_policy(reference)? {
                assemblies.push(assembly);
            }
        }
        Ok(self.select_loaded(assemblies))
    }

    /// 从入口程序集选择
    pub fn from_entry_assembly(self) -> ScanResult<ImplementationTypeSelector<'a>> {
        let entry = self.entry_assembly()?;
        self.from_assemblies([entry])
    }

    /// 从应用依赖的全部程序集中选择满足条件的程序集
    ///
    /// 类型目录无法列出应用依赖，或列出的依赖为空时，
    /// 退回到入口程序集及其引用的程序集。
    pub fn from_application_dependencies<F>(
        self,
        predicate: F,
    ) -> ScanResult<ImplementationTypeSelector<'a>>
    where
        F: Fn(&AssemblyDescriptor) -> bool,
    {
        match self.plan.catalog().application_assemblies() {
            Ok(names) if !names.is_empty() => self.from_dependency_context(names, predicate),
            Ok(_) => {
                warn!("应用依赖列表为空，退回到入口程序集的依赖");
                let entry = self.entry_assembly()?;
                self.from_assembly_dependencies(&entry)
            }
            Err(e) => {
                warn!("无法列出应用依赖，退回到入口程序集的依赖: {}", e);
                let entry = self.entry_assembly()?;
                self.from_assembly_dependencies(&entry)
            }
        }
    }

    /// 从给定的依赖上下文中选择满足条件的程序集
    ///
    /// 依赖上下文是调用方提供的程序集名称列表，
    /// 无法加载的程序集按 [`AssemblyLoadPolicy`] 处理，加载后再应用过滤条件。
    pub fn from_dependency_context<I, S, F>(
        self,
        names: I,
        predicate: F,
    ) -> ScanResult<ImplementationTypeSelector<'a>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&AssemblyDescriptor) -> bool,
    {
        let names: Vec<S> = names.into_iter().collect();
        if names.is_empty() {
            return Err(ScanError::invalid_argument("dependency_context", "依赖上下文不能为空"));
        }

        let mut assemblies = Vec::new();
        for name in &names {
            if let Some(assembly) = self.load_with_policy(name.as_ref())? {
                if predicate(&assembly) {
                    assemblies.push(assembly);
                } else {
                    debug!("程序集 {} 不满足过滤条件", assembly.name);
                }
            }
        }
        Ok(self.select_loaded(assemblies))
    }

    fn entry_assembly(&self) -> ScanResult<String> {
        self.plan
            .catalog()
            .entry_assembly()
            .ok_or_else(|| ScanError::assembly_load_failure("<entry>", "类型目录没有入口程序集"))
    }

    fn load_with_policy(&self, name: &str) -> ScanResult<Option<Arc<AssemblyDescriptor>>> {
        match self.plan.catalog().load_assembly(name) {
            Ok(assembly) => Ok(Some(assembly)),
            Err(e) => match self.plan.options().assembly_load_policy {
                AssemblyLoadPolicy::BestEffort => {
                    warn!("跳过无法加载的程序集 {}: {}", name, e);
                    Ok(None)
                }
                AssemblyLoadPolicy::FailFast => Err(e),
            },
        }
    }

    /// 按名称去重后收集程序集中定义的全部类型
    fn select_loaded(
        self,
        assemblies: Vec<Arc<AssemblyDescriptor>>,
    ) -> ImplementationTypeSelector<'a> {
        let mut seen = HashSet::new();
        let mut types = Vec::new();
        for assembly in assemblies {
            if !seen.insert(assembly.name.clone()) {
                continue;
            }
            debug!("扫描程序集 {} ({} 个类型)", assembly.name, assembly.types.len());
            types.extend(assembly.types.iter().cloned());
        }
        info!("从 {} 个程序集收集到 {} 个候选类型", seen.len(), types.len());
        ImplementationTypeSelector::new(self.plan, types)
    }
}

impl<'a> IntoScanPlan<'a> for TypeSourceSelector<'a> {
    fn into_plan(self) -> ScanPlan<'a> {
        self.plan
    }
}
