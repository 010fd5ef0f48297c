//! 选择单元与扫描计划
//!
//! 扫描各阶段通过转移 [`ScanPlan`] 的所有权来累积选择单元

use crate::registrar::{PopulateReport, Registrar};
use di_abstractions::{ServiceCollection, TypeCatalog};
use infrastructure_common::{
    Lifetime, RegistrationStrategy, ScanError, ScanOptions, ScanResult, TypeInfo,
};

/// 选择单元
///
/// 一个实现类型到一组服务类型的映射，附带生命周期和注册策略。
/// 服务类型至少一个，按首次出现顺序去重。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionUnit {
    implementation_type: TypeInfo,
    service_types: Vec<TypeInfo>,
    lifetime: Lifetime,
    strategy: RegistrationStrategy,
}

impl SelectionUnit {
    /// 创建新的选择单元
    pub fn new(
        implementation_type: TypeInfo,
        service_types: impl IntoIterator<Item = TypeInfo>,
        lifetime: Lifetime,
        strategy: RegistrationStrategy,
    ) -> ScanResult<Self> {
        let distinct = distinct(service_types);
        if distinct.is_empty() {
            return Err(ScanError::invalid_argument(
                "service_types",
                format!("实现类型 {} 至少需要一个服务类型", implementation_type),
            ));
        }

        Ok(Self {
            implementation_type,
            service_types: distinct,
            lifetime,
            strategy,
        })
    }

    /// 创建以实现类型本身为第一个服务类型的选择单元
    pub fn self_registration(
        implementation_type: TypeInfo,
        additional_service_types: impl IntoIterator<Item = TypeInfo>,
        lifetime: Lifetime,
        strategy: RegistrationStrategy,
    ) -> Self {
        let service_types = distinct(
            std::iter::once(implementation_type.clone()).chain(additional_service_types),
        );
        Self {
            implementation_type,
            service_types,
            lifetime,
            strategy,
        }
    }

    /// 实现类型
    pub fn implementation_type(&self) -> &TypeInfo {
        &self.implementation_type
    }

    /// 服务类型
    pub fn service_types(&self) -> &[TypeInfo] {
        &self.service_types
    }

    /// 生命周期
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    /// 注册策略
    pub fn strategy(&self) -> RegistrationStrategy {
        self.strategy
    }

    pub(crate) fn set_lifetime(&mut self, lifetime: Lifetime) {
        self.lifetime = lifetime;
    }

    pub(crate) fn set_strategy(&mut self, strategy: RegistrationStrategy) {
        self.strategy = strategy;
    }
}

fn distinct(service_types: impl IntoIterator<Item = TypeInfo>) -> Vec<TypeInfo> {
    let mut distinct: Vec<TypeInfo> = Vec::new();
    for service_type in service_types {
        if !distinct.contains(&service_type) {
            distinct.push(service_type);
        }
    }
    distinct
}

/// 扫描计划
///
/// 一次扫描调用中累积的全部选择单元，以及使用的类型目录和配置。
pub struct ScanPlan<'a> {
    catalog: &'a dyn TypeCatalog,
    options: ScanOptions,
    units: Vec<SelectionUnit>,
}

impl<'a> ScanPlan<'a> {
    /// 创建新的扫描计划
    pub fn new(catalog: &'a dyn TypeCatalog, options: ScanOptions) -> Self {
        Self {
            catalog,
            options,
            units: Vec::new(),
        }
    }

    /// 类型目录
    pub fn catalog(&self) -> &'a dyn TypeCatalog {
        self.catalog
    }

    /// 扫描配置
    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// 已累积的选择单元，按产生顺序
    pub fn units(&self) -> &[SelectionUnit] {
        &self.units
    }

    /// 取出全部选择单元
    pub fn into_units(self) -> Vec<SelectionUnit> {
        self.units
    }

    pub(crate) fn extend_units(&mut self, units: impl IntoIterator<Item = SelectionUnit>) {
        self.units.extend(units);
    }

    /// 将选择单元写入服务集合
    pub fn populate<S>(self, services: &mut S) -> ScanResult<PopulateReport>
    where
        S: ServiceCollection + ?Sized,
    {
        Registrar::new().populate(&self.units, services)
    }
}

impl std::fmt::Debug for ScanPlan<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanPlan")
            .field("options", &self.options)
            .field("units", &self.units)
            .field("catalog", &"<catalog>")
            .finish()
    }
}

/// 可以转换为扫描计划的扫描阶段
///
/// 尚未指定的步骤使用默认值补齐：未选择服务类型时注册为自身，
/// 未选择生命周期时使用默认生命周期。
pub trait IntoScanPlan<'a>: Sized {
    /// 转换为扫描计划
    fn into_plan(self) -> ScanPlan<'a>;

    /// 转换为扫描计划并写入服务集合
    fn populate<S>(self, services: &mut S) -> ScanResult<PopulateReport>
    where
        S: ServiceCollection + ?Sized,
    {
        self.into_plan().populate(services)
    }
}

impl<'a> IntoScanPlan<'a> for ScanPlan<'a> {
    fn into_plan(self) -> ScanPlan<'a> {
        self
    }
}
