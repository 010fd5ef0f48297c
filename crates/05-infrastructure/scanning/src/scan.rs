//! 扫描入口

use crate::registrar::PopulateReport;
use crate::type_source::TypeSourceSelector;
use crate::unit::IntoScanPlan;
use di_abstractions::{ServiceCollection, TypeCatalog};
use infrastructure_common::{ScanError, ScanOptions, ScanResult};
use tracing::info;

/// 为服务集合提供约定扫描
///
/// 配置闭包返回任意扫描阶段。扫描计划完整构建之后才会修改服务集合，
/// 所有参数错误都在修改之前返回。
pub trait ServiceCollectionExt: ServiceCollection {
    /// 使用默认配置扫描并注册
    fn scan<'a, F, P>(
        &mut self,
        catalog: &'a dyn TypeCatalog,
        configure: F,
    ) -> ScanResult<PopulateReport>
    where
        F: FnOnce(TypeSourceSelector<'a>) -> ScanResult<P>,
        P: IntoScanPlan<'a>,
    {
        self.scan_with_options(catalog, ScanOptions::default(), configure)
    }

    /// 使用指定配置扫描并注册
    fn scan_with_options<'a, F, P>(
        &mut self,
        catalog: &'a dyn TypeCatalog,
        options: ScanOptions,
        configure: F,
    ) -> ScanResult<PopulateReport>
    where
        F: FnOnce(TypeSourceSelector<'a>) -> ScanResult<P>,
        P: IntoScanPlan<'a>,
    {
        options
            .validate()
            .map_err(|e| ScanError::invalid_argument("options", e.to_string()))?;

        let plan = configure(TypeSourceSelector::with_options(catalog, options))?.into_plan();
        info!("扫描计划构建完成，共 {} 个选择单元", plan.units().len());
        plan.populate(self)
    }
}

impl<S: ServiceCollection + ?Sized> ServiceCollectionExt for S {}
