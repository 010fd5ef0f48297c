//! 注册器
//!
//! 按产生顺序把选择单元写入服务集合。写入不是事务性的：某次变更失败时，
//! 之前已经完成的变更保持不变，错误原样返回给调用方。

use crate::unit::SelectionUnit;
use di_abstractions::ServiceCollection;
use infrastructure_common::{
    DependencyError, RegistrationStrategy, ReplacementBehavior, ScanResult, ServiceDescriptor,
    TypeInfo,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// 写入结果统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopulateReport {
    /// 处理的选择单元数量
    pub units: usize,
    /// 新增的注册项数量
    pub added: usize,
    /// 因已存在而跳过的注册项数量
    pub skipped: usize,
    /// 被替换移除的注册项数量
    pub removed: usize,
}

/// 注册器
#[derive(Debug, Default)]
pub struct Registrar;

impl Registrar {
    /// 创建新的注册器
    pub fn new() -> Self {
        Self
    }

    /// 将选择单元写入服务集合
    pub fn populate<S>(
        &self,
        units: &[SelectionUnit],
        services: &mut S,
    ) -> ScanResult<PopulateReport>
    where
        S: ServiceCollection + ?Sized,
    {
        let replace_all_service_types = Self::collect_replace_all_service_types(units);
        let mut cleared_implementations: HashSet<&TypeInfo> = HashSet::new();
        let mut cleared_service_types: HashSet<&TypeInfo> = HashSet::new();
        let mut report = PopulateReport::default();

        for unit in units {
            match unit.strategy() {
                RegistrationStrategy::Append => {
                    for service_type in unit.service_types() {
                        Self::add(services, service_type, unit, &mut report)?;
                    }
                }
                RegistrationStrategy::Skip => {
                    for service_type in unit.service_types() {
                        if services.contains_service(service_type) {
                            debug!(
                                "服务类型 {} 已注册，跳过实现 {}",
                                service_type,
                                unit.implementation_type()
                            );
                            report.skipped += 1;
                        } else {
                            Self::add(services, service_type, unit, &mut report)?;
                        }
                    }
                }
                RegistrationStrategy::Reject => {
                    for service_type in unit.service_types() {
                        if services.contains_service(service_type) {
                            return Err(DependencyError::DuplicateRegistration {
                                service_type: service_type.full_name(),
                                implementation_type: unit.implementation_type().full_name(),
                            }
                            .into());
                        }
                        Self::add(services, service_type, unit, &mut report)?;
                    }
                }
                RegistrationStrategy::Replace(ReplacementBehavior::ServiceType) => {
                    for service_type in unit.service_types() {
                        report.removed += services.remove_where(&|d: &ServiceDescriptor| {
                            &d.service_type == service_type
                        })?;
                        Self::add(services, service_type, unit, &mut report)?;
                    }
                }
                RegistrationStrategy::Replace(behavior) => {
                    let implementation = unit.implementation_type();

                    // 实现类型首次出现时移除它已有的全部注册项
                    if cleared_implementations.insert(implementation) {
                        let removed = services.remove_where(&|d: &ServiceDescriptor| {
                            &d.implementation_type == implementation
                        })?;
                        debug!("替换实现 {}，移除 {} 个已有注册项", implementation, removed);
                        report.removed += removed;
                    }

                    // 首个 All 单元按全部 All 单元的服务类型清理一次，
                    // 本次调用中该实现刚添加的注册项保留
                    if behavior == ReplacementBehavior::All
                        && cleared_service_types.insert(implementation)
                    {
                        if let Some(service_types) = replace_all_service_types.get(implementation) {
                            let removed = services.remove_where(&|d: &ServiceDescriptor| {
                                service_types.contains(&d.service_type)
                                    && &d.implementation_type != implementation
                            })?;
                            debug!(
                                "替换实现 {} 的服务类型，移除 {} 个已有注册项",
                                implementation, removed
                            );
                            report.removed += removed;
                        }
                    }

                    for service_type in unit.service_types() {
                        Self::add(services, service_type, unit, &mut report)?;
                    }
                }
            }
            report.units += 1;
        }

        info!(
            "服务注册完成: {} 个选择单元, 新增 {}, 跳过 {}, 移除 {}",
            report.units, report.added, report.skipped, report.removed
        );
        Ok(report)
    }

    /// 按实现类型汇总 Replace(All) 单元映射到的全部服务类型
    fn collect_replace_all_service_types(
        units: &[SelectionUnit],
    ) -> HashMap<&TypeInfo, HashSet<&TypeInfo>> {
        let mut service_types: HashMap<&TypeInfo, HashSet<&TypeInfo>> = HashMap::new();
        for unit in units {
            if unit.strategy() == RegistrationStrategy::Replace(ReplacementBehavior::All) {
                service_types
                    .entry(unit.implementation_type())
                    .or_default()
                    .extend(unit.service_types());
            }
        }
        service_types
    }

    fn add<S>(
        services: &mut S,
        service_type: &TypeInfo,
        unit: &SelectionUnit,
        report: &mut PopulateReport,
    ) -> ScanResult<()>
    where
        S: ServiceCollection + ?Sized,
    {
        services.add(ServiceDescriptor::new(
            service_type.clone(),
            unit.implementation_type().clone(),
            unit.lifetime(),
        ))?;
        report.added += 1;
        Ok(())
    }
}
