//! 服务类型选择
//!
//! 把每个实现类型映射到一个或多个服务类型

use crate::implementation::ImplementationTypeSelector;
use crate::lifetime::LifetimeSelector;
use crate::unit::{IntoScanPlan, ScanPlan, SelectionUnit};
use infrastructure_common::{
    AmbiguityPolicy, RegistrationStrategy, ScanError, ScanResult, TypeDescriptor, TypeInfo,
    UnmatchedServicePolicy,
};
use std::collections::HashSet;
use tracing::debug;

/// 服务类型选择器
#[derive(Debug)]
pub struct ServiceTypeSelector<'a> {
    source: ImplementationTypeSelector<'a>,
    classes: Vec<TypeDescriptor>,
    strategy: Option<RegistrationStrategy>,
}

impl<'a> ServiceTypeSelector<'a> {
    pub(crate) fn new(
        source: ImplementationTypeSelector<'a>,
        classes: Vec<TypeDescriptor>,
    ) -> Self {
        Self {
            source,
            classes,
            strategy: None,
        }
    }

    /// 选中的实现类型
    pub fn classes(&self) -> &[TypeDescriptor] {
        &self.classes
    }

    /// 设置本选择器产生的选择单元使用的注册策略
    pub fn using_registration_strategy(mut self, strategy: RegistrationStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// 注册为实现类型本身
    pub fn as_self(self) -> LifetimeSelector<'a> {
        self.map_infallible(|_| Vec::new())
    }

    /// 注册为实现类型本身以及实现的全部接口
    pub fn as_self_with_interfaces(self) -> LifetimeSelector<'a> {
        self.map_infallible(|class| class.interfaces.clone())
    }

    /// 注册为实现的全部接口
    pub fn as_implemented_interfaces(self) -> ScanResult<LifetimeSelector<'a>> {
        self.map_classes(|class| Ok(class.interfaces.clone()))
    }

    /// 注册为按命名约定匹配的接口，例如 `Foo` 对应 `IFoo`
    pub fn as_matching_interface(self) -> ScanResult<LifetimeSelector<'a>> {
        let naming = self.source.options().interface_naming.clone();
        let ambiguity = self.source.options().ambiguity_policy;

        self.map_classes(|class| {
            let matched: Vec<TypeInfo> = class
                .interfaces
                .iter()
                .filter(|i| naming.matches(&class.type_info, i))
                .cloned()
                .collect();

            if matched.len() <= 1 {
                return Ok(matched);
            }
            match ambiguity {
                AmbiguityPolicy::RegisterAll => Ok(matched),
                AmbiguityPolicy::FirstDeclared => {
                    debug!(
                        "实现 {} 匹配到 {} 个接口，取第一个 {}",
                        class.type_info,
                        matched.len(),
                        matched[0]
                    );
                    Ok(matched.into_iter().take(1).collect())
                }
                AmbiguityPolicy::Fail => Err(ScanError::AmbiguousConvention {
                    implementation_type: class.type_info.full_name(),
                    candidates: matched.iter().map(TypeInfo::full_name).collect(),
                }),
            }
        })
    }

    /// 注册为显式指定的服务类型
    ///
    /// 每个实现类型都必须可以赋值给所有指定的服务类型。
    pub fn as_types(
        self,
        service_types: impl IntoIterator<Item = TypeInfo>,
    ) -> ScanResult<LifetimeSelector<'a>> {
        let service_types: Vec<TypeInfo> = service_types.into_iter().collect();
        if service_types.is_empty() {
            return Err(ScanError::invalid_argument("types", "服务类型列表不能为空"));
        }

        self.map_classes(|class| {
            if let Some(service_type) = service_types.iter().find(|s| !class.is_assignable_to(s)) {
                return Err(ScanError::NotAssignable {
                    implementation_type: class.type_info.full_name(),
                    service_type: service_type.full_name(),
                });
            }
            Ok(service_types.clone())
        })
    }

    /// 注册为 `T`
    pub fn as_type<T: ?Sized + 'static>(self) -> ScanResult<LifetimeSelector<'a>> {
        self.as_types([TypeInfo::of_trait::<T>()])
    }

    /// 注册为最近的基类
    pub fn as_base_class(self) -> ScanResult<LifetimeSelector<'a>> {
        self.map_classes(|class| Ok(class.base_class().cloned().into_iter().collect()))
    }

    /// 注册为调用方计算的服务类型
    pub fn as_with<F>(self, selector: F) -> ScanResult<LifetimeSelector<'a>>
    where
        F: Fn(&TypeDescriptor) -> Vec<TypeInfo>,
    {
        self.map_classes(|class| Ok(selector(class)))
    }

    /// 按实现类型上声明的服务注解注册
    ///
    /// 每个注解产生一个选择单元；没有注解的实现类型被忽略。
    pub fn using_attributes(self) -> ScanResult<ImplementationTypeSelector<'a>> {
        let options = self.source.options();
        let strategy = self.strategy.unwrap_or(options.default_strategy);
        let default_lifetime = options.default_lifetime;

        let mut units = Vec::new();
        for class in &self.classes {
            let mut seen = HashSet::new();
            for attribute in &class.service_attributes {
                let service_type = attribute
                    .service_type
                    .clone()
                    .unwrap_or_else(|| class.type_info.clone());

                if !seen.insert(service_type.clone()) {
                    return Err(ScanError::invalid_argument(
                        "service_attributes",
                        format!(
                            "类型 {} 对服务类型 {} 声明了多个服务注解",
                            class.type_info, service_type
                        ),
                    ));
                }
                if !class.is_assignable_to(&service_type) {
                    return Err(ScanError::NotAssignable {
                        implementation_type: class.type_info.full_name(),
                        service_type: service_type.full_name(),
                    });
                }

                units.push(SelectionUnit::new(
                    class.type_info.clone(),
                    [service_type],
                    attribute.lifetime.unwrap_or(default_lifetime),
                    strategy,
                )?);
            }
        }

        debug!("按服务注解产生 {} 个选择单元", units.len());
        Ok(self.source.commit(units))
    }

    fn map_infallible<F>(self, additional: F) -> LifetimeSelector<'a>
    where
        F: Fn(&TypeDescriptor) -> Vec<TypeInfo>,
    {
        let options = self.source.options();
        let strategy = self.strategy.unwrap_or(options.default_strategy);
        let lifetime = options.default_lifetime;

        let pending = self
            .classes
            .iter()
            .map(|class| {
                SelectionUnit::self_registration(
                    class.type_info.clone(),
                    additional(class),
                    lifetime,
                    strategy,
                )
            })
            .collect();
        LifetimeSelector::new(self.source, pending)
    }

    /// 逐个实现类型计算服务类型，没有服务类型时按未匹配策略处理
    fn map_classes<F>(self, mut service_types_for: F) -> ScanResult<LifetimeSelector<'a>>
    where
        F: FnMut(&TypeDescriptor) -> ScanResult<Vec<TypeInfo>>,
    {
        let options = self.source.options();
        let strategy = self.strategy.unwrap_or(options.default_strategy);
        let lifetime = options.default_lifetime;
        let unmatched = options.unmatched_service_policy;

        let mut pending = Vec::with_capacity(self.classes.len());
        for class in &self.classes {
            let service_types = service_types_for(class)?;
            if !service_types.is_empty() {
                pending.push(SelectionUnit::new(
                    class.type_info.clone(),
                    service_types,
                    lifetime,
                    strategy,
                )?);
                continue;
            }

            match unmatched {
                UnmatchedServicePolicy::Skip => {
                    debug!("实现 {} 没有匹配的服务类型，已忽略", class.type_info);
                }
                UnmatchedServicePolicy::RegisterSelf => {
                    debug!("实现 {} 没有匹配的服务类型，注册为自身", class.type_info);
                    pending.push(SelectionUnit::self_registration(
                        class.type_info.clone(),
                        Vec::new(),
                        lifetime,
                        strategy,
                    ));
                }
                UnmatchedServicePolicy::Fail => {
                    return Err(ScanError::AmbiguousConvention {
                        implementation_type: class.type_info.full_name(),
                        candidates: Vec::new(),
                    });
                }
            }
        }

        Ok(LifetimeSelector::new(self.source, pending))
    }
}

impl<'a> IntoScanPlan<'a> for ServiceTypeSelector<'a> {
    /// 未指定映射时注册为自身
    fn into_plan(self) -> ScanPlan<'a> {
        self.as_self().into_plan()
    }
}
