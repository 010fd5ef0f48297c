//! 生命周期与注册策略选择

use crate::implementation::ImplementationTypeSelector;
use crate::unit::{IntoScanPlan, ScanPlan, SelectionUnit};
use infrastructure_common::{Lifetime, LifetimeConventions, RegistrationStrategy};
use tracing::debug;

/// 生命周期选择器
///
/// 只为待提交的选择单元标注生命周期和注册策略，不做任何过滤。
/// 标注完成后回到同一来源的 [`ImplementationTypeSelector`]。
#[derive(Debug)]
pub struct LifetimeSelector<'a> {
    source: ImplementationTypeSelector<'a>,
    pending: Vec<SelectionUnit>,
    strategy: Option<RegistrationStrategy>,
}

impl<'a> LifetimeSelector<'a> {
    pub(crate) fn new(source: ImplementationTypeSelector<'a>, pending: Vec<SelectionUnit>) -> Self {
        Self {
            source,
            pending,
            strategy: None,
        }
    }

    /// 待提交的选择单元
    pub fn pending(&self) -> &[SelectionUnit] {
        &self.pending
    }

    /// 覆盖待提交选择单元的注册策略
    pub fn using_registration_strategy(mut self, strategy: RegistrationStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// 使用指定生命周期
    pub fn with_lifetime(self, lifetime: Lifetime) -> ImplementationTypeSelector<'a> {
        self.commit(|_| lifetime)
    }

    /// 单例
    pub fn with_singleton_lifetime(self) -> ImplementationTypeSelector<'a> {
        self.with_lifetime(Lifetime::Singleton)
    }

    /// 作用域
    pub fn with_scoped_lifetime(self) -> ImplementationTypeSelector<'a> {
        self.with_lifetime(Lifetime::Scoped)
    }

    /// 瞬态
    pub fn with_transient_lifetime(self) -> ImplementationTypeSelector<'a> {
        self.with_lifetime(Lifetime::Transient)
    }

    /// 按名称约定确定生命周期，没有匹配的规则时使用默认生命周期
    pub fn with_conventional_lifetime(
        self,
        conventions: &LifetimeConventions,
    ) -> ImplementationTypeSelector<'a> {
        let default_lifetime = self.source.options().default_lifetime;
        self.commit(|unit| {
            conventions
                .lifetime_for(unit.implementation_type())
                .unwrap_or(default_lifetime)
        })
    }

    fn commit<F>(mut self, lifetime_for: F) -> ImplementationTypeSelector<'a>
    where
        F: Fn(&SelectionUnit) -> Lifetime,
    {
        for unit in &mut self.pending {
            let lifetime = lifetime_for(unit);
            unit.set_lifetime(lifetime);
            if let Some(strategy) = self.strategy {
                unit.set_strategy(strategy);
            }
            debug!(
                "选择单元 {} -> {:?}, 生命周期 {}, 策略 {:?}",
                unit.implementation_type(),
                unit.service_types(),
                unit.lifetime(),
                unit.strategy()
            );
        }
        self.source.commit(self.pending)
    }
}

impl<'a> IntoScanPlan<'a> for LifetimeSelector<'a> {
    /// 未指定生命周期时使用默认生命周期
    fn into_plan(self) -> ScanPlan<'a> {
        let lifetime = self.source.options().default_lifetime;
        self.with_lifetime(lifetime).into_plan()
    }
}
