//! 实现类型选择

use crate::filter::TypeFilter;
use crate::service_type::ServiceTypeSelector;
use crate::type_source::TypeSourceSelector;
use crate::unit::{IntoScanPlan, ScanPlan, SelectionUnit};
use infrastructure_common::{ScanOptions, ScanResult, TypeDescriptor};
use tracing::debug;

/// 实现类型选择器
///
/// 持有一个来源的候选类型，把其中可实例化的类筛选为实现类型。
/// 同一来源可以多次选择不同的类分组。
#[derive(Debug)]
pub struct ImplementationTypeSelector<'a> {
    plan: ScanPlan<'a>,
    types: Vec<TypeDescriptor>,
    selected: bool,
}

impl<'a> ImplementationTypeSelector<'a> {
    pub(crate) fn new(plan: ScanPlan<'a>, types: Vec<TypeDescriptor>) -> Self {
        Self {
            plan,
            types,
            selected: false,
        }
    }

    /// 当前来源的全部候选类型
    pub fn types(&self) -> &[TypeDescriptor] {
        &self.types
    }

    /// 使用默认类过滤选择实现类型
    ///
    /// 默认过滤只保留非抽象的类；`public_only` 开启时还要求类型公开。
    pub fn add_classes(self) -> ServiceTypeSelector<'a> {
        self.add_classes_where(|_| true)
    }

    /// 在默认类过滤之上附加自定义条件
    pub fn add_classes_where<F>(mut self, predicate: F) -> ServiceTypeSelector<'a>
    where
        F: Fn(&TypeDescriptor) -> bool,
    {
        let public_only = self.plan.options().public_only;
        let classes: Vec<TypeDescriptor> = self
            .types
            .iter()
            .filter(|t| t.is_concrete_class() && (t.is_public || !public_only))
            .filter(|t| predicate(*t))
            .cloned()
            .collect();

        debug!(
            "从 {} 个候选类型中选出 {} 个实现类型",
            self.types.len(),
            classes.len()
        );
        self.selected = true;
        ServiceTypeSelector::new(self, classes)
    }

    /// 在默认类过滤之上附加由过滤器描述的条件
    pub fn add_classes_with<F>(self, configure: F) -> ScanResult<ServiceTypeSelector<'a>>
    where
        F: FnOnce(TypeFilter) -> TypeFilter,
    {
        let filter = configure(TypeFilter::new()).validated()?;
        Ok(self.add_classes_where(|t| filter.matches(t)))
    }

    /// 结束当前来源，继续添加其他来源
    pub fn and(self) -> TypeSourceSelector<'a> {
        TypeSourceSelector::from_plan(self.into_plan())
    }

    pub(crate) fn options(&self) -> &ScanOptions {
        self.plan.options()
    }

    pub(crate) fn commit(mut self, units: Vec<SelectionUnit>) -> Self {
        self.plan.extend_units(units);
        self
    }
}

impl<'a> IntoScanPlan<'a> for ImplementationTypeSelector<'a> {
    /// 来源上从未选择过类时，按默认类过滤注册为自身
    fn into_plan(self) -> ScanPlan<'a> {
        if self.selected {
            self.plan
        } else {
            self.add_classes().into_plan()
        }
    }
}
