//! 服务集合抽象接口

use infrastructure_common::{DependencyResult, ServiceDescriptor, TypeInfo};

/// 服务集合 trait
///
/// 按注册顺序保存服务描述符的有序列表，以服务类型为键。集合由调用方持有，
/// 扫描期间调用方需要保证独占访问。
pub trait ServiceCollection {
    /// 按注册顺序获取所有服务描述符
    fn descriptors(&self) -> &[ServiceDescriptor];

    /// 追加服务描述符
    fn add(&mut self, descriptor: ServiceDescriptor) -> DependencyResult<()>;

    /// 移除所有满足条件的服务描述符，返回移除数量
    fn remove_where(
        &mut self,
        predicate: &dyn Fn(&ServiceDescriptor) -> bool,
    ) -> DependencyResult<usize>;

    /// 注册项数量
    fn len(&self) -> usize {
        self.descriptors().len()
    }

    /// 是否为空
    fn is_empty(&self) -> bool {
        self.descriptors().is_empty()
    }

    /// 检查服务类型是否已有注册项
    fn contains_service(&self, service_type: &TypeInfo) -> bool {
        self.descriptors()
            .iter()
            .any(|d| &d.service_type == service_type)
    }

    /// 按注册顺序获取指定服务类型的全部注册项
    fn descriptors_for(&self, service_type: &TypeInfo) -> Vec<&ServiceDescriptor> {
        self.descriptors()
            .iter()
            .filter(|d| &d.service_type == service_type)
            .collect()
    }

    /// 解析单个服务时使用的实现类型（最后注册的生效）
    fn implementation_for(&self, service_type: &TypeInfo) -> Option<&TypeInfo> {
        self.descriptors()
            .iter()
            .rev()
            .find(|d| &d.service_type == service_type)
            .map(|d| &d.implementation_type)
    }
}

impl ServiceCollection for Vec<ServiceDescriptor> {
    fn descriptors(&self) -> &[ServiceDescriptor] {
        self.as_slice()
    }

    fn add(&mut self, descriptor: ServiceDescriptor) -> DependencyResult<()> {
        self.push(descriptor);
        Ok(())
    }

    fn remove_where(
        &mut self,
        predicate: &dyn Fn(&ServiceDescriptor) -> bool,
    ) -> DependencyResult<usize> {
        let before = self.len();
        self.retain(|d| !predicate(d));
        Ok(before - self.len())
    }
}
