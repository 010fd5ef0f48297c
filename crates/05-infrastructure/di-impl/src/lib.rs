//! # 依赖注入具体实现
//!
//! 提供内存中的服务集合与类型目录实现

pub mod catalog;

pub use catalog::{CatalogManifest, InMemoryTypeCatalog, InMemoryTypeCatalogBuilder};

use di_abstractions::ServiceCollection;
use infrastructure_common::{DependencyError, DependencyResult, ServiceDescriptor};
use tracing::{debug, warn};

/// 具体的服务集合实现
///
/// 有序保存服务描述符；设置为只读后拒绝所有修改。
#[derive(Debug, Clone, Default)]
pub struct ServiceCollectionImpl {
    /// 服务描述符
    descriptors: Vec<ServiceDescriptor>,
    /// 是否只读
    read_only: bool,
}

impl ServiceCollectionImpl {
    /// 创建新的服务集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置为只读
    pub fn make_read_only(&mut self) {
        self.read_only = true;
    }

    /// 是否只读
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// 遍历服务描述符
    pub fn iter(&self) -> std::slice::Iter<'_, ServiceDescriptor> {
        self.descriptors.iter()
    }

    fn ensure_writable(&self) -> DependencyResult<()> {
        if self.read_only {
            warn!("尝试修改只读服务集合");
            return Err(DependencyError::ReadOnlyCollection);
        }
        Ok(())
    }
}

impl ServiceCollection for ServiceCollectionImpl {
    fn descriptors(&self) -> &[ServiceDescriptor] {
        &self.descriptors
    }

    fn add(&mut self, descriptor: ServiceDescriptor) -> DependencyResult<()> {
        self.ensure_writable()?;
        debug!("添加服务注册: {}", descriptor);
        self.descriptors.push(descriptor);
        Ok(())
    }

    fn remove_where(
        &mut self,
        predicate: &dyn Fn(&ServiceDescriptor) -> bool,
    ) -> DependencyResult<usize> {
        self.ensure_writable()?;
        let before = self.descriptors.len();
        self.descriptors.retain(|d| !predicate(d));
        Ok(before - self.descriptors.len())
    }
}

impl<'a> IntoIterator for &'a ServiceCollectionImpl {
    type Item = &'a ServiceDescriptor;
    type IntoIter = std::slice::Iter<'a, ServiceDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<Vec<ServiceDescriptor>> for ServiceCollectionImpl {
    fn from(descriptors: Vec<ServiceDescriptor>) -> Self {
        Self {
            descriptors,
            read_only: false,
        }
    }
}
