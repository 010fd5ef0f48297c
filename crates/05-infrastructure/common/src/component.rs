//! 服务描述符定义
//!
//! 服务集合中的每一项注册

use crate::lifecycle::Lifetime;
use crate::metadata::TypeInfo;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 服务描述符
///
/// 以服务类型为键，记录实现类型和生命周期。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    /// 服务类型
    pub service_type: TypeInfo,
    /// 实现类型
    pub implementation_type: TypeInfo,
    /// 生命周期
    pub lifetime: Lifetime,
}

impl ServiceDescriptor {
    /// 创建新的服务描述符
    pub fn new(service_type: TypeInfo, implementation_type: TypeInfo, lifetime: Lifetime) -> Self {
        Self {
            service_type,
            implementation_type,
            lifetime,
        }
    }

    /// 单例服务描述符
    pub fn singleton(service_type: TypeInfo, implementation_type: TypeInfo) -> Self {
        Self::new(service_type, implementation_type, Lifetime::Singleton)
    }

    /// 作用域服务描述符
    pub fn scoped(service_type: TypeInfo, implementation_type: TypeInfo) -> Self {
        Self::new(service_type, implementation_type, Lifetime::Scoped)
    }

    /// 瞬时服务描述符
    pub fn transient(service_type: TypeInfo, implementation_type: TypeInfo) -> Self {
        Self::new(service_type, implementation_type, Lifetime::Transient)
    }

    /// 是否注册为自身
    pub fn is_self_registration(&self) -> bool {
        self.service_type == self.implementation_type
    }
}

impl fmt::Display for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} ({})",
            self.service_type, self.implementation_type, self.lifetime
        )
    }
}
