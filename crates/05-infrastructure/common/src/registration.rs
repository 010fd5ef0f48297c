//! 注册策略定义
//!
//! 当服务类型已经存在注册项时，决定服务集合如何变更

use serde::{Deserialize, Serialize};

/// 替换行为
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplacementBehavior {
    /// 逐个服务类型替换：添加前移除该服务类型的全部注册项
    ServiceType,
    /// 移除实现类型相同的全部注册项
    ImplementationType,
    /// 移除选择单元内所有服务类型的注册项，以及实现类型相同的注册项
    All,
}

/// 注册策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStrategy {
    /// 总是追加新的注册项
    #[default]
    Append,
    /// 服务类型已有注册项时跳过（与实现类型无关）
    Skip,
    /// 先移除已有注册项再添加
    Replace(ReplacementBehavior),
    /// 服务类型已有注册项时报错
    Reject,
}

impl RegistrationStrategy {
    /// 逐个服务类型替换
    pub fn replace_service_type() -> Self {
        Self::Replace(ReplacementBehavior::ServiceType)
    }

    /// 替换实现类型映射到的全部服务类型
    pub fn replace_all() -> Self {
        Self::Replace(ReplacementBehavior::All)
    }
}
