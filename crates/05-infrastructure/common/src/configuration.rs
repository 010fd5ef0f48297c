//! 扫描配置
//!
//! 扫描默认值与各类策略，可通过 `config` crate 从配置文件绑定

use crate::conventions::InterfaceNamingConvention;
use crate::errors::{ConfigError, ConfigResult};
use crate::lifecycle::Lifetime;
use crate::registration::RegistrationStrategy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// 配置文件中扫描配置所在的节
pub const DEFAULT_SECTION: &str = "scanning";

/// 约定未匹配到任何服务类型时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedServicePolicy {
    /// 丢弃该实现类型
    #[default]
    Skip,
    /// 注册为实现类型本身
    RegisterSelf,
    /// 报告约定匹配错误
    Fail,
}

/// 约定匹配到多个服务类型时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityPolicy {
    /// 注册所有匹配的服务类型
    #[default]
    RegisterAll,
    /// 只取声明顺序中的第一个
    FirstDeclared,
    /// 报告约定匹配错误
    Fail,
}

/// 遍历依赖程序集时加载失败的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssemblyLoadPolicy {
    /// 跳过无法加载的依赖并记录警告
    #[default]
    BestEffort,
    /// 立即返回加载错误
    FailFast,
}

/// 扫描配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// 默认生命周期
    pub default_lifetime: Lifetime,
    /// 默认注册策略
    pub default_strategy: RegistrationStrategy,
    /// 默认类过滤是否只包含公开类型
    pub public_only: bool,
    /// 未匹配处理策略
    pub unmatched_service_policy: UnmatchedServicePolicy,
    /// 多重匹配处理策略
    pub ambiguity_policy: AmbiguityPolicy,
    /// 依赖程序集加载失败处理策略
    pub assembly_load_policy: AssemblyLoadPolicy,
    /// 接口命名约定
    pub interface_naming: InterfaceNamingConvention,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            default_lifetime: Lifetime::Transient,
            default_strategy: RegistrationStrategy::Append,
            public_only: true,
            unmatched_service_policy: UnmatchedServicePolicy::Skip,
            ambiguity_policy: AmbiguityPolicy::RegisterAll,
            assembly_load_policy: AssemblyLoadPolicy::BestEffort,
            interface_naming: InterfaceNamingConvention::default(),
        }
    }
}

impl ScanOptions {
    /// 设置默认生命周期
    pub fn with_default_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.default_lifetime = lifetime;
        self
    }

    /// 设置默认注册策略
    pub fn with_default_strategy(mut self, strategy: RegistrationStrategy) -> Self {
        self.default_strategy = strategy;
        self
    }

    /// 设置是否只包含公开类型
    pub fn with_public_only(mut self, public_only: bool) -> Self {
        self.public_only = public_only;
        self
    }

    /// 设置未匹配处理策略
    pub fn with_unmatched_service_policy(mut self, policy: UnmatchedServicePolicy) -> Self {
        self.unmatched_service_policy = policy;
        self
    }

    /// 设置多重匹配处理策略
    pub fn with_ambiguity_policy(mut self, policy: AmbiguityPolicy) -> Self {
        self.ambiguity_policy = policy;
        self
    }

    /// 设置依赖程序集加载失败处理策略
    pub fn with_assembly_load_policy(mut self, policy: AssemblyLoadPolicy) -> Self {
        self.assembly_load_policy = policy;
        self
    }

    /// 设置接口命名约定
    pub fn with_interface_naming(mut self, naming: InterfaceNamingConvention) -> Self {
        self.interface_naming = naming;
        self
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.interface_naming.prefix.is_empty() && self.interface_naming.suffix.is_empty() {
            return Err(ConfigError::ValidationError {
                message: "接口命名约定的前缀和后缀不能同时为空".to_string(),
            });
        }
        Ok(())
    }

    /// 从已构建的配置中绑定指定节，节不存在时使用默认值
    pub fn from_config(config: &config::Config, section: &str) -> ConfigResult<Self> {
        let options = match config.get::<ScanOptions>(section) {
            Ok(options) => options,
            Err(config::ConfigError::NotFound(_)) => {
                debug!("配置节 {} 不存在，使用默认扫描配置", section);
                Self::default()
            }
            Err(e) => return Err(e.into()),
        };

        options.validate()?;
        Ok(options)
    }

    /// 从配置文件加载，格式由扩展名决定
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        debug!("加载扫描配置文件: {}", path.display());
        let config = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?;

        Self::from_config(&config, DEFAULT_SECTION)
    }
}
