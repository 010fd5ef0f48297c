//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },

    #[error("配置序列化失败: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },
}

impl From<config::ConfigError> for ConfigError {
    fn from(source: config::ConfigError) -> Self {
        Self::ParseError {
            source: Box::new(source),
        }
    }
}

/// 服务集合变更错误类型
///
/// 由服务集合的实现返回，注册器原样向调用方传递。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DependencyError {
    #[error("服务集合为只读，无法修改")]
    ReadOnlyCollection,

    #[error("服务类型已注册: {service_type}, 拒绝注册实现 {implementation_type}")]
    DuplicateRegistration {
        service_type: String,
        implementation_type: String,
    },

    #[error("组件注册失败: {type_name}, 原因: {message}")]
    RegistrationError { type_name: String, message: String },
}

/// 扫描错误类型
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("参数无效: {parameter}, 原因: {message}")]
    InvalidArgument {
        parameter: &'static str,
        message: String,
    },

    #[error("程序集加载失败: {assembly}, 原因: {message}")]
    AssemblyLoadFailure { assembly: String, message: String },

    #[error("约定匹配不明确: {implementation_type}, 候选服务类型: {candidates:?}")]
    AmbiguousConvention {
        implementation_type: String,
        candidates: Vec<String>,
    },

    #[error("类型 {implementation_type} 无法赋值给服务类型 {service_type}")]
    NotAssignable {
        implementation_type: String,
        service_type: String,
    },

    #[error("服务注册失败: {source}")]
    Registration {
        #[from]
        source: DependencyError,
    },
}

impl ScanError {
    /// 创建参数无效错误
    pub fn invalid_argument(parameter: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            parameter,
            message: message.into(),
        }
    }

    /// 创建程序集加载失败错误
    pub fn assembly_load_failure(assembly: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AssemblyLoadFailure {
            assembly: assembly.into(),
            message: message.into(),
        }
    }
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type ScanResult<T> = Result<T, ScanError>;
