//! # Infrastructure Common
//!
//! 这个 crate 提供了约定式服务注册所需的公共类型与工具。
//!
//! ## 核心类型
//!
//! - [`TypeInfo`] / [`TypeDescriptor`] / [`AssemblyDescriptor`] - 类型目录的元数据
//! - [`ServiceDescriptor`] - 服务集合中的注册项
//! - [`Lifetime`] - 服务生命周期
//! - [`RegistrationStrategy`] - 注册冲突策略
//! - [`ScanOptions`] - 扫描配置
//!
//! ## 设计原则
//!
//! - 约定优于配置
//! - 元数据与运行时解耦，类型目录可以来自任意来源
//! - 错误显式返回，不在扫描阶段之间延迟

pub mod component;
pub mod configuration;
pub mod conventions;
pub mod errors;
pub mod lifecycle;
pub mod metadata;
pub mod registration;

pub use component::*;
pub use configuration::*;
pub use conventions::*;
pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
pub use registration::*;
