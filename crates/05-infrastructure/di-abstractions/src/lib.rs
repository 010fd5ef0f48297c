//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义约定扫描与外部世界之间的两个接缝。
//!
//! ## 核心接口
//!
//! - [`ServiceCollection`] - 由调用方持有的可变服务集合
//! - [`TypeCatalog`] - 类型元数据提供者，替代运行时反射

pub mod catalog;
pub mod collection;

pub use catalog::*;
pub use collection::*;
