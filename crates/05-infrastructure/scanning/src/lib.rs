//! # DI Scanning
//!
//! 约定式服务扫描：从类型目录中选出实现类型，按约定映射到服务类型，
//! 并按生命周期和注册策略写入服务集合。
//!
//! ## 扫描阶段
//!
//! 每个阶段消耗自身并返回下一阶段，选择单元随扫描计划的所有权一路传递：
//!
//! 1. [`TypeSourceSelector`] - 收集候选类型
//! 2. [`ImplementationTypeSelector`] - 筛选实现类型
//! 3. [`ServiceTypeSelector`] - 映射服务类型
//! 4. [`LifetimeSelector`] - 标注生命周期与注册策略
//! 5. [`Registrar`] - 写入服务集合
//!
//! ## 使用示例
//!
//! ```ignore
//! use di_scanning::ServiceCollectionExt;
//!
//! services.scan(&catalog, |source| {
//!     Ok(source
//!         .from_assembly_of_type::<EmailSender>()?
//!         .add_classes_with(|f| f.in_namespaces(["app::notifications"]))?
//!         .as_matching_interface()?
//!         .with_scoped_lifetime())
//! })?;
//! ```

pub mod filter;
pub mod implementation;
pub mod lifetime;
pub mod registrar;
pub mod scan;
pub mod service_type;
pub mod type_source;
pub mod unit;

pub use filter::TypeFilter;
pub use implementation::ImplementationTypeSelector;
pub use lifetime::LifetimeSelector;
pub use registrar::{PopulateReport, Registrar};
pub use scan::ServiceCollectionExt;
pub use service_type::ServiceTypeSelector;
pub use type_source::TypeSourceSelector;
pub use unit::{IntoScanPlan, ScanPlan, SelectionUnit};
