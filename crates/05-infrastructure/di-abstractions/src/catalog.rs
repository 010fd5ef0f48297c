//! 类型目录抽象接口
//!
//! 查询程序集中声明的类型，承担运行时反射的职责

use infrastructure_common::{AssemblyDescriptor, ScanResult, TypeInfo};
use std::sync::Arc;

/// 类型目录 trait
///
/// 可以由构建期生成的注册表、清单文件或任何其他元数据来源实现。
pub trait TypeCatalog: Send + Sync {
    /// 按名称加载程序集
    ///
    /// 无法加载时返回 `ScanError::AssemblyLoadFailure`。
    fn load_assembly(&self, name: &str) -> ScanResult<Arc<AssemblyDescriptor>>;

    /// 入口程序集名称
    fn entry_assembly(&self) -> Option<String> {
        None
    }

    /// 应用依赖的全部程序集名称
    fn application_assemblies(&self) -> ScanResult<Vec<String>>;

    /// 加载类型所在的程序集
    fn assembly_of(&self, type_info: &TypeInfo) -> ScanResult<Arc<AssemblyDescriptor>> {
        self.load_assembly(&type_info.assembly)
    }
}
