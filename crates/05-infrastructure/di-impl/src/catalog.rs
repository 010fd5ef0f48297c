//! 内存类型目录
//!
//! 通过构建器或 JSON 清单描述程序集及其类型

use di_abstractions::TypeCatalog;
use infrastructure_common::{AssemblyDescriptor, ConfigResult, ScanError, ScanResult};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// 类型目录清单
///
/// JSON 形式的类型目录描述。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogManifest {
    /// 入口程序集
    #[serde(default)]
    pub entry_assembly: Option<String>,
    /// 程序集列表
    #[serde(default)]
    pub assemblies: Vec<AssemblyDescriptor>,
    /// 无法加载的程序集名称
    #[serde(default)]
    pub unloadable: Vec<String>,
}

/// 内存中的类型目录实现
#[derive(Debug, Clone)]
pub struct InMemoryTypeCatalog {
    /// 按名称索引的程序集
    assemblies: HashMap<String, Arc<AssemblyDescriptor>>,
    /// 程序集添加顺序
    order: Vec<String>,
    /// 入口程序集
    entry_assembly: Option<String>,
    /// 加载时失败的程序集
    unloadable: HashSet<String>,
    /// 是否能够列出应用依赖
    application_listing: bool,
}

impl InMemoryTypeCatalog {
    /// 创建构建器
    pub fn builder() -> InMemoryTypeCatalogBuilder {
        InMemoryTypeCatalogBuilder::new()
    }

    /// 从清单创建类型目录
    pub fn from_manifest(manifest: CatalogManifest) -> Self {
        let mut builder = Self::builder();
        for assembly in manifest.assemblies {
            builder = builder.add_assembly(assembly);
        }
        for name in manifest.unloadable {
            builder = builder.unloadable(name);
        }
        if let Some(entry) = manifest.entry_assembly {
            builder = builder.entry_assembly(entry);
        }
        builder.build()
    }

    /// 从 JSON 清单创建类型目录
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let manifest: CatalogManifest = serde_json::from_str(json)?;
        Ok(Self::from_manifest(manifest))
    }

    /// 程序集数量
    pub fn assembly_count(&self) -> usize {
        self.order.len()
    }
}

impl TypeCatalog for InMemoryTypeCatalog {
    fn load_assembly(&self, name: &str) -> ScanResult<Arc<AssemblyDescriptor>> {
        if self.unloadable.contains(name) {
            return Err(ScanError::assembly_load_failure(name, "程序集无法加载"));
        }

        self.assemblies
            .get(name)
            .cloned()
            .ok_or_else(|| ScanError::assembly_load_failure(name, "程序集不存在于类型目录中"))
    }

    fn entry_assembly(&self) -> Option<String> {
        self.entry_assembly.clone()
    }

    fn application_assemblies(&self) -> ScanResult<Vec<String>> {
        if !self.application_listing {
            return Err(ScanError::assembly_load_failure(
                "<application>",
                "无法列出应用依赖",
            ));
        }
        Ok(self.order.clone())
    }
}

/// 内存类型目录构建器
#[derive(Debug, Default)]
pub struct InMemoryTypeCatalogBuilder {
    assemblies: Vec<AssemblyDescriptor>,
    entry_assembly: Option<String>,
    unloadable: HashSet<String>,
    without_listing: bool,
}

impl InMemoryTypeCatalogBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加程序集
    pub fn add_assembly(mut self, assembly: AssemblyDescriptor) -> Self {
        self.assemblies.push(assembly);
        self
    }

    /// 设置入口程序集
    pub fn entry_assembly(mut self, name: impl Into<String>) -> Self {
        self.entry_assembly = Some(name.into());
        self
    }

    /// 标记程序集在加载时失败
    pub fn unloadable(mut self, name: impl Into<String>) -> Self {
        self.unloadable.insert(name.into());
        self
    }

    /// 模拟无法列出应用依赖的目录
    pub fn without_application_listing(mut self) -> Self {
        self.without_listing = true;
        self
    }

    /// 构建类型目录
    ///
    /// 同名程序集以后添加的为准，顺序保持首次出现的位置。
    pub fn build(self) -> InMemoryTypeCatalog {
        let mut assemblies = HashMap::new();
        let mut order = Vec::new();

        for assembly in self.assemblies {
            if !assemblies.contains_key(&assembly.name) {
                order.push(assembly.name.clone());
            }
            debug!(
                "类型目录添加程序集: {} ({} 个类型)",
                assembly.name,
                assembly.types.len()
            );
            assemblies.insert(assembly.name.clone(), Arc::new(assembly));
        }

        info!("构建类型目录完成，共 {} 个程序集", order.len());

        InMemoryTypeCatalog {
            assemblies,
            order,
            entry_assembly: self.entry_assembly,
            unloadable: self.unloadable,
            application_listing: !self.without_listing,
        }
    }
}
