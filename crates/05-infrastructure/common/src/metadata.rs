//! 元数据定义
//!
//! 提供类型、程序集的元数据信息，作为约定扫描的输入

use crate::lifecycle::Lifetime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 类型信息
///
/// 一个类型的身份：命名空间、名称（可包含泛型参数）以及所属程序集。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeInfo {
    /// 命名空间（模块路径）
    #[serde(default)]
    pub namespace: String,
    /// 类型名称
    pub name: String,
    /// 所属程序集
    pub assembly: String,
}

impl TypeInfo {
    /// 创建新的类型信息
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        assembly: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            assembly: assembly.into(),
        }
    }

    /// 从类型获取类型信息
    ///
    /// 程序集取 crate 名称，即类型路径的第一段。
    pub fn of<T: 'static>() -> Self {
        Self::from_type_name(std::any::type_name::<T>())
    }

    /// 从 trait object 获取类型信息
    pub fn of_trait<T: ?Sized + 'static>() -> Self {
        Self::from_type_name(std::any::type_name::<T>())
    }

    /// 解析 `std::any::type_name` 形式的类型名称
    pub fn from_type_name(type_name: &str) -> Self {
        let type_name = type_name.strip_prefix("dyn ").unwrap_or(type_name);
        // `dyn a::Foo + core::marker::Send` 只保留主 trait
        let type_name = primary_bound(type_name);
        let path_end = type_name.find('<').unwrap_or(type_name.len());

        let (namespace, name) = match type_name[..path_end].rfind("::") {
            Some(idx) => (&type_name[..idx], &type_name[idx + 2..]),
            None => ("", type_name),
        };

        let assembly = namespace
            .split("::")
            .next()
            .filter(|segment| !segment.is_empty())
            .unwrap_or(name);

        Self::new(namespace, name, assembly)
    }

    /// 获取完整类型名称（包含命名空间）
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}::{}", self.namespace, self.name)
        }
    }

    /// 获取不含泛型参数的类型名称
    pub fn base_name(&self) -> &str {
        self.name.split('<').next().unwrap_or(&self.name)
    }

    /// 是否位于指定命名空间或其子命名空间中
    pub fn is_in_namespace(&self, namespace: &str) -> bool {
        self.namespace == namespace
            || self
                .namespace
                .strip_prefix(namespace)
                .is_some_and(|rest| rest.starts_with("::"))
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

/// 类型种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// 类
    #[default]
    Class,
    /// 接口（服务契约）
    Interface,
    /// 值类型
    ValueType,
}

/// 声明式服务注解
///
/// 对应实现类型上的服务描述标注，用于 `using_attributes` 注册。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServiceAttribute {
    /// 服务类型，缺省时注册为实现类型本身
    #[serde(default)]
    pub service_type: Option<TypeInfo>,
    /// 生命周期，缺省时使用扫描默认值
    #[serde(default)]
    pub lifetime: Option<Lifetime>,
}

impl ServiceAttribute {
    /// 以实现类型本身作为服务类型
    pub fn for_self() -> Self {
        Self::default()
    }

    /// 指定服务类型
    pub fn for_service(service_type: TypeInfo) -> Self {
        Self {
            service_type: Some(service_type),
            lifetime: None,
        }
    }

    /// 设置生命周期
    pub fn with_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.lifetime = Some(lifetime);
        self
    }
}

fn default_true() -> bool {
    true
}

/// 候选类型描述符
///
/// 由类型目录发现，发现后不再修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// 类型信息
    pub type_info: TypeInfo,
    /// 类型种类
    #[serde(default)]
    pub kind: TypeKind,
    /// 是否为抽象类型
    #[serde(default)]
    pub is_abstract: bool,
    /// 是否公开
    #[serde(default = "default_true")]
    pub is_public: bool,
    /// 实现的全部接口（已展开继承链）
    #[serde(default)]
    pub interfaces: Vec<TypeInfo>,
    /// 基类链，最近的基类在前
    #[serde(default)]
    pub base_types: Vec<TypeInfo>,
    /// 标记特性名称
    #[serde(default)]
    pub attributes: Vec<String>,
    /// 声明式服务注解
    #[serde(default)]
    pub service_attributes: Vec<ServiceAttribute>,
}

impl TypeDescriptor {
    fn with_kind(type_info: TypeInfo, kind: TypeKind) -> Self {
        Self {
            type_info,
            kind,
            is_abstract: false,
            is_public: true,
            interfaces: Vec::new(),
            base_types: Vec::new(),
            attributes: Vec::new(),
            service_attributes: Vec::new(),
        }
    }

    /// 创建类描述符
    pub fn class(type_info: TypeInfo) -> Self {
        Self::with_kind(type_info, TypeKind::Class)
    }

    /// 创建接口描述符
    pub fn interface(type_info: TypeInfo) -> Self {
        let mut descriptor = Self::with_kind(type_info, TypeKind::Interface);
        descriptor.is_abstract = true;
        descriptor
    }

    /// 创建值类型描述符
    pub fn value_type(type_info: TypeInfo) -> Self {
        Self::with_kind(type_info, TypeKind::ValueType)
    }

    /// 添加实现的接口
    pub fn with_interface(mut self, interface: TypeInfo) -> Self {
        if !self.interfaces.contains(&interface) {
            self.interfaces.push(interface);
        }
        self
    }

    /// 添加基类，按从近到远的顺序调用
    pub fn with_base_type(mut self, base_type: TypeInfo) -> Self {
        self.base_types.push(base_type);
        self
    }

    /// 添加标记特性
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    /// 添加服务注解
    pub fn with_service_attribute(mut self, attribute: ServiceAttribute) -> Self {
        self.service_attributes.push(attribute);
        self
    }

    /// 标记为抽象类型
    pub fn as_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// 标记为非公开类型
    pub fn non_public(mut self) -> Self {
        self.is_public = false;
        self
    }

    /// 是否为类
    pub fn is_class(&self) -> bool {
        self.kind == TypeKind::Class
    }

    /// 是否可以作为可实例化的实现类型
    pub fn is_concrete_class(&self) -> bool {
        self.is_class() && !self.is_abstract
    }

    /// 最近的基类
    pub fn base_class(&self) -> Option<&TypeInfo> {
        self.base_types.first()
    }

    /// 是否带有指定标记特性
    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.attributes.iter().any(|a| a == attribute)
    }

    /// 是否可以赋值给指定类型（自身、接口或基类）
    pub fn is_assignable_to(&self, target: &TypeInfo) -> bool {
        &self.type_info == target
            || self.interfaces.contains(target)
            || self.base_types.contains(target)
    }
}

/// 程序集描述符
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyDescriptor {
    /// 程序集名称
    pub name: String,
    /// 定义的类型
    #[serde(default)]
    pub types: Vec<TypeDescriptor>,
    /// 引用的程序集名称
    #[serde(default)]
    pub references: Vec<String>,
}

impl AssemblyDescriptor {
    /// 创建新的程序集描述符
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
            references: Vec::new(),
        }
    }

    /// 添加定义的类型
    pub fn with_type(mut self, descriptor: TypeDescriptor) -> Self {
        self.types.push(descriptor);
        self
    }

    /// 添加引用的程序集
    pub fn with_reference(mut self, assembly: impl Into<String>) -> Self {
        self.references.push(assembly.into());
        self
    }
}

/// 截取顶层第一个 ` + ` 之前的部分，泛型参数中的约束保持不变
fn primary_bound(type_name: &str) -> &str {
    let bytes = type_name.as_bytes();
    let mut depth = 0usize;
    for (idx, &byte) in bytes.iter().enumerate() {
        match byte {
            b'<' | b'(' | b'[' => depth += 1,
            // `->` 不是泛型参数的结束
            b'>' if idx > 0 && bytes[idx - 1] == b'-' => {}
            b'>' | b')' | b']' => depth = depth.saturating_sub(1),
            b' ' if depth == 0 && type_name[idx..].starts_with(" + ") => {
                return &type_name[..idx];
            }
            _ => {}
        }
    }
    type_name
}
