//! 实现类型过滤器
//!
//! 在默认类过滤之上追加的条件，全部条件同时满足才会保留类型

use infrastructure_common::{pattern_matches, ScanError, ScanResult, TypeDescriptor, TypeInfo};

type TypePredicate = Box<dyn Fn(&TypeDescriptor) -> bool>;

/// 类型过滤器
#[derive(Default)]
pub struct TypeFilter {
    /// 过滤条件
    predicates: Vec<TypePredicate>,
    /// 构建过程中记录的第一个参数错误
    error: Option<ScanError>,
}

impl TypeFilter {
    /// 创建空过滤器
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, predicate: impl Fn(&TypeDescriptor) -> bool + 'static) -> Self {
        self.predicates.push(Box::new(predicate));
        self
    }

    fn reject(mut self, parameter: &'static str, message: &str) -> Self {
        if self.error.is_none() {
            self.error = Some(ScanError::invalid_argument(parameter, message));
        }
        self
    }

    /// 只保留可以赋值给指定类型的类型
    pub fn assignable_to(self, target: TypeInfo) -> Self {
        self.push(move |t| t.is_assignable_to(&target))
    }

    /// 只保留可以赋值给 `T` 的类型
    pub fn assignable_to_type<T: ?Sized + 'static>(self) -> Self {
        self.assignable_to(TypeInfo::of_trait::<T>())
    }

    /// 只保留可以赋值给任一指定类型的类型
    pub fn assignable_to_any(self, targets: impl IntoIterator<Item = TypeInfo>) -> Self {
        let targets: Vec<TypeInfo> = targets.into_iter().collect();
        if targets.is_empty() {
            return self.reject("types", "类型列表不能为空");
        }
        self.push(move |t| targets.iter().any(|target| t.is_assignable_to(target)))
    }

    /// 只保留位于指定命名空间或其子命名空间中的类型
    pub fn in_namespaces<I, S>(self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let namespaces: Vec<String> = namespaces.into_iter().map(Into::into).collect();
        if namespaces.is_empty() {
            return self.reject("namespaces", "命名空间列表不能为空");
        }
        self.push(move |t| namespaces.iter().any(|ns| t.type_info.is_in_namespace(ns)))
    }

    /// 只保留与标记类型位于相同命名空间（含子命名空间）的类型
    pub fn in_namespace_of(self, marker: &TypeInfo) -> Self {
        self.in_namespaces([marker.namespace.clone()])
    }

    /// 只保留恰好位于指定命名空间中的类型
    pub fn in_exact_namespaces<I, S>(self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let namespaces: Vec<String> = namespaces.into_iter().map(Into::into).collect();
        if namespaces.is_empty() {
            return self.reject("namespaces", "命名空间列表不能为空");
        }
        self.push(move |t| namespaces.iter().any(|ns| &t.type_info.namespace == ns))
    }

    /// 排除位于指定命名空间或其子命名空间中的类型
    pub fn not_in_namespaces<I, S>(self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let namespaces: Vec<String> = namespaces.into_iter().map(Into::into).collect();
        if namespaces.is_empty() {
            return self.reject("namespaces", "命名空间列表不能为空");
        }
        self.push(move |t| !namespaces.iter().any(|ns| t.type_info.is_in_namespace(ns)))
    }

    /// 只保留带有指定标记特性的类型
    pub fn with_attribute(self, attribute: impl Into<String>) -> Self {
        let attribute = attribute.into();
        self.push(move |t| t.has_attribute(&attribute))
    }

    /// 排除带有指定标记特性的类型
    pub fn without_attribute(self, attribute: impl Into<String>) -> Self {
        let attribute = attribute.into();
        self.push(move |t| !t.has_attribute(&attribute))
    }

    /// 只保留名称匹配通配符模式的类型，例如 `*Repository`
    pub fn with_name_pattern(self, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        self.push(move |t| pattern_matches(&pattern, t.type_info.base_name()))
    }

    /// 排除指定类型
    pub fn exclude(self, types: impl IntoIterator<Item = TypeInfo>) -> Self {
        let denied: Vec<TypeInfo> = types.into_iter().collect();
        self.push(move |t| !denied.contains(&t.type_info))
    }

    /// 自定义条件
    pub fn matching<F>(self, predicate: F) -> Self
    where
        F: Fn(&TypeDescriptor) -> bool + 'static,
    {
        self.push(predicate)
    }

    /// 检查类型是否满足全部条件
    pub fn matches(&self, descriptor: &TypeDescriptor) -> bool {
        self.predicates.iter().all(|predicate| predicate(descriptor))
    }

    /// 返回构建过程中记录的参数错误
    pub fn validated(self) -> ScanResult<Self> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self),
        }
    }
}

impl std::fmt::Debug for TypeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeFilter")
            .field("predicates", &self.predicates.len())
            .field("error", &self.error)
            .finish()
    }
}
