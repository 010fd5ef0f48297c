//! 约定规范定义
//!
//! 提供服务类型命名约定和基于名称模式的生命周期约定

use crate::lifecycle::Lifetime;
use crate::metadata::TypeInfo;
use serde::{Deserialize, Serialize};

/// 检查名称是否匹配通配符模式
///
/// `*` 匹配任意长度的字符，不含 `*` 的模式要求完全相等。
pub fn pattern_matches(pattern: &str, name: &str) -> bool {
    if !pattern.contains('*') {
        return name == pattern;
    }

    let parts: Vec<&str> = pattern.split('*').collect();
    let prefix = parts[0];
    let suffix = parts[parts.len() - 1];

    if name.len() < prefix.len() + suffix.len()
        || !name.starts_with(prefix)
        || !name.ends_with(suffix)
    {
        return false;
    }

    // 中间片段按顺序出现在前缀与后缀之间
    let mut rest = &name[prefix.len()..name.len() - suffix.len()];
    for middle in &parts[1..parts.len() - 1] {
        match rest.find(middle) {
            Some(idx) => rest = &rest[idx + middle.len()..],
            None => return false,
        }
    }
    true
}

/// 接口命名约定
///
/// 实现类型 `Foo` 对应的服务接口名称为 `{prefix}Foo{suffix}`，默认 `IFoo`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterfaceNamingConvention {
    /// 接口名称前缀
    pub prefix: String,
    /// 接口名称后缀
    pub suffix: String,
}

impl InterfaceNamingConvention {
    /// 创建新的命名约定
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// 获取实现类型对应的接口名称
    pub fn interface_name_for(&self, implementation: &TypeInfo) -> String {
        format!("{}{}{}", self.prefix, implementation.base_name(), self.suffix)
    }

    /// 检查接口是否按约定匹配实现类型
    pub fn matches(&self, implementation: &TypeInfo, interface: &TypeInfo) -> bool {
        interface.base_name() == self.interface_name_for(implementation)
    }
}

impl Default for InterfaceNamingConvention {
    fn default() -> Self {
        Self::new("I", "")
    }
}

/// 生命周期约定规则
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifetimeRule {
    /// 名称模式
    pub pattern: String,
    /// 生命周期
    pub lifetime: Lifetime,
    /// 优先级
    #[serde(default)]
    pub priority: i32,
}

impl LifetimeRule {
    /// 创建新的约定规则
    pub fn new(pattern: impl Into<String>, lifetime: Lifetime) -> Self {
        Self {
            pattern: pattern.into(),
            lifetime,
            priority: 0,
        }
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// 检查类型是否匹配此规则
    pub fn matches(&self, type_info: &TypeInfo) -> bool {
        pattern_matches(&self.pattern, type_info.base_name())
    }
}

/// 生命周期约定
///
/// 规则按优先级从高到低匹配，同优先级按添加顺序。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifetimeConventions {
    rules: Vec<LifetimeRule>,
}

impl LifetimeConventions {
    /// 创建空的生命周期约定
    pub fn new() -> Self {
        Self::default()
    }

    /// 按名称后缀的常用约定
    pub fn suffix_defaults() -> Self {
        Self::new()
            .with_rule(LifetimeRule::new("*Strategy", Lifetime::Transient).with_priority(100))
            .with_rule(LifetimeRule::new("*Service", Lifetime::Singleton).with_priority(90))
            .with_rule(LifetimeRule::new("*Manager", Lifetime::Singleton).with_priority(90))
            .with_rule(LifetimeRule::new("*Provider", Lifetime::Scoped).with_priority(80))
            .with_rule(LifetimeRule::new("*Repository", Lifetime::Scoped).with_priority(80))
    }

    /// 添加约定规则
    pub fn with_rule(mut self, rule: LifetimeRule) -> Self {
        self.add_rule(rule);
        self
    }

    /// 添加约定规则
    pub fn add_rule(&mut self, rule: LifetimeRule) {
        self.rules.push(rule);
        self.rules.sort_by(|a, b| b.priority.cmp(&a.priority));
    }

    /// 获取所有约定规则
    pub fn rules(&self) -> &[LifetimeRule] {
        &self.rules
    }

    /// 根据类型查找生命周期
    pub fn lifetime_for(&self, type_info: &TypeInfo) -> Option<Lifetime> {
        self.rules
            .iter()
            .find(|rule| rule.matches(type_info))
            .map(|rule| rule.lifetime)
    }
}
