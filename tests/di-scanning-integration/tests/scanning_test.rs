//! 约定扫描端到端集成测试

use di_abstractions::ServiceCollection;
use di_impl::{InMemoryTypeCatalog, ServiceCollectionImpl};
use di_scanning::{IntoScanPlan, ServiceCollectionExt, TypeSourceSelector};
use infrastructure_common::{
    AssemblyDescriptor, AssemblyLoadPolicy, DependencyError, Lifetime, RegistrationStrategy,
    ScanError, ScanOptions, ServiceAttribute, ServiceDescriptor, TypeDescriptor, TypeInfo,
};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志系统（只初始化一次）
fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

fn ty(name: &str) -> TypeInfo {
    TypeInfo::new("notifications", name, "notifications")
}

/// 通知程序集：两个通知实现、一个抽象基类、一个日志类
fn notifications_catalog() -> InMemoryTypeCatalog {
    InMemoryTypeCatalog::builder()
        .add_assembly(
            AssemblyDescriptor::new("notifications")
                .with_type(TypeDescriptor::interface(ty("INotifier")))
                .with_type(
                    TypeDescriptor::class(ty("NotifierBase"))
                        .as_abstract()
                        .with_interface(ty("INotifier")),
                )
                .with_type(
                    TypeDescriptor::class(ty("EmailSender"))
                        .with_interface(ty("INotifier"))
                        .with_base_type(ty("NotifierBase")),
                )
                .with_type(
                    TypeDescriptor::class(ty("SmsSender"))
                        .with_interface(ty("INotifier"))
                        .with_base_type(ty("NotifierBase")),
                ),
        )
        .add_assembly(
            AssemblyDescriptor::new("diagnostics").with_type(TypeDescriptor::class(TypeInfo::new(
                "diagnostics",
                "Logger",
                "diagnostics",
            ))),
        )
        .entry_assembly("notifications")
        .build()
}

/// 测试抽象类型和排除列表中的类型不会被选为实现类型
#[test]
fn test_abstract_and_denylisted_types_are_never_selected() {
    init_test_logger();
    let catalog = notifications_catalog();

    let selector = TypeSourceSelector::new(&catalog)
        .from_assemblies(["notifications"])
        .unwrap()
        .add_classes_with(|f| f.exclude([ty("SmsSender")]))
        .unwrap();

    let names: Vec<&str> = selector
        .classes()
        .iter()
        .map(|t| t.type_info.name.as_str())
        .collect();
    assert_eq!(names, vec!["EmailSender"]);
    assert!(selector.classes().iter().all(|t| !t.is_abstract));
}

/// 测试按命名约定匹配时只注册约定匹配的接口
#[test]
fn test_matching_interface_registers_exactly_convention_matches() {
    init_test_logger();
    let catalog = InMemoryTypeCatalog::builder().build();
    let types = vec![
        TypeDescriptor::class(ty("Foo"))
            .with_interface(ty("IFoo"))
            .with_interface(ty("IBar"))
            .with_interface(ty("IDisposable")),
        TypeDescriptor::class(ty("Bar")).with_interface(ty("IBar")),
    ];

    let mut services: Vec<ServiceDescriptor> = Vec::new();
    services
        .scan(&catalog, |source| {
            Ok(source
                .from_types(types)?
                .add_classes()
                .as_matching_interface()?
                .with_transient_lifetime())
        })
        .unwrap();

    assert_eq!(services.len(), 2);
    assert_eq!(services.implementation_for(&ty("IFoo")), Some(&ty("Foo")));
    assert_eq!(services.implementation_for(&ty("IBar")), Some(&ty("Bar")));
    assert!(!services.contains_service(&ty("IDisposable")));
}

/// 测试 Skip 策略下重复扫描不会改变注册项数量
#[test]
fn test_skip_strategy_is_idempotent() {
    init_test_logger();
    let catalog = notifications_catalog();
    let mut services = ServiceCollectionImpl::new();

    let run = |services: &mut ServiceCollectionImpl| {
        services
            .scan(&catalog, |source| {
                Ok(source
                    .from_assembly_of(&ty("INotifier"))?
                    .add_classes()
                    .using_registration_strategy(RegistrationStrategy::Skip)
                    .as_implemented_interfaces()?
                    .with_singleton_lifetime())
            })
            .unwrap()
    };

    let first = run(&mut services);
    let count = services.len();
    let second = run(&mut services);

    assert_eq!(count, 1);
    assert_eq!(services.len(), count);
    assert_eq!(first.skipped, 1);
    assert_eq!(second.added, 0);
    assert_eq!(services.implementation_for(&ty("INotifier")), Some(&ty("EmailSender")));
}

/// 测试 Replace(all) 之后每个服务类型只剩一个注册项
#[test]
fn test_replace_all_leaves_single_entry_per_service_type() {
    init_test_logger();
    let catalog = InMemoryTypeCatalog::builder().build();
    let mut services = ServiceCollectionImpl::from(vec![
        ServiceDescriptor::transient(ty("IFoo"), ty("OldFoo")),
        ServiceDescriptor::transient(ty("IBar"), ty("OldBar")),
        ServiceDescriptor::singleton(ty("IBar"), ty("OtherBar")),
        ServiceDescriptor::scoped(ty("ILegacy"), ty("Foo")),
        ServiceDescriptor::scoped(ty("IUnrelated"), ty("Unrelated")),
    ]);

    services
        .scan(&catalog, |source| {
            Ok(source
                .from_types(vec![TypeDescriptor::class(ty("Foo"))
                    .with_interface(ty("IFoo"))
                    .with_interface(ty("IBar"))])?
                .add_classes()
                .using_registration_strategy(RegistrationStrategy::replace_all())
                .as_implemented_interfaces()?
                .with_scoped_lifetime())
        })
        .unwrap();

    assert_eq!(services.descriptors_for(&ty("IFoo")).len(), 1);
    assert_eq!(services.descriptors_for(&ty("IBar")).len(), 1);
    assert_eq!(services.implementation_for(&ty("IBar")), Some(&ty("Foo")));
    // 同一实现类型的其他注册项也被移除
    assert!(!services.contains_service(&ty("ILegacy")));
    assert!(services.contains_service(&ty("IUnrelated")));
}

/// 测试 Append 策略按注册顺序保留全部实现
#[test]
fn test_append_registers_all_notifiers_in_order() {
    init_test_logger();
    let catalog = notifications_catalog();
    let mut services = ServiceCollectionImpl::new();

    let report = services
        .scan(&catalog, |source| {
            Ok(source
                .from_assemblies(["notifications"])?
                .add_classes()
                .using_registration_strategy(RegistrationStrategy::Append)
                .as_implemented_interfaces()?
                .with_transient_lifetime())
        })
        .unwrap();

    let notifiers = services.descriptors_for(&ty("INotifier"));
    assert_eq!(report.added, 2);
    assert_eq!(notifiers.len(), 2);
    assert_eq!(notifiers[0].implementation_type, ty("EmailSender"));
    assert_eq!(notifiers[1].implementation_type, ty("SmsSender"));
    assert_eq!(services.implementation_for(&ty("INotifier")), Some(&ty("SmsSender")));
}

/// 测试没有接口的类型注册为自身
#[test]
fn test_self_registration_without_interfaces() {
    init_test_logger();
    let catalog = notifications_catalog();
    let logger = TypeInfo::new("diagnostics", "Logger", "diagnostics");
    let mut services = ServiceCollectionImpl::new();

    services
        .scan(&catalog, |source| {
            Ok(source
                .from_assemblies(["diagnostics"])?
                .add_classes()
                .as_self()
                .with_singleton_lifetime())
        })
        .unwrap();

    assert_eq!(services.len(), 1);
    let registered = services.descriptors_for(&logger);
    assert_eq!(registered.len(), 1);
    assert!(registered[0].is_self_registration());
    assert_eq!(registered[0].lifetime, Lifetime::Singleton);
}

/// 测试空来源列表在修改集合之前报错
#[test]
fn test_empty_source_list_fails_before_mutation() {
    init_test_logger();
    let catalog = notifications_catalog();
    let existing = ServiceDescriptor::transient(ty("INotifier"), ty("PushSender"));
    let mut services = ServiceCollectionImpl::from(vec![existing.clone()]);

    let result = services.scan(&catalog, |source| source.from_assemblies(Vec::<String>::new()));
    assert!(matches!(result, Err(ScanError::InvalidArgument { .. })));

    let result = services.scan(&catalog, |source| source.from_types(Vec::new()));
    assert!(matches!(result, Err(ScanError::InvalidArgument { .. })));

    assert_eq!(services.descriptors(), &[existing]);
}

/// 测试只读集合的写入错误原样返回
#[test]
fn test_read_only_collection_failure_propagates() {
    init_test_logger();
    let catalog = notifications_catalog();
    let mut services = ServiceCollectionImpl::new();
    services.make_read_only();

    let result = services.scan(&catalog, |source| source.from_assemblies(["diagnostics"]));
    assert!(matches!(
        result,
        Err(ScanError::Registration {
            source: DependencyError::ReadOnlyCollection
        })
    ));
    assert!(services.is_empty());
}

/// 测试 Reject 策略遇到重复注册时报错，之前的写入保持不变
#[test]
fn test_reject_strategy_reports_duplicates() {
    init_test_logger();
    let catalog = notifications_catalog();
    let mut services = ServiceCollectionImpl::new();

    let result = services.scan(&catalog, |source| {
        Ok(source
            .from_assemblies(["notifications"])?
            .add_classes()
            .using_registration_strategy(RegistrationStrategy::Reject)
            .as_implemented_interfaces()?
            .with_transient_lifetime())
    });

    assert!(matches!(
        result,
        Err(ScanError::Registration {
            source: DependencyError::DuplicateRegistration { .. }
        })
    ));
    assert_eq!(services.len(), 1);
    assert_eq!(services.implementation_for(&ty("INotifier")), Some(&ty("EmailSender")));
}

/// 测试依赖程序集加载失败时的两种处理策略
#[test]
fn test_assembly_load_policies_on_dependency_walk() {
    init_test_logger();
    let catalog = InMemoryTypeCatalog::builder()
        .add_assembly(
            AssemblyDescriptor::new("app")
                .with_type(TypeDescriptor::class(TypeInfo::new("app", "Clock", "app")))
                .with_reference("diagnostics")
                .with_reference("native-bridge"),
        )
        .add_assembly(AssemblyDescriptor::new("diagnostics").with_type(TypeDescriptor::class(
            TypeInfo::new("diagnostics", "Logger", "diagnostics"),
        )))
        .unloadable("native-bridge")
        .entry_assembly("app")
        .build();

    let mut services = ServiceCollectionImpl::new();
    services
        .scan(&catalog, |source| source.from_assembly_dependencies("app"))
        .unwrap();
    assert_eq!(services.len(), 2);

    let options = ScanOptions::default().with_assembly_load_policy(AssemblyLoadPolicy::FailFast);
    let mut strict = ServiceCollectionImpl::new();
    let result = strict.scan_with_options(&catalog, options, |source| {
        source.from_assembly_dependencies("app")
    });
    assert!(matches!(result, Err(ScanError::AssemblyLoadFailure { .. })));
    assert!(strict.is_empty());
}

/// 测试多个来源与多个类分组按产生顺序注册
#[test]
fn test_multiple_sources_and_class_groups() {
    init_test_logger();
    let catalog = notifications_catalog();
    let mut services = ServiceCollectionImpl::new();

    services
        .scan(&catalog, |source| {
            Ok(source
                .from_assemblies(["notifications"])?
                .add_classes_with(|f| f.with_name_pattern("Email*"))?
                .as_implemented_interfaces()?
                .with_singleton_lifetime()
                .add_classes_with(|f| f.with_name_pattern("Sms*"))?
                .as_self()
                .with_scoped_lifetime()
                .and()
                .from_application_dependencies(|assembly| assembly.name == "diagnostics")?
                .add_classes()
                .as_self()
                .with_transient_lifetime())
        })
        .unwrap();

    let lifetimes: Vec<(String, Lifetime)> = services
        .iter()
        .map(|d| (d.service_type.name.clone(), d.lifetime))
        .collect();
    assert_eq!(
        lifetimes,
        vec![
            ("INotifier".to_string(), Lifetime::Singleton),
            ("SmsSender".to_string(), Lifetime::Scoped),
            ("Logger".to_string(), Lifetime::Transient),
        ]
    );
}

/// 测试按服务注解注册
#[test]
fn test_attribute_based_registration() {
    init_test_logger();
    let catalog = InMemoryTypeCatalog::builder()
        .add_assembly(
            AssemblyDescriptor::new("caching")
                .with_type(
                    TypeDescriptor::class(TypeInfo::new("caching", "MemoryCache", "caching"))
                        .with_interface(TypeInfo::new("caching", "ICache", "caching"))
                        .with_service_attribute(
                            ServiceAttribute::for_service(TypeInfo::new(
                                "caching", "ICache", "caching",
                            ))
                            .with_lifetime(Lifetime::Singleton),
                        ),
                )
                .with_type(TypeDescriptor::class(TypeInfo::new(
                    "caching", "CacheKey", "caching",
                ))),
        )
        .build();

    let mut services = ServiceCollectionImpl::new();
    services
        .scan(&catalog, |source| {
            source
                .from_assemblies(["caching"])?
                .add_classes()
                .using_attributes()
        })
        .unwrap();

    assert_eq!(services.len(), 1);
    let cache = services.descriptors_for(&TypeInfo::new("caching", "ICache", "caching"));
    assert_eq!(cache[0].lifetime, Lifetime::Singleton);
}

trait Notifier {}

struct PushSender;

impl Notifier for PushSender {}

/// 测试使用 Rust 类型推导的类型信息
#[test]
fn test_rust_type_metadata() {
    init_test_logger();
    let catalog = InMemoryTypeCatalog::builder().build();
    let push = TypeDescriptor::class(TypeInfo::of::<PushSender>())
        .with_interface(TypeInfo::of_trait::<dyn Notifier>());

    let plan = TypeSourceSelector::new(&catalog)
        .from_types(vec![push])
        .unwrap()
        .add_classes()
        .as_type::<dyn Notifier>()
        .unwrap()
        .with_singleton_lifetime()
        .into_plan();

    let mut services: Vec<ServiceDescriptor> = Vec::new();
    let report = plan.populate(&mut services).unwrap();

    assert_eq!(report.added, 1);
    assert_eq!(services[0].service_type.name, "Notifier");
    assert_eq!(services[0].implementation_type.name, "PushSender");
}

/// 测试同一次扫描中 Replace(service_type) 覆盖先前 Append 的注册项
#[test]
fn test_replace_overrides_earlier_append_in_same_scan() {
    init_test_logger();
    let catalog = InMemoryTypeCatalog::builder().build();
    let mut services = ServiceCollectionImpl::new();

    let report = services
        .scan(&catalog, |source| {
            Ok(source
                .from_types(vec![
                    TypeDescriptor::class(ty("LegacyFoo")).with_interface(ty("IFoo")),
                    TypeDescriptor::class(ty("Foo")).with_interface(ty("IFoo")),
                ])?
                .add_classes_with(|f| f.matching(|t| t.type_info.name == "LegacyFoo"))?
                .as_implemented_interfaces()?
                .with_transient_lifetime()
                .add_classes_with(|f| f.matching(|t| t.type_info.name == "Foo"))?
                .using_registration_strategy(RegistrationStrategy::replace_service_type())
                .as_implemented_interfaces()?
                .with_transient_lifetime())
        })
        .unwrap();

    assert_eq!(report.removed, 1);
    assert_eq!(services.len(), 1);
    assert_eq!(services.implementation_for(&ty("IFoo")), Some(&ty("Foo")));
}

/// 测试 FailFast 策略下应用依赖中无法加载的程序集会中止扫描
#[test]
fn test_application_dependencies_fail_fast() {
    init_test_logger();
    let catalog = InMemoryTypeCatalog::builder()
        .add_assembly(
            AssemblyDescriptor::new("notifications")
                .with_type(TypeDescriptor::class(ty("EmailSender"))),
        )
        .add_assembly(AssemblyDescriptor::new("native-bridge"))
        .unloadable("native-bridge")
        .entry_assembly("notifications")
        .build();

    let mut services = ServiceCollectionImpl::new();
    services
        .scan(&catalog, |source| source.from_application_dependencies(|_| true))
        .unwrap();
    assert_eq!(services.len(), 1);

    let options = ScanOptions::default().with_assembly_load_policy(AssemblyLoadPolicy::FailFast);
    let mut strict = ServiceCollectionImpl::new();
    let result = strict.scan_with_options(&catalog, options, |source| {
        source.from_application_dependencies(|_| true)
    });
    assert!(matches!(
        result,
        Err(ScanError::AssemblyLoadFailure { ref assembly, .. }) if assembly == "native-bridge"
    ));
    assert!(strict.is_empty());
}

/// 测试按任一服务类型过滤实现类型
#[test]
fn test_assignable_to_any_selects_matching_classes() {
    init_test_logger();
    let catalog = notifications_catalog();
    let logger_contract = TypeInfo::new("diagnostics", "ILogger", "diagnostics");
    let mut services = ServiceCollectionImpl::new();

    services
        .scan(&catalog, |source| {
            Ok(source
                .from_assemblies(["notifications", "diagnostics"])?
                .add_classes_with(|f| f.assignable_to_any([ty("INotifier"), logger_contract]))?
                .as_self()
                .with_singleton_lifetime())
        })
        .unwrap();

    let names: Vec<&str> = services
        .iter()
        .map(|d| d.implementation_type.name.as_str())
        .collect();
    assert_eq!(names, vec!["EmailSender", "SmsSender"]);
}

/// 测试按标记类型的命名空间过滤实现类型
#[test]
fn test_in_namespace_of_marker() {
    init_test_logger();
    let catalog = notifications_catalog();
    let marker = TypeInfo::new("diagnostics", "DiagnosticsMarker", "diagnostics");
    let mut services = ServiceCollectionImpl::new();

    services
        .scan(&catalog, |source| {
            Ok(source
                .from_assemblies(["notifications", "diagnostics"])?
                .add_classes_with(|f| f.in_namespace_of(&marker))?
                .as_self()
                .with_transient_lifetime())
        })
        .unwrap();

    assert_eq!(services.len(), 1);
    assert!(services.contains_service(&TypeInfo::new("diagnostics", "Logger", "diagnostics")));
}

/// 测试从 Rust 类型所在的程序集选择
#[test]
fn test_from_assembly_of_rust_type() {
    init_test_logger();
    let push = TypeInfo::of::<PushSender>();
    let catalog = InMemoryTypeCatalog::builder()
        .add_assembly(
            AssemblyDescriptor::new(push.assembly.clone()).with_type(
                TypeDescriptor::class(push.clone())
                    .with_interface(TypeInfo::of_trait::<dyn Notifier>()),
            ),
        )
        .add_assembly(AssemblyDescriptor::new("diagnostics").with_type(TypeDescriptor::class(
            TypeInfo::new("diagnostics", "Logger", "diagnostics"),
        )))
        .build();

    let mut services = ServiceCollectionImpl::new();
    services
        .scan(&catalog, |source| {
            Ok(source
                .from_assembly_of_type::<PushSender>()?
                .add_classes()
                .as_implemented_interfaces()?
                .with_scoped_lifetime())
        })
        .unwrap();

    assert_eq!(services.len(), 1);
    assert_eq!(
        services.implementation_for(&TypeInfo::of_trait::<dyn Notifier>()),
        Some(&push)
    );
}
