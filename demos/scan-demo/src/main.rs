//! # 约定扫描演示程序
//!
//! 从 JSON 类型目录和 TOML 扫描配置出发，执行一次约定扫描并打印注册结果

use anyhow::{Context, Result};
use clap::Parser;
use di_abstractions::{ServiceCollection, TypeCatalog};
use di_impl::{InMemoryTypeCatalog, ServiceCollectionImpl};
use di_scanning::{PopulateReport, ServiceCollectionExt};
use infrastructure_common::{LifetimeConventions, ScanOptions};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "scan-demo")]
#[command(about = "约定式服务扫描演示")]
struct Args {
    /// 类型目录清单路径
    #[arg(short, long, default_value = "demos/scan-demo/data/catalog.json")]
    catalog: PathBuf,

    /// 扫描配置文件路径
    #[arg(short, long, default_value = "demos/scan-demo/data/scan.toml")]
    options: PathBuf,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // 初始化日志
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("启动约定扫描演示");

    let catalog = load_catalog(&args)?;
    let options = load_options(&args)?;

    let mut services = ServiceCollectionImpl::new();
    let report = register_services(&mut services, &catalog, options)?;

    print_registrations(&services, &report);
    Ok(())
}

/// 加载类型目录
fn load_catalog(args: &Args) -> Result<InMemoryTypeCatalog> {
    let json = std::fs::read_to_string(&args.catalog)
        .with_context(|| format!("无法读取类型目录: {}", args.catalog.display()))?;
    let catalog = InMemoryTypeCatalog::from_json(&json)?;
    info!("加载类型目录成功，共 {} 个程序集", catalog.assembly_count());
    Ok(catalog)
}

/// 加载扫描配置，文件不存在时使用默认配置
fn load_options(args: &Args) -> Result<ScanOptions> {
    if !args.options.exists() {
        warn!("扫描配置文件不存在，使用默认配置: {}", args.options.display());
        return Ok(ScanOptions::default());
    }
    let options = ScanOptions::load_from_file(&args.options)?;
    info!("加载扫描配置: {:?}", options);
    Ok(options)
}

/// 扫描入口程序集及其依赖并注册服务
fn register_services(
    services: &mut ServiceCollectionImpl,
    catalog: &InMemoryTypeCatalog,
    options: ScanOptions,
) -> Result<PopulateReport> {
    let entry = catalog
        .entry_assembly()
        .context("类型目录没有入口程序集")?;
    let conventions = LifetimeConventions::suffix_defaults();

    let report = services.scan_with_options(catalog, options, |source| {
        Ok(source
            .from_assembly_dependencies(&entry)?
            // 通知实现全部注册为实现的接口
            .add_classes_with(|f| f.in_namespaces(["shop::notifications"]))?
            .as_implemented_interfaces()?
            .with_scoped_lifetime()
            // 业务服务与仓储按命名约定匹配接口
            .add_classes_with(|f| {
                f.in_namespaces(["shop::orders", "shop::data"])
                    .matching(|t| t.service_attributes.is_empty())
            })?
            .as_matching_interface()?
            .with_conventional_lifetime(&conventions)
            // 带服务注解的类型按注解注册
            .add_classes_where(|t| !t.service_attributes.is_empty())
            .using_attributes()?
            .add_classes_with(|f| f.in_exact_namespaces(["shop"]))?
            .as_self()
            .with_singleton_lifetime())
    })?;

    Ok(report)
}

/// 打印注册结果
fn print_registrations(services: &ServiceCollectionImpl, report: &PopulateReport) {
    println!("{:<40} {:<40} {}", "服务类型", "实现类型", "生命周期");
    for descriptor in services {
        println!(
            "{:<40} {:<40} {}",
            descriptor.service_type.full_name(),
            descriptor.implementation_type.full_name(),
            descriptor.lifetime
        );
    }
    println!(
        "共 {} 个注册项（新增 {}，跳过 {}，移除 {}）",
        services.len(),
        report.added,
        report.skipped,
        report.removed
    );
}
