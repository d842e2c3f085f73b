// ==========================================
// 库存管理自动化流水线 - 命令行入口
// ==========================================
// 用法: inventory-rpa <输入文件> <输出目录>
//       [--strategy keep_first|keep_last|remove_all]
//       [--config <配置文件>] [--no-dedup] [--no-validate]
// ==========================================

use anyhow::{bail, Context, Result};
use inventory_rpa::config::PipelineConfig;
use inventory_rpa::domain::types::DedupStrategy;
use inventory_rpa::engine::PipelineOptions;
use inventory_rpa::workflow::InventoryWorkflow;

struct CliArgs {
    input_file: String,
    output_dir: String,
    config_path: Option<String>,
    options: PipelineOptions,
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    if args.len() < 2 {
        bail!(
            "用法: inventory-rpa <输入文件> <输出目录> \
             [--strategy keep_first|keep_last|remove_all] \
             [--config <配置文件>] [--no-dedup] [--no-validate]"
        );
    }

    let mut cli = CliArgs {
        input_file: args[0].clone(),
        output_dir: args[1].clone(),
        config_path: None,
        options: PipelineOptions::default(),
    };

    let mut iter = args[2..].iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--strategy" => {
                let value = iter.next().context("--strategy 需要一个参数")?;
                cli.options.dedup_strategy = DedupStrategy::parse(value)
                    .with_context(|| format!("未知去重策略: {}", value))?;
            }
            "--config" => {
                cli.config_path = Some(iter.next().context("--config 需要一个参数")?.clone());
            }
            "--no-dedup" => cli.options.remove_duplicates = false,
            "--no-validate" => cli.options.validate_rules = false,
            other => bail!("未知参数: {}", other),
        }
    }

    Ok(cli)
}

fn main() -> Result<()> {
    // 初始化日志系统
    inventory_rpa::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", inventory_rpa::APP_NAME);
    tracing::info!("系统版本: {}", inventory_rpa::VERSION);
    tracing::info!("==================================================");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = parse_args(&args)?;

    // 加载配置(未指定时使用内置默认值)
    let config = match &cli.config_path {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    config.validate()?;

    let workflow = InventoryWorkflow::new(config);
    let report = workflow.run(&cli.input_file, &cli.output_dir, cli.options)?;

    tracing::info!("处理记录数: {}", report.outcome.records.len());
    tracing::info!("违规条数: {}", report.outcome.violations.len());
    for file in &report.output_files {
        tracing::info!("输出文件: {}", file.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args_minimal() {
        let cli = parse_args(&["in.csv".to_string(), "out/".to_string()]).unwrap();
        assert_eq!(cli.input_file, "in.csv");
        assert!(cli.options.remove_duplicates);
        assert!(cli.options.validate_rules);
    }

    #[test]
    fn test_parse_args_flags() {
        let args: Vec<String> = [
            "in.csv",
            "out/",
            "--strategy",
            "remove_all",
            "--no-validate",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let cli = parse_args(&args).unwrap();
        assert_eq!(cli.options.dedup_strategy, DedupStrategy::RemoveAll);
        assert!(!cli.options.validate_rules);
    }

    #[test]
    fn test_parse_args_rejects_unknown() {
        let args: Vec<String> = ["in.csv", "out/", "--bogus"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(parse_args(&args).is_err());
    }
}
