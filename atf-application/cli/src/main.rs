//! ATF CLI 应用

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, Level};

mod commands;
mod config;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "atf")]
#[command(about = "ATF - 层级测试集执行工具", long_about = None)]
#[command(version)]
struct Cli {
    /// 日志级别 (默认使用配置文件中的值)
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 执行测试集并生成报告
    Run {
        /// 测试集文件路径 (.json / .yaml / .yml / .xml)
        file: PathBuf,

        /// 报告输出目录
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 报告写入 `<输出目录>/<测试集名称>_<时间>` 子目录
        #[arg(long)]
        stamp: bool,

        /// 报告格式 (html / json / yaml / xml)，可重复指定
        #[arg(short = 'f', long = "format")]
        formats: Vec<String>,

        /// 单条命令超时 (秒)
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// 显示测试集结构
    Show {
        /// 测试集文件路径
        file: PathBuf,

        /// 输出格式 (tree / json / yaml / xml)
        #[arg(long, default_value = "tree")]
        format: String,
    },

    /// 检查测试集配置
    Validate {
        /// 测试集文件路径
        file: PathBuf,
    },
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load()?;

    // 初始化日志
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    tracing_subscriber::fmt()
        .with_max_level(parse_level(level))
        .init();

    debug!("ATF CLI 启动");

    match cli.command {
        Commands::Run {
            file,
            output,
            stamp,
            formats,
            timeout,
        } => {
            let options = commands::run::RunOptions {
                output,
                stamp,
                formats,
                timeout,
            };
            commands::run::handle(&file, options, &config).await?
        }
        Commands::Show { file, format } => commands::show::show(&file, &format)?,
        Commands::Validate { file } => commands::show::validate(&file)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_level("warn"), Level::WARN);
        assert_eq!(parse_level("verbose"), Level::INFO);
    }

    #[test]
    fn test_parse_run_arguments() {
        let cli = Cli::try_parse_from([
            "atf", "--log-level", "debug", "run", "set.yaml", "-o", "out", "-f", "html", "-f", "json",
        ])
        .unwrap();

        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Commands::Run {
                file,
                output,
                stamp,
                formats,
                timeout,
            } => {
                assert_eq!(file, PathBuf::from("set.yaml"));
                assert_eq!(output, Some(PathBuf::from("out")));
                assert!(!stamp);
                assert_eq!(formats, vec!["html", "json"]);
                assert_eq!(timeout, None);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_parse_run_stamp() {
        let cli = Cli::try_parse_from(["atf", "run", "set.xml", "--stamp", "-f", "xml"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Run { stamp: true, ref formats, .. } if formats == &["xml"]
        ));
    }

    #[test]
    fn test_parse_show_default_format() {
        let cli = Cli::try_parse_from(["atf", "show", "set.json"]).unwrap();
        assert!(matches!(cli.command, Commands::Show { ref format, .. } if format == "tree"));
    }
}
