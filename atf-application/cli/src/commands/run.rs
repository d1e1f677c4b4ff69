//! run 命令：执行测试集并生成报告

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

use atf_executor::{ExecContext, LocalRunner, TestResult, TestSet, TracingProgress};
use atf_report::utils::stamped_dir;
use atf_report::{ReportWriter, TestReport};

use crate::config::CliConfig;

/// 命令行参数，未指定的项使用配置文件中的值
pub struct RunOptions {
    pub output: Option<PathBuf>,
    pub stamp: bool,
    pub formats: Vec<String>,
    pub timeout: Option<u64>,
}

pub async fn handle(file: &Path, options: RunOptions, config: &CliConfig) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(format!("加载测试集: {}", file.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let set = match super::load_set(file) {
        Ok(set) => set,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e);
        }
    };
    spinner.finish_with_message(format!(
        "{} 测试集加载成功: {}",
        "✓".green().bold(),
        set.name.cyan()
    ));
    super::print_warnings(&set);

    let formats = if options.formats.is_empty() {
        &config.formats
    } else {
        &options.formats
    };
    let formats = CliConfig::report_formats(formats)?;
    let mut report_dir = options
        .output
        .unwrap_or_else(|| PathBuf::from(&config.report_dir));
    if options.stamp {
        report_dir = stamped_dir(&report_dir, &set.name);
    }

    let mut runner = LocalRunner::new();
    let timeout = options
        .timeout
        .map(Duration::from_secs)
        .or_else(|| config.command_timeout());
    if let Some(timeout) = timeout {
        runner = runner.with_timeout(timeout);
    }

    println!();
    println!("用例数: {}", set.cases.len().to_string().yellow());
    println!("步骤数: {}", set.step_count().to_string().yellow());
    println!("\n{}\n", "开始执行测试集...".bold());

    let mut report = TestReport::start(set);
    let ctx = ExecContext::new(&runner, &TracingProgress);
    report.test_set.execute(&ctx).await;
    report.finish();

    let written = ReportWriter::new(&report_dir)
        .with_formats(formats)
        .write(&report)
        .with_context(|| format!("写入报告失败: {}", report_dir.display()))?;

    print_summary(&report, &written);

    if report.summary().fail_count > 0 {
        anyhow::bail!("测试集执行失败");
    }
    Ok(())
}

fn status_icon(status: TestResult) -> colored::ColoredString {
    match status {
        TestResult::Pass => "✓".green(),
        TestResult::Fail => "✗".red(),
        _ => "⊘".yellow(),
    }
}

fn print_cases(set: &TestSet) {
    for case in &set.cases {
        println!(
            "{} {} ({})",
            status_icon(case.status).bold(),
            case.name,
            case.status.to_string().bright_black()
        );
        for step in &case.steps {
            println!("   {} {}", status_icon(step.status), step.name.bright_black());
        }
    }
}

fn print_summary(report: &TestReport, written: &[PathBuf]) {
    let summary = report.summary();

    println!("\n{}", "=".repeat(60));
    println!("{}", "执行报告".bold());
    println!("{}", "=".repeat(60));
    println!();

    println!("测试集: {}", report.name().cyan().bold());
    println!("开始时间: {}", report.started.bright_black());
    println!("结束时间: {}", report.finished.bright_black());
    println!();

    print_cases(&report.test_set);
    println!();

    println!("用例统计:");
    println!("  总用例: {}", summary.total.to_string().bright_blue());
    println!("  通过:   {}", summary.pass_count.to_string().green());
    println!("  失败:   {}", summary.fail_count.to_string().red());
    println!("  未测试: {}", summary.not_tested_count.to_string().yellow());
    println!();

    for path in written {
        println!("报告: {}", path.display().to_string().cyan());
    }

    println!("{}", "=".repeat(60));
    let status = if summary.fail_count == 0 {
        format!("{} 测试集执行完成", "✓".green().bold())
    } else {
        format!("{} 测试集执行失败", "✗".red().bold())
    };
    println!("{}", status);
    println!("{}", "=".repeat(60));
}
