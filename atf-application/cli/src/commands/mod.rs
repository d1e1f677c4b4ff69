//! CLI 命令处理模块

pub mod run;
pub mod show;

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use atf_executor::TestSet;

/// 加载并规范化测试集
pub fn load_set(file: &Path) -> Result<TestSet> {
    atf_executor::collect(file).with_context(|| format!("加载测试集失败: {}", file.display()))
}

/// 期望结果无法评估的用例 / 步骤输出到 stderr，不影响执行
pub fn print_warnings(set: &TestSet) {
    for warning in set.expectation_warnings() {
        eprintln!("{} {}", "⚠".yellow().bold(), warning.yellow());
    }
}
