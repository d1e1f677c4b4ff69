//! CLI 配置管理
//!
//! TOML 文件 (~/.config/atf/config.toml)，文件不存在时使用默认值。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use atf_report::ReportFormat;

/// CLI 配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// 报告输出目录
    #[serde(default = "default_report_dir")]
    pub report_dir: String,

    /// 默认报告格式
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,

    /// 默认日志级别
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// 单条命令超时 (秒)，不设置则不限制
    #[serde(default)]
    pub command_timeout_secs: Option<u64>,
}

fn default_report_dir() -> String {
    "./reports".to_string()
}

fn default_formats() -> Vec<String> {
    vec!["html".to_string()]
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            report_dir: default_report_dir(),
            formats: default_formats(),
            log_level: default_log_level(),
            command_timeout_secs: None,
        }
    }
}

impl CliConfig {
    /// 获取配置文件路径
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("无法获取用户主目录")?;
        Ok(home.join(".config").join("atf").join("config.toml"))
    }

    /// 加载配置
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("读取配置文件失败: {:?}", path))?;

        Self::from_toml_str(&content).with_context(|| format!("解析配置文件失败: {:?}", path))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// 解析报告格式列表
    pub fn report_formats(names: &[String]) -> Result<Vec<ReportFormat>> {
        names
            .iter()
            .map(|name| {
                name.parse::<ReportFormat>()
                    .with_context(|| format!("无效的报告格式: {}", name))
            })
            .collect()
    }

    /// 单条命令超时
    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = CliConfig::from_toml_str("").unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.report_dir, "./reports");
        assert_eq!(config.formats, vec!["html"]);
        assert_eq!(config.command_timeout(), None);
    }

    #[test]
    fn test_partial_file() {
        let config = CliConfig::from_toml_str(
            "formats = [\"json\", \"yaml\"]\ncommand_timeout_secs = 30\n",
        )
        .unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.command_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(
            CliConfig::report_formats(&config.formats).unwrap(),
            vec![ReportFormat::Json, ReportFormat::Yaml]
        );
    }

    #[test]
    fn test_invalid_format_name() {
        let err = CliConfig::report_formats(&["pdf".to_string()]).unwrap_err();
        assert!(err.to_string().contains("pdf"));
    }
}
