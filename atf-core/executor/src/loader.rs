//! 测试集配置加载
//!
//! 根据文件扩展名选择格式 (JSON / YAML / XML)，反序列化后立即规范化，得到可执行的测试集。

use std::path::Path;
use tracing::info;

use crate::set::TestSet;
use crate::{ExecutorError, Result};

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
    Xml,
}

impl ConfigFormat {
    /// 根据扩展名判断格式
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(ConfigFormat::Json),
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("xml") => Ok(ConfigFormat::Xml),
            _ => Err(ExecutorError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// 解析配置文本
    pub fn parse(&self, text: &str) -> Result<TestSet> {
        match self {
            ConfigFormat::Json => TestSet::from_json_str(text),
            ConfigFormat::Yaml => TestSet::from_yaml_str(text),
            ConfigFormat::Xml => TestSet::from_xml_str(text),
        }
    }
}

/// 加载并规范化测试集
pub fn collect<P: AsRef<Path>>(path: P) -> Result<TestSet> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;

    let content = std::fs::read_to_string(path)?;
    let mut set = format.parse(&content)?;
    set.normalize()?;

    info!(
        "测试集加载成功: {} ({} 个用例, {} 个步骤)",
        set.name,
        set.cases.len(),
        set.step_count()
    );
    Ok(set)
}
