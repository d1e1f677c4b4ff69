//! 报告文件输出

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::info;

use crate::html;
use crate::report::TestReport;
use crate::{ReportError, Result};

/// 报告格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportFormat {
    Html,
    Json,
    Yaml,
    Xml,
}

impl ReportFormat {
    /// 文件扩展名
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Json => "json",
            ReportFormat::Yaml => "yaml",
            ReportFormat::Xml => "xml",
        }
    }

    /// 渲染报告内容
    pub fn render(&self, report: &TestReport) -> Result<String> {
        match self {
            ReportFormat::Html => Ok(html::render(report)),
            ReportFormat::Json => report.to_json(),
            ReportFormat::Yaml => report.to_yaml(),
            ReportFormat::Xml => report.to_xml(),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" | "htm" => Ok(ReportFormat::Html),
            "json" => Ok(ReportFormat::Json),
            "yaml" | "yml" => Ok(ReportFormat::Yaml),
            "xml" => Ok(ReportFormat::Xml),
            _ => Err(ReportError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// 报告写入器
///
/// 每种格式写一个 `report.<ext>` 文件，同名文件会被覆盖。
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
    formats: Vec<ReportFormat>,
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ReportWriter {
    /// 输出目录为空时使用当前目录；默认只生成 HTML 报告
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        let dir = if dir.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            dir.to_path_buf()
        };

        Self {
            dir,
            formats: vec![ReportFormat::Html],
        }
    }

    /// 替换输出格式列表 (重复项只保留一次)
    pub fn with_formats(mut self, formats: impl IntoIterator<Item = ReportFormat>) -> Self {
        self.formats.clear();
        for format in formats {
            if !self.formats.contains(&format) {
                self.formats.push(format);
            }
        }
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn formats(&self) -> &[ReportFormat] {
        &self.formats
    }

    /// 生成所有报告文件，返回写入的路径
    pub fn write(&self, report: &TestReport) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.dir)?;

        let mut written = Vec::with_capacity(self.formats.len());
        for format in &self.formats {
            let contents = format.render(report)?;
            let path = self.dir.join(format!("report.{}", format.extension()));
            std::fs::write(&path, contents)?;

            info!("报告已生成: {}", path.display());
            written.push(path);
        }
        Ok(written)
    }
}
