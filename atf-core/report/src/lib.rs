//! ATF 报告
//!
//! 测试报告就是执行过的测试集加上开始 / 结束时间戳，可以渲染为
//! HTML、JSON、YAML 或 XML，并以 `report.<ext>` 文件写入指定目录。

pub mod html;
pub mod report;
pub mod utils;
pub mod writer;

pub use report::{ReportSummary, TestReport};
pub use writer::{ReportFormat, ReportWriter};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("未知的报告格式: {0}")]
    UnknownFormat(String),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    SerdeError(String),
}

pub type Result<T> = std::result::Result<T, ReportError>;
