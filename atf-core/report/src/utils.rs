//! 时间戳与文件名辅助函数

use chrono::Local;
use std::path::{Path, PathBuf};

/// 报告中使用的时间格式
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 文件名中使用的时间格式
pub const FILE_STAMP_FORMAT: &str = "%Y_%m_%d_%H_%M_%S";

/// 当前本地时间，例如 `2024-05-01 13:04:59`
pub fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// 可用于文件名的当前时间，例如 `2024_05_01_13_04_59`
pub fn now_file_stamp() -> String {
    Local::now().format(FILE_STAMP_FORMAT).to_string()
}

/// 把空格、冒号和连字符替换为下划线
pub fn file_safe(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            ' ' | ':' | '-' => '_',
            other => other,
        })
        .collect()
}

/// 按报告名称和当前时间生成子目录，例如 `reports/nightly_run_2024_05_01_13_04_59`
pub fn stamped_dir<P: AsRef<Path>>(base: P, name: &str) -> PathBuf {
    let name = file_safe(name.trim());
    let dir = if name.is_empty() {
        now_file_stamp()
    } else {
        format!("{}_{}", name, now_file_stamp())
    };
    base.as_ref().join(dir)
}

/// HTML 转义
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
