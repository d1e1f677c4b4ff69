//! 执行进度通知
//!
//! 引擎本身不直接写日志，所有进度都通过 [`ProgressSink`] 发出。
//! 执行依赖 (进程执行器 + 进度接收者) 通过 [`ExecContext`] 显式传递。

use std::fmt;
use tracing::{debug, error, info, warn};

use crate::runner::ProcessRunner;

/// 进度消息级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProgressLevel {
    Debug,
    Info,
    Notice,
    Warning,
    Error,
}

impl fmt::Display for ProgressLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProgressLevel::Debug => "debug",
            ProgressLevel::Info => "info",
            ProgressLevel::Notice => "notice",
            ProgressLevel::Warning => "warning",
            ProgressLevel::Error => "error",
        };
        f.write_str(name)
    }
}

/// 进度接收者
///
/// 同步调用，不应长时间阻塞，否则会拖慢整个执行过程。
pub trait ProgressSink: Send + Sync {
    fn notify(&self, level: ProgressLevel, message: &str);
}

impl<F> ProgressSink for F
where
    F: Fn(ProgressLevel, &str) + Send + Sync,
{
    fn notify(&self, level: ProgressLevel, message: &str) {
        self(level, message)
    }
}

/// 转发到 tracing 日志
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn notify(&self, level: ProgressLevel, message: &str) {
        let message = message.trim_end();
        match level {
            ProgressLevel::Debug => debug!("{}", message),
            ProgressLevel::Info | ProgressLevel::Notice => info!("{}", message),
            ProgressLevel::Warning => warn!("{}", message),
            ProgressLevel::Error => error!("{}", message),
        }
    }
}

/// 丢弃所有进度消息
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn notify(&self, _level: ProgressLevel, _message: &str) {}
}

/// 执行上下文
#[derive(Clone, Copy)]
pub struct ExecContext<'a> {
    /// 外部命令执行器
    pub runner: &'a dyn ProcessRunner,

    /// 进度接收者
    pub progress: &'a dyn ProgressSink,
}

impl<'a> ExecContext<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, progress: &'a dyn ProgressSink) -> Self {
        Self { runner, progress }
    }

    pub fn debug(&self, message: &str) {
        self.progress.notify(ProgressLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.progress.notify(ProgressLevel::Info, message);
    }

    pub fn notice(&self, message: &str) {
        self.progress.notify(ProgressLevel::Notice, message);
    }

    pub fn warning(&self, message: &str) {
        self.progress.notify(ProgressLevel::Warning, message);
    }

    pub fn error(&self, message: &str) {
        self.progress.notify(ProgressLevel::Error, message);
    }
}

/// 给脚本输出加上首尾分隔标记
pub fn format_output(output: &str) -> String {
    let mut text = String::from("Displaying output:\n################### OUTPUT ##################\n");
    text.push_str(output);
    if !output.is_empty() && !output.ends_with('\n') {
        text.push('\n');
    }
    text.push_str("################ OUTPUT END #################\n");
    text
}
