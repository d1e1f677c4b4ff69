//! ATF 执行器
//!
//! 层级测试执行引擎：测试集 (TestSet) 由测试用例 (TestCase) 组成，
//! 测试用例由测试步骤 (TestStep) 组成，每个步骤包装一个动作 (Action)。
//!
//! 执行严格串行：`TestSet::execute` 依次驱动每个用例，用例依次驱动每个步骤，
//! 步骤驱动动作。结果自下而上回传：动作结果 → 步骤状态 → 用例状态。
//!
//! # 示例
//!
//! ```ignore
//! use atf_executor::{collect, ExecContext, LocalRunner, TracingProgress};
//!
//! let mut set = collect("tests/smoke.yaml")?;
//! let runner = LocalRunner::new();
//! let ctx = ExecContext::new(&runner, &TracingProgress);
//! set.execute(&ctx).await;
//! ```

pub mod action;
pub mod case;
pub mod loader;
pub mod plan;
pub mod progress;
pub mod runner;
pub mod set;
pub mod step;
pub mod xml;

pub use action::{Action, ActionArgs, ActionClass, ActionDef, ActionKind};
pub use atf_common::{SysUnderTest, TestResult};
pub use case::TestCase;
pub use loader::{collect, ConfigFormat};
pub use plan::TestPlan;
pub use progress::{format_output, ExecContext, NullProgress, ProgressLevel, ProgressSink, TracingProgress};
pub use runner::{CommandOutput, LocalRunner, ProcessRunner, ScriptType};
pub use set::TestSet;
pub use step::TestStep;
pub use xml::XmlTestSet;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("测试步骤缺少动作: {0}")]
    MissingAction(String),

    #[error("无效的值: {0}")]
    InvalidValue(String),

    #[error("不支持的脚本类型: {0}")]
    UnsupportedScript(String),

    #[error("不支持的配置文件格式: {0}")]
    UnsupportedFormat(String),

    #[error("启动进程失败: {0}")]
    LaunchFailed(String),

    #[error("命令执行超时: {0}")]
    Timeout(String),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    SerdeError(String),
}

impl ExecutorError {
    /// 为配置错误补充所在层级 (测试集 / 用例) 的名称
    pub(crate) fn within(self, scope: &str) -> Self {
        match self {
            ExecutorError::MissingAction(path) => {
                ExecutorError::MissingAction(format!("{} / {}", scope, path))
            }
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExecutorError>;
