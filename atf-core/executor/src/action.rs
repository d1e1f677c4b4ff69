//! 动作定义
//!
//! 动作有三种：
//! - 可执行动作：脚本或本地程序
//! - 手工动作：只有描述文本
//! - 空动作：什么都不做

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use atf_common::null_as_default;

use crate::progress::{format_output, ExecContext};
use crate::runner::ProcessRunner;
use crate::TestResult;

/// 动作分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionClass {
    Executable,
    Manual,
    Empty,
}

/// 动作类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    /// 可执行动作
    Executable {
        script: String,
        args: Vec<String>,
        /// 可选说明，不参与执行
        description: String,
    },

    /// 手工动作
    Manual { description: String },

    /// 空动作
    Empty,
}

/// 动作参数：配置文件中既可以写成一行字符串，也可以写成列表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionArgs {
    List(Vec<String>),
    Line(String),
}

impl Default for ActionArgs {
    fn default() -> Self {
        ActionArgs::List(Vec::new())
    }
}

impl ActionArgs {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            ActionArgs::List(args) => args,
            ActionArgs::Line(line) => line.split_whitespace().map(str::to_string).collect(),
        }
    }
}

/// 配置文件中的动作记录 (未分类)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDef {
    /// 脚本或程序路径
    #[serde(
        default,
        alias = "command",
        skip_serializing_if = "String::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub script: String,

    /// 参数
    #[serde(default, deserialize_with = "null_as_default")]
    pub args: ActionArgs,

    /// 描述 (主要用于手工动作)
    #[serde(default, skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub description: String,

    /// 上次执行输出
    #[serde(default, skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub output: String,

    /// 上次执行结果
    #[serde(default)]
    pub result: TestResult,
}

impl ActionDef {
    /// 根据字段判断动作分类，脚本优先于描述
    pub fn classify(&self) -> ActionClass {
        if !self.script.trim().is_empty() {
            ActionClass::Executable
        } else if !self.description.is_empty() {
            ActionClass::Manual
        } else {
            ActionClass::Empty
        }
    }
}

/// 动作
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ActionDef", into = "ActionDef")]
pub struct Action {
    kind: ActionKind,
    output: String,
    result: TestResult,
}

impl From<ActionDef> for Action {
    fn from(def: ActionDef) -> Self {
        let kind = match def.classify() {
            ActionClass::Executable => ActionKind::Executable {
                script: def.script.trim().to_string(),
                args: def.args.into_vec(),
                description: def.description,
            },
            ActionClass::Manual => ActionKind::Manual {
                description: def.description,
            },
            ActionClass::Empty => ActionKind::Empty,
        };

        Self {
            kind,
            output: def.output,
            result: def.result,
        }
    }
}

impl From<Action> for ActionDef {
    fn from(action: Action) -> Self {
        let (script, args, description) = match action.kind {
            ActionKind::Executable {
                script,
                args,
                description,
            } => (script, args, description),
            ActionKind::Manual { description } => (String::new(), Vec::new(), description),
            ActionKind::Empty => (String::new(), Vec::new(), String::new()),
        };

        Self {
            script,
            args: ActionArgs::List(args),
            description,
            output: action.output,
            result: action.result,
        }
    }
}

impl Action {
    /// 创建可执行动作
    ///
    /// 脚本路径为空时得到的是空动作。
    pub fn executable<S, I, A>(script: S, args: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        ActionDef {
            script: script.into(),
            args: ActionArgs::List(args.into_iter().map(Into::into).collect()),
            ..Default::default()
        }
        .into()
    }

    /// 创建手工动作
    ///
    /// 描述为空时得到的是空动作。
    pub fn manual(description: impl Into<String>) -> Self {
        ActionDef {
            description: description.into(),
            ..Default::default()
        }
        .into()
    }

    /// 创建空动作
    pub fn empty() -> Self {
        Self {
            kind: ActionKind::Empty,
            output: String::new(),
            result: TestResult::NotTested,
        }
    }

    pub fn kind(&self) -> &ActionKind {
        &self.kind
    }

    pub fn classify(&self) -> ActionClass {
        match self.kind {
            ActionKind::Executable { .. } => ActionClass::Executable,
            ActionKind::Manual { .. } => ActionClass::Manual,
            ActionKind::Empty => ActionClass::Empty,
        }
    }

    pub fn is_executable(&self) -> bool {
        self.classify() == ActionClass::Executable
    }

    pub fn is_manual(&self) -> bool {
        self.classify() == ActionClass::Manual
    }

    /// 脚本路径 (仅可执行动作)
    pub fn script(&self) -> Option<&str> {
        match &self.kind {
            ActionKind::Executable { script, .. } => Some(script),
            _ => None,
        }
    }

    /// 参数 (非可执行动作为空)
    pub fn args(&self) -> &[String] {
        match &self.kind {
            ActionKind::Executable { args, .. } => args,
            _ => &[],
        }
    }

    pub fn description(&self) -> &str {
        match &self.kind {
            ActionKind::Executable { description, .. } | ActionKind::Manual { description } => {
                description
            }
            ActionKind::Empty => "",
        }
    }

    /// 上次执行输出
    pub fn output(&self) -> &str {
        &self.output
    }

    /// 上次执行结果
    pub fn result(&self) -> TestResult {
        self.result
    }

    /// 执行前的初始化：结果重置为 NotTested，输出清空
    pub fn normalize(&mut self) {
        self.result = TestResult::NotTested;
        self.output.clear();
    }

    /// 执行动作
    ///
    /// - 可执行动作：调用外部执行器，成功为 Pass，否则为 Fail (启动失败时输出为诊断信息)
    /// - 手工动作：描述复制到输出，结果不变
    /// - 空动作：输出为空，结果不变
    pub async fn execute(&mut self, runner: &dyn ProcessRunner) -> (String, TestResult) {
        match &self.kind {
            ActionKind::Executable { script, args, .. } => {
                debug!("执行动作: {} {:?}", script, args);
                match runner.run(script, args).await {
                    Ok(out) => {
                        self.result = if out.is_success() {
                            TestResult::Pass
                        } else {
                            TestResult::Fail
                        };
                        self.output = out.combined_output();
                    }
                    Err(e) => {
                        self.result = TestResult::Fail;
                        self.output = e.to_string();
                    }
                }
            }
            ActionKind::Manual { description } => {
                self.output = description.clone();
            }
            ActionKind::Empty => {
                self.output.clear();
            }
        }

        (self.output.clone(), self.result)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ActionKind::Executable { script, args, .. } => {
                if args.is_empty() {
                    write!(f, "{}", script)
                } else {
                    write!(f, "{} {}", script, args.join(" "))
                }
            }
            ActionKind::Manual { description } => write!(f, "Manual Action:\n{}", description),
            ActionKind::Empty => write!(f, "No action"),
        }
    }
}

/// 执行用例 / 测试集的 setup 或 cleanup 动作
///
/// 只有可执行动作才会运行；返回 None 表示动作未定义或不可执行。
pub(crate) async fn run_fixture(
    action: Option<&mut Action>,
    what: &str,
    ctx: &ExecContext<'_>,
) -> Option<TestResult> {
    match action {
        Some(action) if action.is_executable() => {
            ctx.notice(&format!("Executing {} action: {:?}", what, action.to_string()));
            let (output, result) = action.execute(ctx.runner).await;
            ctx.info(&format_output(&output));
            ctx.debug(&format!("{} action finished with {:?}", capitalize(what), result.as_str()));
            Some(result)
        }
        _ => {
            ctx.notice(&format!("{} action is not defined.", capitalize(what)));
            None
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
