//! 测试步骤
//!
//! 一个步骤包装一个动作以及期望结果。步骤执行后根据动作的实际结果
//! 与期望结果自我评估。

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::action::Action;
use crate::progress::{format_output, ExecContext};
use crate::{ExecutorError, Result, TestResult};

/// 测试步骤
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestStep {
    /// 步骤名称
    pub name: String,

    /// 期望结果 (只有 Pass / XFail 有意义)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<TestResult>,

    /// 当前状态
    #[serde(default)]
    pub status: TestResult,

    /// 动作 (规范化之后必须存在)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
}

impl TestStep {
    pub fn new(name: &str, expected: TestResult, action: Action) -> Self {
        Self {
            name: name.to_string(),
            expected: Some(expected),
            status: TestResult::NotTested,
            action: Some(action),
        }
    }

    /// 规范化步骤
    ///
    /// 缺少动作是配置错误。可执行动作未指定期望结果时默认为 Pass。
    pub fn normalize(&mut self) -> Result<()> {
        let action = self
            .action
            .as_mut()
            .ok_or_else(|| ExecutorError::MissingAction(format!("{:?}", self.name)))?;
        action.normalize();

        self.status = TestResult::NotTested;

        if action.is_executable() && self.expected.is_none() {
            self.expected = Some(TestResult::Pass);
        }
        Ok(())
    }

    /// 根据期望结果和动作实际结果计算步骤状态
    pub fn evaluate(expected: Option<TestResult>, actual: TestResult) -> TestResult {
        match expected {
            Some(TestResult::Pass) if actual == TestResult::Pass => TestResult::Pass,
            Some(TestResult::Pass) => TestResult::Fail,
            Some(TestResult::XFail) if actual == TestResult::Pass => TestResult::Fail,
            Some(TestResult::XFail) => TestResult::Pass,
            _ => TestResult::NotTested,
        }
    }

    /// 执行步骤
    pub async fn execute(&mut self, ctx: &ExecContext<'_>) {
        ctx.info(&format!(">>> Entering test step {:?}", self.name));

        if let Some(expected) = self.expected.filter(|e| !e.is_expectation()) {
            ctx.warning(&format!(
                "Test step expects {:?}, only \"Pass\" and \"XFail\" are evaluated",
                expected.as_str()
            ));
        }

        match self.action.as_mut() {
            Some(action) => {
                if action.is_executable() {
                    ctx.notice(&format!(
                        "Executing test step action: {:?}",
                        action.to_string()
                    ));
                    let (output, result) = action.execute(ctx.runner).await;
                    ctx.info(&format_output(&output));
                    ctx.debug(&format!("Test step action finished with {:?}", result.as_str()));
                } else {
                    action.execute(ctx.runner).await;
                    ctx.notice("Test step action is not executable, nothing to run");
                }
                self.status = Self::evaluate(self.expected, action.result());
            }
            None => {
                ctx.error(&format!("Test step {:?} has no action", self.name));
                self.status = TestResult::NotTested;
            }
        }

        ctx.notice(&format!("Test step evaluated to {:?}", self.status.as_str()));
        ctx.info(&format!("<<< Leaving test step {:?}", self.name));
    }
}

impl fmt::Display for TestStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let expected = self.expected.map(|e| e.as_str()).unwrap_or("");
        let action = self
            .action
            .as_ref()
            .map(|a| a.to_string())
            .unwrap_or_else(|| "none".to_string());
        write!(
            f,
            "TestStep: {:?} expected: {:?} status: {:?} action: {:?}",
            self.name,
            expected,
            self.status.as_str(),
            action
        )
    }
}
