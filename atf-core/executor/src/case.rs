//! 测试用例
//!
//! 用例由若干步骤以及可选的 setup / cleanup 动作组成。执行完成后，
//! 用例根据期望结果 (Pass 或 XFail) 自我评估：
//! - 期望 Pass：setup / cleanup 失败或任一步骤失败，用例失败
//! - 期望 XFail：setup / cleanup 通过或任一步骤通过，用例失败
//! - 所有步骤都是 NotTested 时，用例为 NotTested (中性)
//! - 其他期望值一律为 NotTested

use serde::{Deserialize, Serialize};
use std::fmt;

use atf_common::null_as_default;

use crate::action::{run_fixture, Action};
use crate::progress::ExecContext;
use crate::step::TestStep;
use crate::{Result, TestResult};

/// 测试用例
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// 用例名称
    pub name: String,

    /// 详细描述
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    /// 期望结果 (Pass 或 XFail)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<TestResult>,

    /// 执行后的实际结果
    #[serde(default)]
    pub status: TestResult,

    /// setup 动作
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup: Option<Action>,

    /// cleanup 动作
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleanup: Option<Action>,

    /// 步骤列表
    #[serde(default, deserialize_with = "null_as_default")]
    pub steps: Vec<TestStep>,
}

impl TestCase {
    pub fn new(
        name: &str,
        description: &str,
        setup: Option<Action>,
        cleanup: Option<Action>,
        expected: TestResult,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            expected: Some(expected),
            status: TestResult::NotTested,
            setup,
            cleanup,
            steps: Vec::new(),
        }
    }

    /// 追加步骤
    pub fn append(&mut self, steps: impl IntoIterator<Item = TestStep>) {
        self.steps.extend(steps);
    }

    /// 规范化用例：补全空的 setup / cleanup，规范化所有步骤
    pub fn normalize(&mut self) -> Result<()> {
        self.setup.get_or_insert_with(Action::empty).normalize();
        self.cleanup.get_or_insert_with(Action::empty).normalize();

        for step in &mut self.steps {
            step.normalize().map_err(|e| e.within(&format!("{:?}", self.name)))?;
        }

        self.status = TestResult::NotTested;
        Ok(())
    }

    /// setup 失败后的处理：用例失败，所有步骤标记为 NotTested
    fn abort_after_setup_failure(&mut self) -> String {
        self.status = TestResult::Fail;
        for step in &mut self.steps {
            step.status = TestResult::NotTested;
        }
        format!(
            "Setup action has FAILED.\nSkipping the rest of the case {:?}...",
            self.name
        )
    }

    /// 执行用例
    pub async fn execute(&mut self, ctx: &ExecContext<'_>) {
        ctx.notice(&format!(">>> Entering test case {:?}", self.name));

        let setup = run_fixture(self.setup.as_mut(), "case setup", ctx).await;
        if setup == Some(TestResult::Fail) {
            let message = self.abort_after_setup_failure();
            ctx.error(&message);
            ctx.notice(&format!("<<< Leaving test case {:?}", self.name));
            return;
        }

        // 步骤失败不会中断后续步骤
        for step in &mut self.steps {
            step.execute(ctx).await;
        }

        run_fixture(self.cleanup.as_mut(), "case cleanup", ctx).await;

        self.evaluate();
        ctx.notice(&format!("Test case evaluated to {:?}", self.status.as_str()));
        ctx.notice(&format!("<<< Leaving test case {:?}", self.name));
    }

    /// 评估用例状态 (执行之后调用)
    pub fn evaluate(&mut self) -> TestResult {
        self.status = match self.expected {
            Some(TestResult::Pass) => self.evaluate_against(TestResult::Fail),
            Some(TestResult::XFail) => self.evaluate_against(TestResult::Pass),
            _ => TestResult::NotTested,
        };
        self.status
    }

    /// 出现 `failing` 结果即失败；全部步骤 NotTested 时为 NotTested；否则通过
    fn evaluate_against(&self, failing: TestResult) -> TestResult {
        let fixture_result = |action: &Option<Action>| action.as_ref().map(Action::result);

        if fixture_result(&self.setup) == Some(failing)
            || fixture_result(&self.cleanup) == Some(failing)
            || self.steps.iter().any(|s| s.status == failing)
        {
            return TestResult::Fail;
        }

        if self.steps.iter().all(|s| s.status == TestResult::NotTested) {
            return TestResult::NotTested;
        }

        TestResult::Pass
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let expected = self.expected.map(|e| e.as_str()).unwrap_or("");
        writeln!(f, "Test Case: {:?}\n\tstatus: {}", self.name, self.status)?;
        writeln!(f, "\tDescription: {:?}", self.description)?;
        writeln!(f, "\tExpected: {}", expected)?;
        match &self.setup {
            Some(setup) => writeln!(f, "\tSetup: {}", setup)?,
            None => writeln!(f, "\tSetup: none")?,
        }
        match &self.cleanup {
            Some(cleanup) => writeln!(f, "\tCleanup: {}", cleanup)?,
            None => writeln!(f, "\tCleanup: none")?,
        }
        if self.steps.is_empty() {
            writeln!(f, "\tSteps: empty")?;
        }
        for step in &self.steps {
            writeln!(f, "\t{}", step)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_with_status(status: TestResult) -> TestStep {
        TestStep {
            name: format!("{}", status),
            expected: Some(TestResult::Pass),
            status,
            action: Some(Action::empty()),
        }
    }

    fn case_with(expected: Option<TestResult>, statuses: &[TestResult]) -> TestCase {
        TestCase {
            name: "case".to_string(),
            expected,
            steps: statuses.iter().copied().map(step_with_status).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_evaluate_expected_pass() {
        use TestResult::*;
        assert_eq!(case_with(Some(Pass), &[Pass, Pass]).evaluate(), Pass);
        assert_eq!(case_with(Some(Pass), &[Pass, Fail]).evaluate(), Fail);
        assert_eq!(case_with(Some(Pass), &[Pass, NotTested]).evaluate(), Pass);
        assert_eq!(case_with(Some(Pass), &[NotTested, NotTested]).evaluate(), NotTested);
        assert_eq!(case_with(Some(Pass), &[]).evaluate(), NotTested);
    }

    #[test]
    fn test_evaluate_expected_xfail() {
        use TestResult::*;
        assert_eq!(case_with(Some(XFail), &[Fail, Fail]).evaluate(), Pass);
        assert_eq!(case_with(Some(XFail), &[Fail, Pass]).evaluate(), Fail);
        assert_eq!(case_with(Some(XFail), &[NotTested]).evaluate(), NotTested);
    }

    #[test]
    fn test_evaluate_other_expectation_is_not_tested() {
        use TestResult::*;
        assert_eq!(case_with(None, &[Pass]).evaluate(), NotTested);
        assert_eq!(case_with(Some(Fail), &[Fail]).evaluate(), NotTested);
        assert_eq!(case_with(Some(Unknown), &[Pass]).evaluate(), NotTested);
    }

    #[test]
    fn test_evaluate_fixture_results() {
        use TestResult::*;
        let failed: Action = serde_json::from_str(r#"{"script": "s", "result": "Fail"}"#).unwrap();
        let passed: Action = serde_json::from_str(r#"{"script": "s", "result": "Pass"}"#).unwrap();

        let mut case = case_with(Some(Pass), &[Pass]);
        case.cleanup = Some(failed.clone());
        assert_eq!(case.evaluate(), Fail);

        let mut case = case_with(Some(Pass), &[Pass]);
        case.setup = Some(failed);
        assert_eq!(case.evaluate(), Fail);

        // 期望失败时，setup / cleanup 通过本身就是失败条件
        let mut case = case_with(Some(XFail), &[Fail]);
        case.cleanup = Some(passed.clone());
        assert_eq!(case.evaluate(), Fail);

        let mut case = case_with(Some(XFail), &[Fail]);
        case.setup = Some(passed);
        assert_eq!(case.evaluate(), Fail);
    }

    #[test]
    fn test_normalize_defaults_fixtures_once() {
        let mut case = TestCase {
            name: "c".to_string(),
            steps: vec![TestStep::new("s", TestResult::Pass, Action::executable("true", Vec::<String>::new()))],
            ..Default::default()
        };
        case.normalize().unwrap();
        assert_eq!(case.setup, Some(Action::empty()));
        assert_eq!(case.cleanup, Some(Action::empty()));

        let once = case.clone();
        case.normalize().unwrap();
        assert_eq!(case, once);
    }

    #[test]
    fn test_normalize_reports_case_name() {
        let mut case = TestCase {
            name: "login".to_string(),
            steps: vec![TestStep {
                name: "type password".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let err = case.normalize().unwrap_err().to_string();
        assert!(err.contains("login"));
        assert!(err.contains("type password"));
    }
}
