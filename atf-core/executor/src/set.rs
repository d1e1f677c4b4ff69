//! 测试集
//!
//! 测试集是测试计划的可执行版本：有序的用例列表、被测系统描述以及
//! setup / cleanup 动作。测试集本身没有汇总状态，汇总由报告模块完成。

use serde::{Deserialize, Serialize};
use std::fmt;

use atf_common::null_as_default;

use crate::action::{run_fixture, Action};
use crate::case::TestCase;
use crate::plan::TestPlan;
use crate::progress::ExecContext;
use crate::{ExecutorError, Result, SysUnderTest, TestResult};

/// 测试集
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSet {
    /// 测试集名称
    pub name: String,

    /// 描述
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    /// 所属测试计划名称
    #[serde(default, deserialize_with = "null_as_default")]
    pub test_plan: String,

    /// 被测系统
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sut: Option<SysUnderTest>,

    /// setup 动作
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup: Option<Action>,

    /// cleanup 动作
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleanup: Option<Action>,

    /// 用例列表
    #[serde(default, deserialize_with = "null_as_default")]
    pub cases: Vec<TestCase>,
}

impl TestSet {
    pub fn new(
        name: &str,
        description: &str,
        sut: Option<SysUnderTest>,
        setup: Option<Action>,
        cleanup: Option<Action>,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            test_plan: String::new(),
            sut,
            setup,
            cleanup,
            cases: Vec::new(),
        }
    }

    /// 从 YAML 字符串加载测试集 (未规范化)
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| ExecutorError::SerdeError(e.to_string()))
    }

    /// 从 JSON 字符串加载测试集 (未规范化)
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ExecutorError::SerdeError(e.to_string()))
    }

    /// 从 XML 字符串加载测试集 (未规范化)
    pub fn from_xml_str(xml: &str) -> Result<Self> {
        crate::xml::from_str(xml)
    }

    /// 导出为 XML
    pub fn to_xml(&self) -> Result<String> {
        crate::xml::to_string(self)
    }

    /// 导出为 YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| ExecutorError::SerdeError(e.to_string()))
    }

    /// 导出为 JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ExecutorError::SerdeError(e.to_string()))
    }

    /// 追加用例
    pub fn append(&mut self, cases: impl IntoIterator<Item = TestCase>) {
        self.cases.extend(cases);
    }

    /// 转换为测试计划 (深拷贝，不包含被测系统)
    pub fn to_test_plan(&self) -> TestPlan {
        TestPlan {
            name: self.test_plan.clone(),
            description: self.description.clone(),
            setup: self.setup.clone(),
            cleanup: self.cleanup.clone(),
            cases: self.cases.clone(),
        }
    }

    /// 规范化测试集，执行前必须调用
    pub fn normalize(&mut self) -> Result<()> {
        self.setup.get_or_insert_with(Action::empty).normalize();
        self.cleanup.get_or_insert_with(Action::empty).normalize();

        for case in &mut self.cases {
            case.normalize().map_err(|e| e.within(&format!("{:?}", self.name)))?;
        }
        Ok(())
    }

    /// 检查期望结果：只有 Pass 和 XFail 有意义，其他值执行后一律为 NotTested
    pub fn expectation_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for case in &self.cases {
            if let Some(expected) = case.expected.filter(|e| !e.is_expectation()) {
                warnings.push(format!(
                    "test case {:?} expects {:?}, it will evaluate to NotTested",
                    case.name,
                    expected.as_str()
                ));
            }
            for step in &case.steps {
                if let Some(expected) = step.expected.filter(|e| !e.is_expectation()) {
                    warnings.push(format!(
                        "test step {:?} / {:?} expects {:?}, it will evaluate to NotTested",
                        case.name,
                        step.name,
                        expected.as_str()
                    ));
                }
            }
        }
        warnings
    }

    /// 所有步骤的总数
    pub fn step_count(&self) -> usize {
        self.cases.iter().map(|c| c.steps.len()).sum()
    }

    /// setup 失败后的处理：所有用例的所有步骤标记为 NotTested
    fn abort_after_setup_failure(&mut self) -> String {
        for case in &mut self.cases {
            for step in &mut case.steps {
                step.status = TestResult::NotTested;
            }
        }
        format!(
            "Setup has FAILED.\nStopping the execution of test set {:?}.",
            self.name
        )
    }

    /// 执行整个测试集
    pub async fn execute(&mut self, ctx: &ExecContext<'_>) {
        ctx.notice(&format!(">>> Entering test set {:?}", self.name));

        let setup = run_fixture(self.setup.as_mut(), "set setup", ctx).await;
        if setup == Some(TestResult::Fail) {
            let message = self.abort_after_setup_failure();
            ctx.error(&message);
        } else {
            for case in &mut self.cases {
                case.execute(ctx).await;
            }
        }

        // setup 失败时 cleanup 仍然执行
        run_fixture(self.cleanup.as_mut(), "set cleanup", ctx).await;

        ctx.notice(&format!("<<< Leaving test set {:?}", self.name));
    }
}

impl fmt::Display for TestSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "TestSet: {:?} is owned by {:?} test plan.",
            self.name, self.test_plan
        )?;
        writeln!(f, "  Description:\n{:?}", self.description)?;
        if let Some(sut) = &self.sut {
            writeln!(f, "  SUT:\n{}\n", sut)?;
        }
        match &self.setup {
            Some(setup) => writeln!(f, "  Setup: {}", setup)?,
            None => writeln!(f, "  Setup: []")?,
        }
        match &self.cleanup {
            Some(cleanup) => writeln!(f, "  Cleanup: {}", cleanup)?,
            None => writeln!(f, "  Cleanup: []")?,
        }
        for case in &self.cases {
            write!(f, "\n{}", case)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::TestStep;

    fn sample_set() -> TestSet {
        let mut case = TestCase::new("case", "", None, None, TestResult::Pass);
        case.append([TestStep::new(
            "step",
            TestResult::Pass,
            Action::executable("true", Vec::<String>::new()),
        )]);

        let mut set = TestSet::new("set", "sample", None, None, None);
        set.test_plan = "plan".to_string();
        set.append([case]);
        set
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut set = sample_set();
        set.normalize().unwrap();
        let once = set.clone();
        set.normalize().unwrap();
        assert_eq!(set, once);
        assert_eq!(set.setup, Some(Action::empty()));
    }

    #[test]
    fn test_normalize_error_path() {
        let mut set = sample_set();
        set.cases[0].steps.push(TestStep {
            name: "broken".to_string(),
            ..Default::default()
        });
        let err = set.normalize().unwrap_err().to_string();
        assert!(err.contains("\"set\" / \"case\" / \"broken\""), "{}", err);
    }

    #[test]
    fn test_to_test_plan_is_deep_copy() {
        let mut set = sample_set();
        let plan = set.to_test_plan();
        set.cases[0].name = "renamed".to_string();

        assert_eq!(plan.name, "plan");
        assert_eq!(plan.cases[0].name, "case");
    }

    #[test]
    fn test_json_round_trip_keeps_structure() {
        let set = sample_set();
        let json = set.to_json().unwrap();
        assert!(json.contains("\"script\": \"true\""));
        let back = TestSet::from_json_str(&json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_from_yaml_str() {
        let yaml = r#"
name: smoke
sut:
  name: box
  type: SW
setup:
  script: /usr/bin/prepare
  args: "--fast --quiet"
cases:
  - name: ping
    expected: Pass
    steps:
      - name: ping localhost
        action:
          script: ping
          args: ["-c", "1", "localhost"]
      - name: look at LEDs
        action:
          description: all LEDs are green
"#;
        let set = TestSet::from_yaml_str(yaml).unwrap();
        assert_eq!(set.name, "smoke");
        assert_eq!(set.sut.as_ref().unwrap().system_type, "SW");
        assert_eq!(set.setup.as_ref().unwrap().args(), &["--fast", "--quiet"]);
        assert_eq!(set.cases[0].steps.len(), 2);
        assert!(set.cases[0].steps[1].action.as_ref().unwrap().is_manual());
        assert_eq!(set.step_count(), 2);
    }

    #[test]
    fn test_yaml_null_fields_load_as_defaults() {
        let yaml = r#"
name: nulls
description:
cases:
  - name: ping
    status:
    steps:
      - name: ping once
        status:
        action:
          script: ping
          args:
          description:
"#;
        let mut set = TestSet::from_yaml_str(yaml).unwrap();
        assert_eq!(set.description, "");

        let step = &set.cases[0].steps[0];
        assert_eq!(step.status, TestResult::NotTested);
        assert!(step.action.as_ref().unwrap().args().is_empty());
        assert_eq!(set.cases[0].status, TestResult::NotTested);
        set.normalize().unwrap();
    }

    #[test]
    fn test_json_null_fields_load_as_defaults() {
        let json = r#"{
            "name": "nulls",
            "test_plan": null,
            "cases": [{
                "name": "c",
                "status": null,
                "expected": null,
                "steps": [{"name": "s", "action": {"script": "true", "args": null, "output": null, "result": null}}]
            }]
        }"#;
        let set = TestSet::from_json_str(json).unwrap();
        assert_eq!(set.test_plan, "");
        assert_eq!(set.cases[0].expected, None);

        let action = set.cases[0].steps[0].action.as_ref().unwrap();
        assert!(action.is_executable());
        assert!(action.args().is_empty());
        assert_eq!(action.result(), TestResult::NotTested);
    }

    #[test]
    fn test_json_null_case_list() {
        let set = TestSet::from_json_str(r#"{"name": "empty", "cases": null}"#).unwrap();
        assert!(set.cases.is_empty());
    }

    #[test]
    fn test_xml_round_trip() {
        let mut set = sample_set();
        set.sut = Some(SysUnderTest::new("box", "SW", "2.0", "", "10.1.1.1"));
        set.normalize().unwrap();

        let back = TestSet::from_xml_str(&set.to_xml().unwrap()).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_expectation_warnings() {
        let mut set = sample_set();
        assert!(set.expectation_warnings().is_empty());

        set.cases[0].expected = Some(TestResult::Fail);
        set.cases[0].steps[0].expected = Some(TestResult::Unknown);
        let warnings = set.expectation_warnings();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("\"case\" expects \"Fail\""));
        assert!(warnings[1].contains("\"step\" expects \"UnknownResult\""));
    }
}
