//! XML 测试集格式
//!
//! 兼容已有的 XML 测试定义：名称、期望结果和状态是属性，其他内容是子元素，
//! 每个步骤的动作放在 `<Action>` 元素中。
//!
//! ```xml
//! <TestSet name="smoke">
//!   <Description>...</Description>
//!   <SystemUnderTest name="box"><Type>SW</Type></SystemUnderTest>
//!   <Setup><Script>/usr/bin/prepare</Script><Args>--fast</Args></Setup>
//!   <Cases>
//!     <TestCase name="ping" expected="Pass">
//!       <Steps>
//!         <TestStep name="ping localhost">
//!           <Action><Script>ping</Script><Args>-c 1 localhost</Args></Action>
//!         </TestStep>
//!       </Steps>
//!     </TestCase>
//!   </Cases>
//! </TestSet>
//! ```

use serde::{Deserialize, Serialize};

use crate::action::{Action, ActionArgs, ActionClass, ActionDef};
use crate::case::TestCase;
use crate::set::TestSet;
use crate::step::TestStep;
use crate::{ExecutorError, Result, SysUnderTest, TestResult};

/// 状态属性为空时视为 NotTested
fn parse_status(value: &str) -> TestResult {
    if value.trim().is_empty() {
        TestResult::NotTested
    } else {
        TestResult::from_name(value.trim())
    }
}

/// 期望属性为空时视为未设置
fn parse_expected(value: Option<String>) -> Option<TestResult> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| TestResult::from_name(v.trim()))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct XmlAction {
    #[serde(rename = "@result", default)]
    result: String,

    #[serde(rename = "@executable", default)]
    executable: bool,

    #[serde(rename = "@manual", default)]
    manual: bool,

    #[serde(rename = "Script", default, skip_serializing_if = "String::is_empty")]
    script: String,

    #[serde(rename = "Args", default, skip_serializing_if = "String::is_empty")]
    args: String,

    #[serde(rename = "Output", default, skip_serializing_if = "String::is_empty")]
    output: String,

    #[serde(rename = "Description", default, skip_serializing_if = "String::is_empty")]
    description: String,
}

impl From<&Action> for XmlAction {
    fn from(action: &Action) -> Self {
        let class = action.classify();
        let def = ActionDef::from(action.clone());
        Self {
            result: def.result.as_str().to_string(),
            executable: class == ActionClass::Executable,
            manual: class == ActionClass::Manual,
            script: def.script,
            args: def.args.into_vec().join(" "),
            output: def.output,
            description: def.description,
        }
    }
}

impl From<XmlAction> for Action {
    // executable / manual 属性只是输出，分类总是由内容决定
    fn from(xml: XmlAction) -> Self {
        ActionDef {
            script: xml.script,
            args: ActionArgs::Line(xml.args),
            description: xml.description,
            output: xml.output,
            result: parse_status(&xml.result),
        }
        .into()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct XmlSut {
    #[serde(rename = "@name", default)]
    name: String,

    #[serde(rename = "Type", default)]
    system_type: String,

    #[serde(rename = "Version", default)]
    version: String,

    #[serde(rename = "Description", default)]
    description: String,

    #[serde(rename = "IPAddress", default)]
    ip_address: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct XmlStep {
    #[serde(rename = "@name", default)]
    name: String,

    #[serde(rename = "@expected", default, skip_serializing_if = "Option::is_none")]
    expected: Option<String>,

    #[serde(rename = "@status", default)]
    status: String,

    #[serde(rename = "Action", default, skip_serializing_if = "Option::is_none")]
    action: Option<XmlAction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct XmlSteps {
    #[serde(rename = "TestStep", default)]
    items: Vec<XmlStep>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct XmlCase {
    #[serde(rename = "@name", default)]
    name: String,

    #[serde(rename = "@expected", default, skip_serializing_if = "Option::is_none")]
    expected: Option<String>,

    #[serde(rename = "@status", default)]
    status: String,

    #[serde(rename = "Description", default, skip_serializing_if = "String::is_empty")]
    description: String,

    #[serde(rename = "Setup", default, skip_serializing_if = "Option::is_none")]
    setup: Option<XmlAction>,

    #[serde(rename = "Cleanup", default, skip_serializing_if = "Option::is_none")]
    cleanup: Option<XmlAction>,

    #[serde(rename = "Steps", default)]
    steps: XmlSteps,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct XmlCases {
    #[serde(rename = "TestCase", default)]
    items: Vec<XmlCase>,
}

/// `<TestSet>` 元素
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct XmlTestSet {
    #[serde(rename = "@name", default)]
    name: String,

    #[serde(rename = "Description", default, skip_serializing_if = "String::is_empty")]
    description: String,

    #[serde(rename = "TestPlan", default, skip_serializing_if = "String::is_empty")]
    test_plan: String,

    #[serde(rename = "SystemUnderTest", default, skip_serializing_if = "Option::is_none")]
    sut: Option<XmlSut>,

    #[serde(rename = "Setup", default, skip_serializing_if = "Option::is_none")]
    setup: Option<XmlAction>,

    #[serde(rename = "Cleanup", default, skip_serializing_if = "Option::is_none")]
    cleanup: Option<XmlAction>,

    #[serde(rename = "Cases", default)]
    cases: XmlCases,
}

impl From<&TestSet> for XmlTestSet {
    fn from(set: &TestSet) -> Self {
        let cases = set
            .cases
            .iter()
            .map(|case| XmlCase {
                name: case.name.clone(),
                expected: case.expected.map(|e| e.as_str().to_string()),
                status: case.status.as_str().to_string(),
                description: case.description.clone(),
                setup: case.setup.as_ref().map(XmlAction::from),
                cleanup: case.cleanup.as_ref().map(XmlAction::from),
                steps: XmlSteps {
                    items: case
                        .steps
                        .iter()
                        .map(|step| XmlStep {
                            name: step.name.clone(),
                            expected: step.expected.map(|e| e.as_str().to_string()),
                            status: step.status.as_str().to_string(),
                            action: step.action.as_ref().map(XmlAction::from),
                        })
                        .collect(),
                },
            })
            .collect();

        Self {
            name: set.name.clone(),
            description: set.description.clone(),
            test_plan: set.test_plan.clone(),
            sut: set.sut.as_ref().map(|sut| XmlSut {
                name: sut.name.clone(),
                system_type: sut.system_type.clone(),
                version: sut.version.clone(),
                description: sut.description.clone(),
                ip_address: sut.ip_address.clone(),
            }),
            setup: set.setup.as_ref().map(XmlAction::from),
            cleanup: set.cleanup.as_ref().map(XmlAction::from),
            cases: XmlCases { items: cases },
        }
    }
}

impl From<XmlTestSet> for TestSet {
    fn from(xml: XmlTestSet) -> Self {
        let cases = xml
            .cases
            .items
            .into_iter()
            .map(|case| TestCase {
                name: case.name,
                description: case.description,
                expected: parse_expected(case.expected),
                status: parse_status(&case.status),
                setup: case.setup.map(Action::from),
                cleanup: case.cleanup.map(Action::from),
                steps: case
                    .steps
                    .items
                    .into_iter()
                    .map(|step| TestStep {
                        name: step.name,
                        expected: parse_expected(step.expected),
                        status: parse_status(&step.status),
                        action: step.action.map(Action::from),
                    })
                    .collect(),
            })
            .collect();

        TestSet {
            name: xml.name,
            description: xml.description,
            test_plan: xml.test_plan,
            sut: xml.sut.map(|sut| SysUnderTest {
                name: sut.name,
                system_type: sut.system_type,
                version: sut.version,
                description: sut.description,
                ip_address: sut.ip_address,
            }),
            setup: xml.setup.map(Action::from),
            cleanup: xml.cleanup.map(Action::from),
            cases,
        }
    }
}

/// 解析 `<TestSet>` 文档
pub fn from_str(xml: &str) -> Result<TestSet> {
    let set: XmlTestSet =
        quick_xml::de::from_str(xml).map_err(|e| ExecutorError::SerdeError(e.to_string()))?;
    Ok(set.into())
}

/// 输出 `<TestSet>` 文档
pub fn to_string(set: &TestSet) -> Result<String> {
    quick_xml::se::to_string_with_root("TestSet", &XmlTestSet::from(set))
        .map_err(|e| ExecutorError::SerdeError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SET_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<TestSet name="smoke">
  <Description>basic checks</Description>
  <TestPlan>nightly</TestPlan>
  <SystemUnderTest name="box">
    <Type>SW</Type>
    <Version>1.0</Version>
    <IPAddress>127.0.0.1</IPAddress>
  </SystemUnderTest>
  <Setup executable="true">
    <Script>/usr/bin/prepare</Script>
    <Args>--fast --quiet</Args>
  </Setup>
  <Cases>
    <TestCase name="ping" expected="Pass">
      <Steps>
        <TestStep name="ping localhost" expected="" status="">
          <Action>
            <Script>ping</Script>
            <Args>-c 1 localhost</Args>
          </Action>
        </TestStep>
        <TestStep name="look at LEDs">
          <Action manual="true">
            <Description>all LEDs are green</Description>
          </Action>
        </TestStep>
      </Steps>
    </TestCase>
    <TestCase name="empty" expected="XFail">
      <Steps/>
    </TestCase>
  </Cases>
</TestSet>
"#;

    #[test]
    fn test_parse_schema() {
        let set = from_str(SET_XML).unwrap();
        assert_eq!(set.name, "smoke");
        assert_eq!(set.description, "basic checks");
        assert_eq!(set.test_plan, "nightly");

        let sut = set.sut.as_ref().unwrap();
        assert_eq!(sut.name, "box");
        assert_eq!(sut.system_type, "SW");
        assert_eq!(sut.ip_address, "127.0.0.1");

        let setup = set.setup.as_ref().unwrap();
        assert_eq!(setup.script(), Some("/usr/bin/prepare"));
        assert_eq!(setup.args(), &["--fast", "--quiet"]);
        assert!(set.cleanup.is_none());

        assert_eq!(set.cases.len(), 2);
        let ping = &set.cases[0];
        assert_eq!(ping.expected, Some(TestResult::Pass));
        assert_eq!(ping.steps.len(), 2);
        assert_eq!(ping.steps[0].expected, None);
        assert_eq!(ping.steps[0].status, TestResult::NotTested);
        assert_eq!(ping.steps[0].action.as_ref().unwrap().args(), &["-c", "1", "localhost"]);
        assert!(ping.steps[1].action.as_ref().unwrap().is_manual());

        assert_eq!(set.cases[1].expected, Some(TestResult::XFail));
        assert!(set.cases[1].steps.is_empty());
    }

    #[test]
    fn test_round_trip() {
        let mut set = from_str(SET_XML).unwrap();
        set.normalize().unwrap();

        let xml = to_string(&set).unwrap();
        assert!(xml.starts_with("<TestSet name=\"smoke\""));
        assert!(xml.contains("<TestStep name=\"ping localhost\" expected=\"Pass\" status=\"NotTested\">"));

        let back = from_str(&xml).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_escaping_survives_round_trip() {
        let mut case = TestCase::new("a < b & c", "", None, None, TestResult::Pass);
        case.append([TestStep::new(
            "compare",
            TestResult::Pass,
            Action::executable("test", ["1", "-lt", "2"]),
        )]);
        let mut set = TestSet::new("escape \"quotes\"", "", None, None, None);
        set.append([case]);

        let back = from_str(&to_string(&set).unwrap()).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_malformed_document() {
        assert!(matches!(
            from_str("<TestSet name=\"x\"><Cases>"),
            Err(ExecutorError::SerdeError(_))
        ));
    }
}
