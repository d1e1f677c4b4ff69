//! 测试报告

use serde::{Deserialize, Serialize};
use std::fmt;

use atf_common::TestResult;
use atf_executor::{TestSet, XmlTestSet};

use crate::utils::now_timestamp;
use crate::{ReportError, Result};

/// 测试报告
///
/// 执行过的测试集加上执行开始 / 结束时间 (`%Y-%m-%d %H:%M:%S`)。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestReport {
    /// 执行过的测试集
    pub test_set: TestSet,

    /// 开始时间
    #[serde(default)]
    pub started: String,

    /// 结束时间
    #[serde(default)]
    pub finished: String,
}

impl TestReport {
    /// 创建报告，不带时间戳
    pub fn new(test_set: TestSet) -> Self {
        Self {
            test_set,
            started: String::new(),
            finished: String::new(),
        }
    }

    /// 创建报告并记录开始时间
    pub fn start(test_set: TestSet) -> Self {
        let mut report = Self::new(test_set);
        report.started = now_timestamp();
        report
    }

    /// 记录结束时间
    pub fn finish(&mut self) {
        self.finished = now_timestamp();
    }

    /// 报告名称 (即测试集名称)
    pub fn name(&self) -> &str {
        &self.test_set.name
    }

    /// 统计用例状态
    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary::default();
        for case in &self.test_set.cases {
            summary.total += 1;
            match case.status {
                TestResult::Pass => summary.pass_count += 1,
                TestResult::Fail => summary.fail_count += 1,
                TestResult::NotTested => summary.not_tested_count += 1,
                _ => summary.other_count += 1,
            }
        }
        summary
    }

    /// 导出为 JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ReportError::SerdeError(e.to_string()))
    }

    /// 导出为 YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| ReportError::SerdeError(e.to_string()))
    }

    /// 导出为 XML，测试集部分与 XML 测试定义的结构相同
    pub fn to_xml(&self) -> Result<String> {
        let doc = XmlReport {
            test_set: XmlTestSet::from(&self.test_set),
            started: self.started.clone(),
            finished: self.finished.clone(),
        };
        quick_xml::se::to_string_with_root("TestReport", &doc)
            .map_err(|e| ReportError::SerdeError(e.to_string()))
    }

    /// 从 XML 读取报告
    pub fn from_xml_str(xml: &str) -> Result<Self> {
        let doc: XmlReport =
            quick_xml::de::from_str(xml).map_err(|e| ReportError::SerdeError(e.to_string()))?;
        Ok(Self {
            test_set: doc.test_set.into(),
            started: doc.started,
            finished: doc.finished,
        })
    }
}

/// `<TestReport>` 元素
#[derive(Debug, Serialize, Deserialize)]
struct XmlReport {
    #[serde(rename = "TestSet")]
    test_set: XmlTestSet,

    #[serde(rename = "Started", default)]
    started: String,

    #[serde(rename = "Finished", default)]
    finished: String,
}

impl fmt::Display for TestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TestReport: {}\nstarted: {}\nfinished: {}\n",
            self.test_set, self.started, self.finished
        )
    }
}

/// 用例状态统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: usize,
    pub pass_count: usize,
    pub fail_count: usize,
    pub not_tested_count: usize,
    pub other_count: usize,
}

impl ReportSummary {
    /// 没有失败的用例，且至少有一个用例通过
    pub fn passed(&self) -> bool {
        self.fail_count == 0 && self.pass_count > 0
    }
}

impl fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cases: {} passed, {} failed, {} not tested",
            self.total, self.pass_count, self.fail_count, self.not_tested_count
        )?;
        if self.other_count > 0 {
            write!(f, ", {} other", self.other_count)?;
        }
        Ok(())
    }
}
