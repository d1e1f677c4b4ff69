//! 测试计划
//!
//! 测试计划是测试集的非执行版本，内容相同但不包含被测系统描述。
//! 一个测试集可以属于多个测试计划，测试集只记录所属计划的名称。

use serde::{Deserialize, Serialize};
use std::fmt;

use atf_common::null_as_default;

use crate::action::Action;
use crate::case::TestCase;
use crate::set::TestSet;
use crate::SysUnderTest;

/// 测试计划
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestPlan {
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup: Option<Action>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleanup: Option<Action>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub cases: Vec<TestCase>,
}

impl TestPlan {
    pub fn new(name: &str, description: &str, setup: Option<Action>, cleanup: Option<Action>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            setup,
            cleanup,
            cases: Vec::new(),
        }
    }

    /// 追加用例
    pub fn append(&mut self, cases: impl IntoIterator<Item = TestCase>) {
        self.cases.extend(cases);
    }

    /// 转换为测试集 (深拷贝)
    ///
    /// 测试集名称默认与计划相同，可以随后修改；被测系统为空描述。
    pub fn to_test_set(&self) -> TestSet {
        TestSet {
            name: self.name.clone(),
            description: self.description.clone(),
            test_plan: self.name.clone(),
            sut: Some(SysUnderTest::default()),
            setup: self.setup.clone(),
            cleanup: self.cleanup.clone(),
            cases: self.cases.clone(),
        }
    }
}

impl fmt::Display for TestPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TestPlan: {:?} ({} cases)", self.name, self.cases.len())
    }
}
