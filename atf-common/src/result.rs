//! 测试结果取值

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 测试结果
///
/// 取值是封闭集合。反序列化时遇到集合之外的字符串不会报错，
/// 而是归一化为 [`TestResult::Unknown`]；null 视为默认值 NotTested。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TestResult {
    /// 未知结果
    Unknown,
    /// 通过
    Pass,
    /// 失败
    Fail,
    /// 预期失败
    XFail,
    /// 未测试
    #[default]
    NotTested,
}

impl TestResult {
    /// 序列化名称
    pub fn as_str(&self) -> &'static str {
        match self {
            TestResult::Unknown => "UnknownResult",
            TestResult::Pass => "Pass",
            TestResult::Fail => "Fail",
            TestResult::XFail => "XFail",
            TestResult::NotTested => "NotTested",
        }
    }

    /// 从名称解析，非法名称归一化为 Unknown
    pub fn from_name(name: &str) -> Self {
        match name {
            "Pass" => TestResult::Pass,
            "Fail" => TestResult::Fail,
            "XFail" => TestResult::XFail,
            "NotTested" => TestResult::NotTested,
            // "UnknownResult", "Unknown" 以及任何非法值
            _ => TestResult::Unknown,
        }
    }

    /// 是否可以作为期望结果 (只有 Pass 和 XFail 有意义)
    pub fn is_expectation(&self) -> bool {
        matches!(self, TestResult::Pass | TestResult::XFail)
    }
}

impl FromStr for TestResult {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TestResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TestResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = Option::<String>::deserialize(deserializer)?;
        Ok(name.map(|n| Self::from_name(&n)).unwrap_or_default())
    }
}
