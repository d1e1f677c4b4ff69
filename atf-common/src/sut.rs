//! 被测系统描述
//!
//! 只用于配置和报告，对执行过程没有任何影响。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 被测系统 (硬件、软件或二者组合)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SysUnderTest {
    /// 名称
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub name: String,

    /// 系统类型 (主要区分 HW / SW)
    #[serde(default, rename = "type", alias = "systype", deserialize_with = "crate::null_as_default")]
    pub system_type: String,

    /// 版本
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub version: String,

    /// 描述
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub description: String,

    /// IP 地址 (可选)
    #[serde(default, alias = "ipaddr", deserialize_with = "crate::null_as_default")]
    pub ip_address: String,
}

impl SysUnderTest {
    pub fn new(name: &str, system_type: &str, version: &str, description: &str, ip: &str) -> Self {
        Self {
            name: name.to_string(),
            system_type: system_type.to_string(),
            version: version.to_string(),
            description: description.to_string(),
            ip_address: ip.to_string(),
        }
    }
}

impl fmt::Display for SysUnderTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SystemUnderTest:")?;
        writeln!(f, "   Name: {}", self.name)?;
        writeln!(f, "   Type: {}", self.system_type)?;
        writeln!(f, "   Version: {}", self.version)?;
        writeln!(f, "   IP address: {}", self.ip_address)?;
        write!(f, "   Description:\n{}", self.description)
    }
}
