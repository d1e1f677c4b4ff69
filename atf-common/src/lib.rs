//! ATF 通用类型定义
//!
//! 此 crate 包含执行引擎 (atf-executor) 和报告模块 (atf-report) 之间共享的类型。

pub mod nullable;
mod result;
mod sut;

pub use nullable::null_as_default;
pub use result::TestResult;
pub use sut::SysUnderTest;
