//! 外部命令执行器
//!
//! 使用 tokio::process 执行脚本或本地程序，按文件扩展名选择解释器。
//! 解释器必须在 PATH 中。

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::{ExecutorError, Result};

/// 命令执行输出
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// 标准输出
    pub stdout: String,
    /// 标准错误
    pub stderr: String,
    /// stdout 和 stderr 按读取顺序交错的输出 (为空时由二者拼接)
    pub interleaved: String,
    /// 退出码 (被信号终止时为 None)
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    /// 检查命令是否成功执行
    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// 合并的输出，优先使用交错输出，保持诊断信息与正常输出的先后顺序
    pub fn combined_output(&self) -> String {
        if !self.interleaved.is_empty() {
            self.interleaved.clone()
        } else if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// 进程执行器接口
///
/// 启动失败返回 `Err`；进程正常结束但退出码非零返回 `Ok`，由
/// [`CommandOutput::is_success`] 区分。
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, command: &str, args: &[String]) -> Result<CommandOutput>;
}

/// 脚本 / 程序类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptType {
    Unknown,
    Python,
    Perl,
    Tcl,
    Expect,
    Shell,
    Ruby,
    Groovy,
    Java,
    Native,
}

impl ScriptType {
    /// 根据文件扩展名判断类型，无扩展名视为本地可执行程序
    pub fn from_path(script: &str) -> Self {
        let ext = Path::new(script)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        match ext {
            "" | "exe" | "com" | "bat" => ScriptType::Native,
            "py" => ScriptType::Python,
            "pl" => ScriptType::Perl,
            "tcl" => ScriptType::Tcl,
            "exp" => ScriptType::Expect,
            "sh" => ScriptType::Shell,
            "rb" => ScriptType::Ruby,
            "groovy" => ScriptType::Groovy,
            "jar" => ScriptType::Java,
            _ => ScriptType::Unknown,
        }
    }

    /// 对应的解释器，本地程序返回 None
    pub fn interpreter(&self) -> Option<&'static str> {
        match self {
            ScriptType::Python => Some("python"),
            ScriptType::Perl => Some("perl"),
            ScriptType::Tcl => Some("tclsh"),
            // Windows 上 expect 只是 TCL 扩展
            ScriptType::Expect if cfg!(windows) => Some("tclsh"),
            ScriptType::Expect => Some("expect"),
            ScriptType::Shell => Some("sh"),
            ScriptType::Ruby => Some("ruby"),
            ScriptType::Groovy => Some("groovy"),
            ScriptType::Java => Some("java"),
            ScriptType::Native | ScriptType::Unknown => None,
        }
    }
}

/// 解析出实际要启动的程序和参数
pub fn resolve_command(script: &str, args: &[String]) -> Result<(String, Vec<String>)> {
    if script.trim().is_empty() {
        return Err(ExecutorError::InvalidValue("命令为空".to_string()));
    }

    let script_type = ScriptType::from_path(script);
    match script_type {
        ScriptType::Unknown => Err(ExecutorError::UnsupportedScript(script.to_string())),
        ScriptType::Native => Ok((script.to_string(), args.to_vec())),
        ScriptType::Java => {
            let mut real_args = vec!["-jar".to_string(), script.to_string()];
            real_args.extend_from_slice(args);
            Ok(("java".to_string(), real_args))
        }
        other => {
            // 上面已经排除了没有解释器的类型
            let interpreter = other.interpreter().unwrap_or("sh");
            let mut real_args = vec![script.to_string()];
            real_args.extend_from_slice(args);
            Ok((interpreter.to_string(), real_args))
        }
    }
}

/// 本地进程执行器
#[derive(Debug, Clone, Default)]
pub struct LocalRunner {
    /// 单条命令超时 (默认不限制)
    command_timeout: Option<Duration>,
}

impl LocalRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置单条命令超时
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = Some(timeout);
        self
    }

    async fn spawn(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .map_err(|e| ExecutorError::LaunchFailed(format!("{}: {}", program, e)))?;

        let mut stdout_pipe = child.stdout.take();
        let mut stderr_pipe = child.stderr.take();
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let mut interleaved = Vec::new();
        let mut out_buf = [0u8; 4096];
        let mut err_buf = [0u8; 4096];

        // 两个管道谁先有数据就先读谁，interleaved 保持到达顺序
        loop {
            tokio::select! {
                n = read_chunk(&mut stdout_pipe, &mut out_buf), if stdout_pipe.is_some() => {
                    match n? {
                        0 => stdout_pipe = None,
                        n => {
                            stdout.extend_from_slice(&out_buf[..n]);
                            interleaved.extend_from_slice(&out_buf[..n]);
                        }
                    }
                }
                n = read_chunk(&mut stderr_pipe, &mut err_buf), if stderr_pipe.is_some() => {
                    match n? {
                        0 => stderr_pipe = None,
                        n => {
                            stderr.extend_from_slice(&err_buf[..n]);
                            interleaved.extend_from_slice(&err_buf[..n]);
                        }
                    }
                }
                else => break,
            }
        }

        let status = child.wait().await?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&stdout).to_string(),
            stderr: String::from_utf8_lossy(&stderr).to_string(),
            interleaved: String::from_utf8_lossy(&interleaved).to_string(),
            exit_code: status.code(),
        })
    }
}

async fn read_chunk<R>(pipe: &mut Option<R>, buf: &mut [u8]) -> std::io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    match pipe {
        Some(reader) => reader.read(buf).await,
        None => Ok(0),
    }
}

#[async_trait]
impl ProcessRunner for LocalRunner {
    async fn run(&self, command: &str, args: &[String]) -> Result<CommandOutput> {
        let (program, real_args) = resolve_command(command, args)?;
        debug!("执行命令: {} {:?}", program, real_args);

        let output = match self.command_timeout {
            Some(limit) => timeout(limit, self.spawn(&program, &real_args))
                .await
                .map_err(|_| ExecutorError::Timeout(format!("{} ({:?})", command, limit)))??,
            None => self.spawn(&program, &real_args).await?,
        };

        if !output.is_success() {
            warn!("命令退出码非零: {} -> {:?}", command, output.exit_code);
        }

        Ok(output)
    }
}
