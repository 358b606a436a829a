use std::ffi::OsString;
use std::fmt;
use std::io;
use std::process::{Command, ExitCode};

use anyhow::bail;
use log::{error, info};

/// An external tool that ran to completion but reported failure. The
/// wrapper exits with the same code the tool did.
#[derive(Debug)]
pub struct ToolFailure {
    pub tool: String,
    pub code: i32,
}

impl fmt::Display for ToolFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} failed with exit code {}", self.tool, self.code)
    }
}

impl std::error::Error for ToolFailure {}

impl ToolFailure {
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(u8::try_from(self.code).unwrap_or(1))
    }
}

/// Run an external tool, with its stdout/stderr inherited from the parent.
/// `hint` names the software to install when the program is missing from PATH.
pub fn run_tool(program: &str, args: &[OsString], hint: &str) -> anyhow::Result<()> {
    let mut cmd = Command::new(program);
    cmd.args(args);

    info!("Executing {} command: {}", program, command_line(&cmd));

    match cmd.status() {
        Ok(status) if status.success() => {
            info!("{} completed successfully", program);
            Ok(())
        }
        Ok(status) => {
            //A killed child reports no code; treat it as a plain failure
            let code = status.code().unwrap_or(1);
            error!("{} failed with exit code {}", program, code);
            error!("Command: {}", command_line(&cmd));
            Err(ToolFailure {
                tool: program.to_string(),
                code,
            }
            .into())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            bail!(
                "'{}' command not found. Ensure {} is installed and in your PATH",
                program,
                hint
            )
        }
        Err(e) => bail!("Failed to run {}: {}", program, e),
    }
}

fn command_line(cmd: &Command) -> String {
    let mut line = cmd.get_program().to_string_lossy().into_owned();
    for arg in cmd.get_args() {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}
