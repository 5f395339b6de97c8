use std::process::Command;

use crate::error::AppError;

/// Runs one invocation of the wallet RPC client and hands back its trimmed stdout.
pub trait CommandRunner {
    fn run(&self, args: &[String]) -> Result<String, AppError>;
}

pub struct ProcessRunner {
    program: String,
}

impl ProcessRunner {
    pub fn new(program: impl Into<String>) -> Self {
        ProcessRunner { program: program.into() }
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, args: &[String]) -> Result<String, AppError> {
        log::debug!("exec: {} {}", self.program, args.join(" "));

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| {
                log::error!("could not start {}: {}", self.program, e);
                AppError::Spawn {
                    program: self.program.clone(),
                    source: e,
                }
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            println!("Error processing command output: {}\n❌ {}", stdout, stderr);
            return Err(AppError::CommandFailed {
                command: args.first().cloned().unwrap_or_default(),
                status: output.status.to_string(),
                stdout,
                stderr,
            });
        }

        log::debug!("{} returned {} bytes", self.program, stdout.len());
        Ok(stdout)
    }
}
