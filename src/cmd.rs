use crate::context::Context;
use crate::error::Error;
use crate::platform::Platform;
use crate::result::Result;
use std::process::{Command, Stdio};

/// Run a program in the project directory.
///
/// In verbose mode the child inherits stdio so its output streams to the
/// console; otherwise output is captured and only surfaces in the error.
pub fn execute(ctx: &Context, program: &str, args: &[String]) -> Result<()> {
    let mut command = Command::new(program);
    command.args(args).current_dir(&ctx.project_dir);

    let label = if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    };

    run(ctx, command, &label)
}

/// Run a command line through the platform shell in the project directory
pub fn shell(ctx: &Context, command_line: &str) -> Result<()> {
    let (program, flag) = Platform::current().shell();

    let mut command = Command::new(program);
    command
        .arg(flag)
        .arg(command_line)
        .current_dir(&ctx.project_dir);

    run(ctx, command, command_line)
}

fn run(ctx: &Context, mut command: Command, label: &str) -> Result<()> {
    if ctx.verbose {
        println!("Executing: {}", label);

        let status = command
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| Error::CommandFailed(format!("{}: {}", label, e)))?;

        if !status.success() {
            return Err(Error::CommandFailed(format!(
                "{} failed with exit code: {}",
                label,
                status.code().unwrap_or(-1)
            )));
        }

        return Ok(());
    }

    let output = command
        .stdin(Stdio::null())
        .output()
        .map_err(|e| Error::CommandFailed(format!("{}: {}", label, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::CommandFailed(format!(
            "{} failed with exit code {}: {}",
            label,
            output.status.code().unwrap_or(-1),
            stderr.trim()
        )));
    }

    Ok(())
}
