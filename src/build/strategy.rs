use crate::config::{BuildStrategy, Settings};
use crate::error::{AurwatchError, Result};
use crate::traits::CommandSpec;
use crate::utils::platform::shell_invocation;
use std::path::Path;

const CONTAINER_MOUNT: &str = "/build";

/// Resolve the build command for `strategy` against an extracted source dir.
pub fn build_command(
    strategy: &BuildStrategy,
    command: &str,
    src_dir: &Path,
    settings: &Settings,
) -> Result<CommandSpec> {
    match strategy {
        BuildStrategy::Direct => Ok(host_command(command, src_dir)),
        BuildStrategy::Container { image } => {
            container_command(&settings.container_runtime, image, command, src_dir)
        }
    }
}

/// Plain shell command on the host, in `cwd`. Publish steps always run this way.
pub fn host_command(command: &str, cwd: &Path) -> CommandSpec {
    let (program, args) = shell_invocation(command);
    CommandSpec {
        program,
        args,
        cwd: cwd.to_path_buf(),
    }
}

fn container_command(
    runtime: &str,
    image: &str,
    command: &str,
    src_dir: &Path,
) -> Result<CommandSpec> {
    // Bind mounts need an absolute host path.
    let src_dir = std::path::absolute(src_dir).map_err(|e| AurwatchError::IoError {
        path: src_dir.to_path_buf(),
        source: e,
    })?;
    let mut argv = shlex::split(runtime)
        .filter(|argv| !argv.is_empty())
        .ok_or_else(|| {
            AurwatchError::ConfigError(format!("Invalid container-runtime: '{}'", runtime))
        })?
        .into_iter();
    let program = argv.next().unwrap_or_default();

    let mut args: Vec<String> = argv.collect();
    args.extend([
        "run".to_string(),
        "--rm".to_string(),
        "-v".to_string(),
        format!("{}:{}", src_dir.display(), CONTAINER_MOUNT),
        "-w".to_string(),
        CONTAINER_MOUNT.to_string(),
        image.to_string(),
        "sh".to_string(),
        "-c".to_string(),
        command.to_string(),
    ]);

    Ok(CommandSpec {
        program,
        args,
        cwd: src_dir,
    })
}
