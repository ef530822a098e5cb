/// Program and arguments that run `command` through the platform shell.
///
/// - Unix: `sh -c <command>`
/// - Windows: `cmd /C <command>`
pub fn shell_invocation(command: &str) -> (String, Vec<String>) {
    #[cfg(windows)]
    {
        ("cmd".to_string(), vec!["/C".to_string(), command.to_string()])
    }

    #[cfg(not(windows))]
    {
        ("sh".to_string(), vec!["-c".to_string(), command.to_string()])
    }
}

/// Whether the effective user is root.
pub fn running_as_root() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid has no preconditions and cannot fail.
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    {
        false
    }
}
