//! Unit tests for the per-invocation context
//!
//! Covers:
//! - Directory lookups read through the `System` abstraction
//! - Path resolution against home and current directories
//! - Handlers receiving a fresh context on every exec

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "This is a test module")]
mod tests {
    use argspec::system::MockSystem;
    use argspec::{Command, Context};
    use std::path::{Path, PathBuf};

    fn noop() -> Command<()> {
        Command::builder("noop")
            .handler_sync(|_| Ok(()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_context_reads_directories_from_system() {
        let system = MockSystem::new()
            .with_home("/home/ada")
            .with_config_dir("/home/ada/.config")
            .with_current_dir("/work/project");
        let command = noop();

        let ctx = Context::new(&system, &command);
        assert_eq!(ctx.home_dir(), Some(Path::new("/home/ada")));
        assert_eq!(ctx.config_dir(), Some(Path::new("/home/ada/.config")));
        assert_eq!(ctx.current_dir(), Some(Path::new("/work/project")));
        assert_eq!(ctx.command().name(), "noop");
    }

    #[test]
    fn test_context_tolerates_missing_directories() {
        let system = MockSystem::new().without_current_dir();
        let command = noop();

        let ctx = Context::new(&system, &command);
        assert_eq!(ctx.home_dir(), None);
        assert_eq!(ctx.config_dir(), None);
        assert_eq!(ctx.current_dir(), None);
        assert_eq!(ctx.resolve_path("data/../file"), PathBuf::from("file"));
    }

    #[test]
    fn test_context_env_var() {
        let system = MockSystem::new().with_env("EDITOR", "vi");
        let command = noop();

        let ctx = Context::new(&system, &command);
        assert_eq!(ctx.env_var("EDITOR").as_deref(), Some("vi"));
        assert_eq!(ctx.env_var("PAGER"), None);
    }

    #[test]
    fn test_resolve_path() {
        let system = MockSystem::new()
            .with_home("/home/ada")
            .with_current_dir("/work/project");
        let command = noop();
        let ctx = Context::new(&system, &command);

        assert_eq!(ctx.resolve_path("~"), PathBuf::from("/home/ada"));
        assert_eq!(
            ctx.resolve_path("~/notes/./todo.md"),
            PathBuf::from("/home/ada/notes/todo.md")
        );
        assert_eq!(
            ctx.resolve_path("src/../Cargo.toml"),
            PathBuf::from("/work/project/Cargo.toml")
        );
        assert_eq!(ctx.resolve_path("../other"), PathBuf::from("/work/other"));
        assert_eq!(ctx.resolve_path("/etc/hosts"), PathBuf::from("/etc/hosts"));
        assert_eq!(ctx.resolve_path("."), PathBuf::from("/work/project"));
    }

    #[test]
    fn test_resolve_path_keeps_tilde_without_home() {
        let system = MockSystem::new().with_current_dir("/work");
        let command = noop();
        let ctx = Context::new(&system, &command);

        assert_eq!(ctx.resolve_path("~/notes"), PathBuf::from("/work/~/notes"));
    }

    #[tokio::test]
    async fn test_handler_receives_context_for_its_own_command() {
        let app = Command::<String>::builder("app")
            .subcommand(Command::builder("where").handler_sync(|invocation| {
                let ctx = &invocation.ctx;
                Ok(format!(
                    "{} in {}",
                    ctx.command().path(),
                    ctx.resolve_path("out").display()
                ))
            }))
            .build()
            .unwrap();

        let system = MockSystem::new().with_current_dir("/srv");
        let output = app.exec_with(&system, ["where"]).await.unwrap();
        assert_eq!(output.as_deref(), Some("app where in /srv/out"));

        let system = MockSystem::new().with_current_dir("/tmp");
        let output = app.exec_with(&system, ["where"]).await.unwrap();
        assert_eq!(output.as_deref(), Some("app where in /tmp/out"));
    }
}
