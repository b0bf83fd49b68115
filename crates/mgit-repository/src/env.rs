use std::path::PathBuf;

/// Environment variable overrides for repository operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    /// GIT_DIR override
    pub git_dir: Option<PathBuf>,
    /// GIT_OBJECT_DIRECTORY override
    pub object_directory: Option<PathBuf>,
}

impl EnvOverrides {
    /// Read the supported environment variables. Empty values count as unset.
    pub fn from_env() -> Self {
        Self {
            git_dir: path_var("GIT_DIR"),
            object_directory: path_var("GIT_OBJECT_DIRECTORY"),
        }
    }
}

fn path_var(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
