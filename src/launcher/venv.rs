//! Virtual environment layout and the commands that build it.

use super::runner::LaunchCommand;
use std::path::{Path, PathBuf};

/// Interpreters tried, in order, to create the venv.
pub const PYTHON_CANDIDATES: [&str; 2] = ["python3", "python"];

/// Where a venv keeps its executables on this platform.
#[derive(Debug, Clone)]
pub struct VenvLayout {
    root: PathBuf,
}

impl VenvLayout {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    /// Absolute path of `name` inside the venv, or bare `name` (resolved
    /// through PATH) when the venv does not provide it.
    pub fn executable(&self, name: &str) -> PathBuf {
        let candidates = [
            self.root.join("bin").join(name),
            self.root.join("Scripts").join(format!("{}.exe", name)),
        ];
        for candidate in candidates {
            if candidate.exists() {
                // 子程序會先切換到 app_dir，相對路徑會失效
                return std::path::absolute(&candidate).unwrap_or(candidate);
            }
        }
        PathBuf::from(name)
    }
}

pub fn create_command(python: &str, venv_dir: &str, cwd: &Path) -> LaunchCommand {
    LaunchCommand::new(python, cwd).args(["-m", "venv", venv_dir])
}

pub fn install_command(layout: &VenvLayout, requirements: &str, cwd: &Path) -> LaunchCommand {
    LaunchCommand::new(layout.executable("pip"), cwd).args(["install", "-r", requirements])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_executable_prefers_venv_bin() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("venv");
        std::fs::create_dir_all(root.join("bin")).unwrap();
        std::fs::write(root.join("bin").join("pip"), "").unwrap();

        let layout = VenvLayout::new(root.clone());
        assert!(layout.exists());
        assert_eq!(layout.executable("pip"), root.join("bin").join("pip"));
        assert_eq!(layout.executable("streamlit"), PathBuf::from("streamlit"));
    }

    #[test]
    fn test_executable_is_absolute_for_relative_app_dir() {
        // 建在目前目錄下，以相對路徑引用
        let app_dir = TempDir::new_in(".").unwrap();
        let relative = PathBuf::from(app_dir.path().file_name().unwrap());

        let root = relative.join("venv");
        std::fs::create_dir_all(root.join("bin")).unwrap();
        std::fs::write(root.join("bin").join("streamlit"), "").unwrap();

        let streamlit = VenvLayout::new(root.clone()).executable("streamlit");
        assert!(streamlit.is_absolute());
        assert!(streamlit.ends_with(root.join("bin").join("streamlit")));
    }

    #[test]
    fn test_missing_venv_falls_back_to_path() {
        let temp_dir = TempDir::new().unwrap();
        let layout = VenvLayout::new(temp_dir.path().join("venv"));
        assert!(!layout.exists());
        assert_eq!(layout.executable("pip"), PathBuf::from("pip"));
    }

    #[test]
    fn test_commands() {
        let cwd = Path::new("/srv/app");
        let create = create_command("python3", "venv", cwd);
        assert_eq!(create.display(), "python3 -m venv venv");
        assert_eq!(create.cwd, PathBuf::from("/srv/app"));

        let layout = VenvLayout::new(cwd.join("venv"));
        let install = install_command(&layout, "requirements.txt", cwd);
        assert_eq!(install.args, vec!["install", "-r", "requirements.txt"]);
    }
}
