use crate::runtime::Environment;
use crate::segments::{to_data, Properties, SegmentWriter};
use anyhow::{Context, Result};
use gix::Repository;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GitInfo {
    pub branch: Option<String>,
    pub sha: Option<String>,
    pub repo_name: Option<String>,
    pub detached: bool,
    /// Branch name, or the short sha when HEAD is detached.
    #[serde(rename = "HEAD")]
    pub head: String,
}

/// Repository state for the working directory, read with gix.
#[derive(Debug, Default)]
pub struct GitSegment {
    pwd: PathBuf,
    sha_length: usize,
    branch_icon: String,
    info: GitInfo,
}

impl GitSegment {
    /// Load git information using gix (pure Rust implementation)
    pub fn load_git_info(&self, path: &Path) -> Result<Option<GitInfo>> {
        match gix::discover(path) {
            Ok(repo) => self.extract_git_info(&repo).map(Some),
            Err(_) => {
                log::debug!("git: {} is not in a repository", path.display());
                Ok(None)
            }
        }
    }

    fn extract_git_info(&self, repo: &Repository) -> Result<GitInfo> {
        let mut info = GitInfo::default();

        let head_ref = repo.head_ref().context("Failed to read HEAD")?;
        if let Some(reference) = head_ref {
            info.branch = Some(reference.name().shorten().to_string());
        }

        // unborn branches have no commit yet
        if let Ok(head) = repo.head_commit() {
            info.sha = Some(head.id().to_hex_with_len(self.sha_length).to_string());
        }

        info.repo_name = repo
            .work_dir()
            .and_then(|path| path.file_name())
            .and_then(|name| name.to_str())
            .map(str::to_string);

        info.detached = info.branch.is_none();
        info.head = match (&info.branch, &info.sha) {
            (Some(branch), _) => format!("{}{branch}", self.branch_icon),
            (None, Some(sha)) => format!("@{sha}"),
            (None, None) => String::new(),
        };

        log::debug!(
            "git: branch={:?}, sha={:?}, detached={}",
            info.branch,
            info.sha,
            info.detached
        );

        Ok(info)
    }
}

impl SegmentWriter for GitSegment {
    fn init(&mut self, properties: &Properties, env: &dyn Environment) {
        self.pwd = PathBuf::from(env.pwd());
        self.sha_length = properties.get_int("sha_length", 7).clamp(4, 40) as usize;
        self.branch_icon = properties.get_string("branch_icon", "\u{e0a0} ");
    }

    fn enabled(&mut self) -> Result<bool> {
        match self.load_git_info(&self.pwd)? {
            Some(info) => {
                self.info = info;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn template(&self) -> &'static str {
        " {{ .HEAD }} "
    }

    fn data(&self) -> Value {
        to_data("git", &self.info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockEnvironment;
    use tempfile::TempDir;

    #[test]
    fn test_outside_a_repository_is_disabled() {
        let dir = TempDir::new().unwrap();
        let env = MockEnvironment::new().with_pwd(&dir.path().to_string_lossy());
        let mut writer = GitSegment::default();
        writer.init(&Properties::default(), &env);
        // the temp dir may itself live inside a checkout; only assert on a clean miss
        if gix::discover(dir.path()).is_err() {
            assert!(!writer.enabled().unwrap());
        }
    }

    #[test]
    fn test_data_shape() {
        let writer = GitSegment {
            info: GitInfo {
                branch: Some("main".to_string()),
                sha: Some("abc1234".to_string()),
                repo_name: Some("app".to_string()),
                detached: false,
                head: "main".to_string(),
            },
            ..GitSegment::default()
        };
        let data = writer.data();
        assert_eq!(data["Branch"], "main");
        assert_eq!(data["HEAD"], "main");
        assert_eq!(data["Detached"], false);
    }
}
