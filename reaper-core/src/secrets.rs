//! Secrets management for Branch Reaper
//!
//! The Azure DevOps personal access token normally arrives through the `PAT`
//! environment variable (pipeline secret). For local use it can instead live
//! in `~/.config/reaper/secrets.toml`, which must have restrictive
//! permissions (0600 on Unix).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// Secrets structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Secrets {
    pub azure_devops: AzureDevOpsSecrets,
}

/// Azure DevOps credentials
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AzureDevOpsSecrets {
    /// Personal access token with Code (read & write) scope
    pub pat: Option<String>,
}

impl std::fmt::Debug for AzureDevOpsSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureDevOpsSecrets")
            .field("pat", &self.pat.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Secrets {
    /// Load secrets from the default location
    ///
    /// Returns default (empty) secrets if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::default_secrets_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load secrets from a specific file with permission checking
    pub fn load_from_file(path: &Path) -> Result<Self> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let metadata = std::fs::metadata(path).map_err(Error::Io)?;
            let mode = metadata.permissions().mode();

            if mode & 0o077 != 0 {
                return Err(Error::Config(format!(
                    "Secrets file {} has insecure permissions {:o}. \
                     Please run: chmod 600 {}",
                    path.display(),
                    mode & 0o777,
                    path.display()
                )));
            }
        }

        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        let mut secrets: Secrets = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse secrets: {}", e)))?;

        if let Some(ref mut pat) = secrets.azure_devops.pat {
            *pat = pat.trim().to_string();
        }

        debug!(path = %path.display(), "Loaded secrets file");
        Ok(secrets)
    }

    /// Get the default secrets file path
    ///
    /// Returns `~/.config/reaper/secrets.toml` on Unix
    pub fn default_secrets_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("reaper").join("secrets.toml"))
    }

    /// Resolve the run token, reading the secrets file only as a fallback
    ///
    /// A non-blank explicit token is returned as-is; the secrets file is not
    /// opened, so its permissions are never checked in that case.
    pub fn resolve_token(explicit: Option<String>) -> Result<Option<String>> {
        Self::resolve_token_from(explicit, Self::default_secrets_path().as_deref())
    }

    /// Like [`Secrets::resolve_token`], with an explicit secrets file location
    pub fn resolve_token_from(
        explicit: Option<String>,
        path: Option<&Path>,
    ) -> Result<Option<String>> {
        let explicit = explicit
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        if explicit.is_some() {
            return Ok(explicit);
        }

        match path {
            Some(path) if path.exists() => Ok(Self::load_from_file(path)?.resolve_pat(None)),
            _ => Ok(None),
        }
    }

    /// Resolve the token to use for this run
    ///
    /// Priority: explicit token (CLI flag or `PAT` env var) > secrets file
    pub fn resolve_pat(&self, explicit: Option<String>) -> Option<String> {
        if let Some(token) = explicit {
            let token = token.trim().to_string();
            if !token.is_empty() {
                return Some(token);
            }
        }

        match self.azure_devops.pat {
            Some(ref pat) if !pat.is_empty() => {
                debug!("Using PAT from secrets file");
                Some(pat.clone())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_secrets() {
        let toml = r#"
[azure_devops]
pat = "abc123"
"#;
        let secrets: Secrets = toml::from_str(toml).unwrap();
        assert_eq!(secrets.azure_devops.pat, Some("abc123".to_string()));
    }

    #[test]
    fn test_explicit_token_wins() {
        let secrets = Secrets {
            azure_devops: AzureDevOpsSecrets {
                pat: Some("from_file".to_string()),
            },
        };
        assert_eq!(
            secrets.resolve_pat(Some(" from_env ".to_string())),
            Some("from_env".to_string())
        );
        assert_eq!(secrets.resolve_pat(Some("".to_string())), Some("from_file".to_string()));
        assert_eq!(secrets.resolve_pat(None), Some("from_file".to_string()));
        assert_eq!(Secrets::default().resolve_pat(None), None);
    }

    #[test]
    fn test_debug_redacts_pat() {
        let secrets = Secrets {
            azure_devops: AzureDevOpsSecrets {
                pat: Some("hunter2".to_string()),
            },
        };
        assert!(!format!("{:?}", secrets).contains("hunter2"));
    }

    #[cfg(unix)]
    #[test]
    fn test_insecure_permissions_rejected() {
        use std::os::unix::fs::PermissionsExt;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[azure_devops]\npat = \"test\"").unwrap();

        let perms = std::fs::Permissions::from_mode(0o644);
        std::fs::set_permissions(file.path(), perms).unwrap();

        let result = Secrets::load_from_file(file.path());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("insecure permissions"));
    }

    #[cfg(unix)]
    #[test]
    fn test_explicit_token_skips_secrets_file() {
        use std::os::unix::fs::PermissionsExt;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[azure_devops]\npat = \"from_file\"").unwrap();
        let perms = std::fs::Permissions::from_mode(0o644);
        std::fs::set_permissions(file.path(), perms).unwrap();

        let token =
            Secrets::resolve_token_from(Some(" from_env ".to_string()), Some(file.path()))
                .unwrap();
        assert_eq!(token, Some("from_env".to_string()));

        // blank explicit token falls through to the file, which is rejected
        let err = Secrets::resolve_token_from(Some("  ".to_string()), Some(file.path()))
            .unwrap_err();
        assert!(err.to_string().contains("insecure permissions"));
    }

    #[cfg(unix)]
    #[test]
    fn test_token_falls_back_to_secrets_file() {
        use std::os::unix::fs::PermissionsExt;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[azure_devops]\npat = \"from_file\"").unwrap();
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(file.path(), perms).unwrap();

        let token = Secrets::resolve_token_from(None, Some(file.path())).unwrap();
        assert_eq!(token, Some("from_file".to_string()));
    }

    #[test]
    fn test_no_token_anywhere() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("secrets.toml");
        assert_eq!(Secrets::resolve_token_from(None, Some(&missing)).unwrap(), None);
        assert_eq!(Secrets::resolve_token_from(Some("".to_string()), None).unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_secure_permissions_accepted_and_trimmed() {
        use std::os::unix::fs::PermissionsExt;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[azure_devops]\npat = \"  tok  \"").unwrap();

        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(file.path(), perms).unwrap();

        let secrets = Secrets::load_from_file(file.path()).unwrap();
        assert_eq!(secrets.azure_devops.pat, Some("tok".to_string()));
    }
}
