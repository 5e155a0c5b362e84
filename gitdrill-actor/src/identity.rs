//! SSH identity installation into an actor's home.
//!
//! # Layout
//!
//! | Path                   | Mode   | Content                         |
//! |------------------------|--------|---------------------------------|
//! | `<home>/.ssh/`         | `0700` | -                               |
//! | `<home>/.ssh/config`   | `0600` | rendered ssh client config      |
//! | `<home>/.ssh/origin`   | `0600` | copy of the operator's key      |
//!
//! The config is a tera template rendered with `actor`, `home`, `host` and
//! `identity_file`. [`DEFAULT_SSH_CONFIG_TEMPLATE`] is embedded at compile
//! time.

use std::path::{Path, PathBuf};

use tera::{Context, Tera};

use gitdrill_core::paths;

use crate::environment::ActorEnvironment;
use crate::error::{io_err, ActorError};

pub const DEFAULT_SSH_CONFIG_TEMPLATE: &str = include_str!("templates/ssh_config.tera");

/// Where an identity was installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityInstall {
    pub config_path: PathBuf,
    pub key_path: PathBuf,
}

/// Render the ssh config template for `env`.
pub fn render_ssh_config(
    template: &str,
    env: &ActorEnvironment,
    host: &str,
) -> Result<String, ActorError> {
    let home = env.home_directory()?;
    let mut ctx = Context::new();
    ctx.insert("actor", &env.name().0);
    ctx.insert("home", &home.display().to_string());
    ctx.insert("host", host);
    ctx.insert(
        "identity_file",
        &paths::ssh_key_path(&home).display().to_string(),
    );
    Ok(Tera::one_off(template, &ctx, false)?)
}

impl ActorEnvironment {
    /// Write `<home>/.ssh/config` from `template` and install `private_key`
    /// as `<home>/.ssh/origin`, both owner read/write only.
    ///
    /// Fails with [`ActorError::KeyNotFound`] before touching the disk when
    /// `private_key` is missing.
    pub fn configure_identity(
        &mut self,
        template: &str,
        private_key: &Path,
        host: &str,
    ) -> Result<IdentityInstall, ActorError> {
        if !private_key.is_file() {
            return Err(ActorError::KeyNotFound {
                path: private_key.to_path_buf(),
            });
        }

        let rendered = render_ssh_config(template, self, host)?;
        let home = self.home_directory()?;
        let ssh_dir = paths::ssh_dir(&home);
        std::fs::create_dir_all(&ssh_dir).map_err(|e| io_err(&ssh_dir, e))?;
        set_dir_permissions(&ssh_dir)?;

        let config_path = paths::ssh_config_path(&home);
        std::fs::write(&config_path, rendered).map_err(|e| io_err(&config_path, e))?;
        set_file_permissions(&config_path)?;

        let key_path = paths::ssh_key_path(&home);
        std::fs::copy(private_key, &key_path).map_err(|e| io_err(&key_path, e))?;
        set_file_permissions(&key_path)?;

        tracing::info!(actor = %self.name(), key = %key_path.display(), "installed ssh identity");
        self.set_ssh_identity(key_path.clone());
        Ok(IdentityInstall {
            config_path,
            key_path,
        })
    }
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), ActorError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), ActorError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), ActorError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), ActorError> {
    Ok(())
}
