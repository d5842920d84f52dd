//! Runtime configuration: an optional TOML file overlaid by `QUADRO_*`
//! environment variables.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Runtime server configuration.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  /// Expose internal error detail in `500` responses.
  pub debug:      bool,
}

impl ServerConfig {
  /// Layer `file` (if it exists) and the environment over the defaults.
  pub fn load(file: &Path) -> Result<Self, config::ConfigError> {
    Self::builder(file)?
      .add_source(config::Environment::with_prefix("QUADRO"))
      .build()?
      .try_deserialize()
  }

  fn builder(
    file: &Path,
  ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    Ok(
      config::Config::builder()
        .set_default("host", "127.0.0.1")?
        .set_default("port", 8080)?
        .set_default("store_path", "quadro.db")?
        .set_default("debug", false)?
        .add_source(config::File::from(file).required(false)),
    )
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_apply_without_a_file() {
    let cfg: ServerConfig = ServerConfig::builder(Path::new("does-not-exist.toml"))
      .unwrap()
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();
    assert_eq!(cfg, ServerConfig {
      host:       "127.0.0.1".into(),
      port:       8080,
      store_path: PathBuf::from("quadro.db"),
      debug:      false,
    });
    assert_eq!(cfg.address(), "127.0.0.1:8080");
  }

  #[test]
  fn file_overrides_defaults() {
    let dir = std::env::temp_dir().join(format!("quadro-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let file = dir.join("config.toml");
    std::fs::write(&file, "port = 9090\ndebug = true\n").unwrap();

    let cfg: ServerConfig =
      ServerConfig::builder(&file).unwrap().build().unwrap().try_deserialize().unwrap();
    assert_eq!(cfg.port, 9090);
    assert!(cfg.debug);
    assert_eq!(cfg.host, "127.0.0.1");

    std::fs::remove_dir_all(&dir).ok();
  }

  #[test]
  fn tilde_is_expanded_against_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(expand_tilde(Path::new("~/quadro.db")), PathBuf::from(home).join("quadro.db"));
    assert_eq!(expand_tilde(Path::new("/var/quadro.db")), PathBuf::from("/var/quadro.db"));
  }
}
