use crate::config_option::ConfigOption;

pub const DEFAULT_NAME: &str = "synchrozine";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  /// Attached to every tracing event emitted by the barrier.
  pub name: String,
  /// Workers registered at construction, as if by `add_many`.
  pub initial_workers: usize,
}

impl Default for Config {
  fn default() -> Self {
    Config {
      name: DEFAULT_NAME.to_string(),
      initial_workers: 0,
    }
  }
}

impl Config {
  pub fn from(options: impl IntoIterator<Item = ConfigOption>) -> Config {
    let mut config = Config::default();
    for option in options {
      option.apply(&mut config);
    }
    config
  }
}
