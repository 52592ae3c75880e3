use crate::config::Config;

#[derive(Debug, Clone)]
pub enum ConfigOption {
  SetName(String),
  SetInitialWorkers(usize),
}

impl ConfigOption {
  pub fn apply(&self, config: &mut Config) {
    match self {
      ConfigOption::SetName(name) => {
        config.name = name.clone();
      }
      ConfigOption::SetInitialWorkers(count) => {
        config.initial_workers = *count;
      }
    }
  }

  pub fn with_name(name: impl Into<String>) -> ConfigOption {
    ConfigOption::SetName(name.into())
  }

  pub fn with_initial_workers(count: usize) -> ConfigOption {
    ConfigOption::SetInitialWorkers(count)
  }
}
