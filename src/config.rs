pub mod settings;

pub use settings::{default_config_dir, generate_default_config, Settings, ENV_PREFIX};
