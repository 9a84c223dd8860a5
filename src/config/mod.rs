mod settings;

use std::path::Path;

use config::{Config, ConfigError, Environment, File, Source};

pub use settings::{
    LogSettings, NotifySettings, PartialSettings, Settings, StoreBackend, StoreSettings,
};

/// Prefix for environment overrides, e.g. `BLOGSUB__STORE__BACKEND=sled`.
pub const ENV_PREFIX: &str = "BLOGSUB";

/// Loads the configuration from the optional `config/default` file and
/// environment variables, then merges it with default values.
pub fn load_config() -> Result<Settings, ConfigError> {
    load(File::with_name("config/default").required(false))
}

/// Like [`load_config`] but reads an explicit file, which must exist.
pub fn load_config_from(path: &Path) -> Result<Settings, ConfigError> {
    load(File::from(path).required(true))
}

fn load<S>(file: S) -> Result<Settings, ConfigError>
where
    S: Source + Send + Sync + 'static,
{
    let config = Config::builder()
        .add_source(file)
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;
    Ok(Settings::merged(partial))
}
