//! MongoDB settings for the CLI: environment first, flags on top.

use core_config::FromEnv;
use database::mongodb::MongoConfig;

pub fn mongo_config(url: Option<&str>, database: Option<&str>) -> eyre::Result<MongoConfig> {
    let mut config = MongoConfig::from_env()?
        .with_app_name("events-cli")
        .with_pool_size(4, 0);

    if let Some(url) = url {
        config.url = url.to_string();
    }
    if let Some(database) = database {
        config.database = database.to_string();
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_environment() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://env-host:27017")),
                ("MONGODB_DATABASE", Some("from_env")),
            ],
            || {
                let config = mongo_config(Some("mongodb://flag-host:27017"), None).unwrap();
                assert_eq!(config.url(), "mongodb://flag-host:27017");
                assert_eq!(config.database(), "from_env");

                let config = mongo_config(None, Some("from_flag")).unwrap();
                assert_eq!(config.url(), "mongodb://env-host:27017");
                assert_eq!(config.database(), "from_flag");
            },
        );
    }

    #[test]
    fn test_defaults_without_environment() {
        temp_env::with_vars_unset(
            [
                "MONGODB_URL",
                "MONGO_URL",
                "MONGO_USERNAME",
                "MONGO_PASSWORD",
                "MONGO_HOST",
                "MONGO_PORT",
                "MONGODB_DATABASE",
                "MONGO_DATABASE",
            ],
            || {
                let config = mongo_config(None, None).unwrap();
                assert_eq!(config.url(), "mongodb://localhost:27017");
                assert_eq!(config.database(), "events");
                assert_eq!(config.app_name.as_deref(), Some("events-cli"));
            },
        );
    }
}
