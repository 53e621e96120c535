use super::parsing::{
    env_optional, env_or_default, parse_base_url, parse_bool, parse_cors_origins,
    parse_environment, parse_u16, parse_u32, parse_u64,
};
use super::types::{
    ApiSettings, ConfigError, CorsSettings, DatabaseSettings, ExamAuthoritySettings,
    RedisSettings, RuntimeSettings, ServerHost, ServerPort, ServerSettings, SessionSettings,
    Settings, TelemetrySettings,
};

impl Settings {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let host = env_or_default("CBT_HOST", "0.0.0.0");
        let port = env_or_default("CBT_PORT", "8000");

        let environment =
            parse_environment(env_optional("CBT_ENV").or_else(|| env_optional("ENVIRONMENT")));
        let strict_config =
            env_optional("CBT_STRICT_CONFIG").map(|value| parse_bool(&value)).unwrap_or(false)
                || environment.is_production();

        let project_name = env_or_default("PROJECT_NAME", "CBT Exam API");
        let version = env_or_default("VERSION", env!("CARGO_PKG_VERSION"));
        let api_v1_str = env_or_default("API_V1_STR", "/api/v1");

        let cors_origins = parse_cors_origins(env_optional("BACKEND_CORS_ORIGINS"))?;

        let postgres_server = env_or_default("POSTGRES_SERVER", "localhost");
        let postgres_port = parse_u16("POSTGRES_PORT", env_or_default("POSTGRES_PORT", "5432"))?;
        let postgres_user = env_or_default("POSTGRES_USER", "cbt");
        let postgres_password = env_or_default("POSTGRES_PASSWORD", "");
        let postgres_db = env_or_default("POSTGRES_DB", "cbt_exam");
        let database_url = env_optional("DATABASE_URL");
        let max_connections =
            parse_u32("DB_MAX_CONNECTIONS", env_or_default("DB_MAX_CONNECTIONS", "30"))?;

        let redis_host = env_or_default("REDIS_HOST", "localhost");
        let redis_port = parse_u16("REDIS_PORT", env_or_default("REDIS_PORT", "6379"))?;
        let redis_db = parse_u16("REDIS_DB", env_or_default("REDIS_DB", "0"))?;
        let redis_password = env_or_default("REDIS_PASSWORD", "");

        let exam_authority_url =
            parse_base_url("EXAM_AUTHORITY_URL", env_optional("EXAM_AUTHORITY_URL"))?;
        let exam_authority_timeout_seconds = parse_u64(
            "EXAM_AUTHORITY_TIMEOUT_SECONDS",
            env_or_default("EXAM_AUTHORITY_TIMEOUT_SECONDS", "5"),
        )?;

        let duration_cache_seconds = parse_u64(
            "EXAM_DURATION_CACHE_SECONDS",
            env_or_default("EXAM_DURATION_CACHE_SECONDS", "60"),
        )?;
        let timeout_sweep_interval_seconds = parse_u64(
            "TIMEOUT_SWEEP_INTERVAL_SECONDS",
            env_or_default("TIMEOUT_SWEEP_INTERVAL_SECONDS", "60"),
        )?;
        let scoring_sweep_interval_seconds = parse_u64(
            "SCORING_SWEEP_INTERVAL_SECONDS",
            env_or_default("SCORING_SWEEP_INTERVAL_SECONDS", "30"),
        )?;
        let auto_scoring_enabled =
            env_optional("AUTO_SCORING_ENABLED").map(|value| parse_bool(&value)).unwrap_or(true);

        let log_level = env_or_default("CBT_LOG_LEVEL", "info");
        let json = env_optional("CBT_LOG_JSON").map(|value| parse_bool(&value)).unwrap_or(false);
        let prometheus_enabled =
            env_optional("PROMETHEUS_ENABLED").map(|value| parse_bool(&value)).unwrap_or(false);

        let settings = Self {
            server: ServerSettings {
                host: ServerHost::parse(host)?,
                port: ServerPort::parse(port)?,
            },
            runtime: RuntimeSettings { environment, strict_config },
            api: ApiSettings { project_name, version, api_v1_str },
            cors: CorsSettings { origins: cors_origins },
            database: DatabaseSettings {
                postgres_server,
                postgres_port,
                postgres_user,
                postgres_password,
                postgres_db,
                database_url,
                max_connections,
            },
            redis: RedisSettings {
                host: redis_host,
                port: redis_port,
                db: redis_db,
                password: redis_password,
            },
            exam_authority: ExamAuthoritySettings {
                base_url: exam_authority_url,
                request_timeout_seconds: exam_authority_timeout_seconds,
            },
            sessions: SessionSettings {
                duration_cache_seconds,
                timeout_sweep_interval_seconds,
                scoring_sweep_interval_seconds,
                auto_scoring_enabled,
            },
            telemetry: TelemetrySettings { log_level, json, prometheus_enabled },
        };

        settings.validate()?;

        Ok(settings)
    }

    pub(crate) fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host.0, self.server.port.0)
    }

    pub(crate) fn server_host(&self) -> &str {
        &self.server.host.0
    }

    pub(crate) fn server_port(&self) -> u16 {
        self.server.port.0
    }

    pub(crate) fn api(&self) -> &ApiSettings {
        &self.api
    }

    pub(crate) fn cors(&self) -> &CorsSettings {
        &self.cors
    }

    pub(crate) fn database(&self) -> &DatabaseSettings {
        &self.database
    }

    pub(crate) fn redis(&self) -> &RedisSettings {
        &self.redis
    }

    pub(crate) fn exam_authority(&self) -> &ExamAuthoritySettings {
        &self.exam_authority
    }

    pub(crate) fn sessions(&self) -> &SessionSettings {
        &self.sessions
    }

    pub(crate) fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    pub(crate) fn runtime(&self) -> &RuntimeSettings {
        &self.runtime
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sessions.timeout_sweep_interval_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "TIMEOUT_SWEEP_INTERVAL_SECONDS",
                value: String::from("0"),
            });
        }
        if self.sessions.scoring_sweep_interval_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "SCORING_SWEEP_INTERVAL_SECONDS",
                value: String::from("0"),
            });
        }
        if self.exam_authority.request_timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "EXAM_AUTHORITY_TIMEOUT_SECONDS",
                value: String::from("0"),
            });
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                field: "DB_MAX_CONNECTIONS",
                value: String::from("0"),
            });
        }

        if !(self.runtime.strict_config || self.runtime.environment.is_production()) {
            return Ok(());
        }

        if self.database.database_url.is_none() && self.database.postgres_password.is_empty() {
            return Err(ConfigError::MissingSecret("POSTGRES_PASSWORD"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, Settings};
    use crate::test_support;

    #[tokio::test]
    async fn load_applies_session_defaults() {
        let _guard = test_support::env_lock().await;
        test_support::set_test_env();
        std::env::remove_var("EXAM_DURATION_CACHE_SECONDS");
        std::env::remove_var("AUTO_SCORING_ENABLED");

        let settings = Settings::load().expect("settings");
        assert_eq!(settings.sessions().duration_cache_seconds, 60);
        assert_eq!(settings.sessions().timeout_sweep_interval_seconds, 60);
        assert!(settings.sessions().auto_scoring_enabled);
        assert!(settings.exam_authority().base_url.is_none());
    }

    #[tokio::test]
    async fn load_rejects_zero_sweep_interval() {
        let _guard = test_support::env_lock().await;
        test_support::set_test_env();
        std::env::set_var("TIMEOUT_SWEEP_INTERVAL_SECONDS", "0");

        let err = Settings::load().expect_err("zero interval");
        std::env::remove_var("TIMEOUT_SWEEP_INTERVAL_SECONDS");

        assert!(matches!(
            err,
            ConfigError::InvalidValue { field: "TIMEOUT_SWEEP_INTERVAL_SECONDS", .. }
        ));
    }

    #[tokio::test]
    async fn strict_config_requires_database_secret() {
        let _guard = test_support::env_lock().await;
        test_support::set_test_env();
        std::env::remove_var("DATABASE_URL");
        std::env::remove_var("POSTGRES_PASSWORD");
        std::env::set_var("CBT_STRICT_CONFIG", "1");

        let err = Settings::load().expect_err("strict config");
        std::env::set_var("CBT_STRICT_CONFIG", "0");

        assert!(matches!(err, ConfigError::MissingSecret("POSTGRES_PASSWORD")));
    }
}
