use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a usable config.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_nonzero_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        let value = raw
            .trim()
            .parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })?;
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(value)
    };

    let data_dir = PathBuf::from(or_default("PERSONAS_DATA_DIR", "./Data"));
    let rounds = parse_rounds(&or_default("PERSONAS_ROUNDS", "3,4")).map_err(|reason| {
        ConfigError::InvalidEnvVar {
            var: "PERSONAS_ROUNDS".to_string(),
            reason,
        }
    })?;
    let output_path = PathBuf::from(or_default("PERSONAS_OUTPUT_PATH", "persona_results.json"));
    let log_level = or_default("PERSONAS_LOG_LEVEL", "info");
    let seed = parse_u64("PERSONAS_SEED", "42")?;
    let n_init = parse_nonzero_usize("PERSONAS_N_INIT", "10")?;
    let max_iter = parse_nonzero_usize("PERSONAS_MAX_ITER", "300")?;

    Ok(AppConfig {
        data_dir,
        rounds,
        output_path,
        log_level,
        seed,
        n_init,
        max_iter,
    })
}

/// Parse a comma-separated list of round identifiers such as `"1, 2,4"`.
///
/// Order is preserved and duplicates are rejected.
///
/// # Errors
///
/// Returns a human-readable reason when the list is empty, contains a
/// non-numeric entry, or repeats a round.
pub fn parse_rounds(raw: &str) -> Result<Vec<u32>, String> {
    let mut rounds = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let round = part
            .parse::<u32>()
            .map_err(|e| format!("invalid round '{part}': {e}"))?;
        if rounds.contains(&round) {
            return Err(format!("duplicate round {round}"));
        }
        rounds.push(round);
    }
    if rounds.is_empty() {
        return Err("at least one round is required".to_string());
    }
    Ok(rounds)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
