//! Environment variable naming for the barber booking service.
//!
//! Configuration values map to `BARBER__SECTION__KEY` variables. Values
//! written as `"secret_from_env"` in a config file are resolved from a
//! variable named after their path (`admin.shared_secret` becomes
//! `ADMIN_SHARED_SECRET`), with `BARBER_SECRET_ADMIN_SHARED_SECRET` tried first.

use std::env;

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "BARBER";

/// The prefix for secret environment variables
pub const SECRET_PREFIX: &str = "BARBER_SECRET";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// The separator for secret environment variables
pub const SECRET_SEPARATOR: &str = "_";

/// Marker value that asks for a secret to be read from the environment.
pub const SECRET_MARKER: &str = "secret_from_env";

/// Get the prefix for configuration environment variables
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Convert a configuration path (`server.port`) to its environment variable
/// name (`BARBER__SERVER__PORT`).
pub fn config_path_to_env_var(path: &str) -> String {
    let prefix = get_config_prefix();
    let path = path.replace('.', CONFIG_SEPARATOR);
    format!("{}{}{}", prefix, CONFIG_SEPARATOR, path).to_uppercase()
}

/// Convert a secret path (`admin.shared_secret`) to the prefixed variable
/// name (`BARBER_SECRET_ADMIN_SHARED_SECRET`).
pub fn secret_path_to_env_var(path: &str) -> String {
    let path = path.replace('.', SECRET_SEPARATOR);
    format!("{}{}{}", SECRET_PREFIX, SECRET_SEPARATOR, path).to_uppercase()
}

/// Convert a secret path to the short variable name (`ADMIN_SHARED_SECRET`).
pub fn legacy_secret_path_to_env_var(path: &str) -> String {
    path.replace('.', SECRET_SEPARATOR).to_uppercase()
}

/// Look up a secret, preferring the prefixed name over the short one.
pub fn get_secret_env_var(path: &str) -> Option<String> {
    if let Ok(value) = env::var(secret_path_to_env_var(path)) {
        return Some(value);
    }
    env::var(legacy_secret_path_to_env_var(path)).ok()
}

/// Replace every `"secret_from_env"` string in `value` with its environment
/// value. Returns the paths that could not be resolved; those are set to
/// `null` so optional secrets deserialize as `None`.
pub fn inject_env_secrets(value: &mut serde_json::Value) -> Vec<String> {
    use serde_json::Value;

    fn walk(path: &mut Vec<String>, obj: &mut Value, missing: &mut Vec<String>) {
        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    path.push(k.to_string());
                    walk(path, v, missing);
                    path.pop();
                }
            }
            Value::String(s) if s == SECRET_MARKER => {
                let path_str = path.join(".");
                match get_secret_env_var(&path_str) {
                    Some(env_val) => *obj = Value::String(env_val),
                    None => {
                        missing.push(path_str);
                        *obj = Value::Null;
                    }
                }
            }
            _ => {}
        }
    }

    let mut missing = Vec::new();
    walk(&mut Vec::new(), value, &mut missing);
    missing
}
