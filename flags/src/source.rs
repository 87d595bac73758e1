use std::collections::HashMap;

/// Where raw flag configuration values come from.
///
/// Values are looked up on every evaluation so a changed environment is
/// picked up without restarting.
pub trait FlagSource: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads flag configuration from the process environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvSource;

impl FlagSource for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl FlagSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

pub fn mode_key(flag_name: &str) -> String {
    format!("FEATURE_{flag_name}")
}

pub fn rollout_key(flag_name: &str) -> String {
    format!("ROLLOUT_{flag_name}_PERCENT")
}
