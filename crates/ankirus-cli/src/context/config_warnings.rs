use ankirus_config::AnkirusConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &AnkirusConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &AnkirusConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.source.is_configured() && has_env_prefix(&env_keys, "ANKIRUS_SOURCE") {
        warnings.push(
            "Source config appears default while ANKIRUS_SOURCE* env vars exist. Use double underscores (example: ANKIRUS_SOURCE__PROFILE_DIR)."
                .to_string(),
        );
    }

    if config.sanitizer.enabled
        && config.sanitizer.banned_words.is_empty()
        && has_env_prefix(&env_keys, "ANKIRUS_SANITIZER")
    {
        warnings.push(
            "Sanitizer word list is unset while ANKIRUS_SANITIZER* env vars exist. Use double underscores (example: ANKIRUS_SANITIZER__BANNED_WORDS)."
                .to_string(),
        );
    }

    warnings
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}
