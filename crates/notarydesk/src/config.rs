//! CLI configuration -- thin wrapper around `notarydesk_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--project-url, --anon-key, --insecure, --timeout).

use secrecy::SecretString;

use notarydesk_core::BackendConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use notarydesk_config::{
    Config, KeyKind, Profile, config_path, load_config_or_default, save_config,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build the backend config from the config file, the active profile
/// and CLI overrides. Flags win over profile values.
pub fn resolve_backend_config(global: &GlobalOpts) -> Result<BackendConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let mut profile = match (cfg.profiles.get(&profile_name), &global.project_url) {
        (Some(profile), _) => profile.clone(),
        // No profile: flags / env alone must describe the project
        (None, Some(url)) => Profile::new(url.clone()),
        (None, None) if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(&cfg),
            });
        }
        (None, None) => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    apply_overrides(&mut profile, global);

    let anon_key = match &global.anon_key {
        Some(key) => SecretString::from(key.clone()),
        None => notarydesk_config::resolve_anon_key(&profile, &profile_name)?,
    };
    let admin_key = notarydesk_config::resolve_admin_key(&profile, &profile_name);

    Ok(notarydesk_config::build_backend_config(
        &profile,
        &cfg.defaults,
        anon_key,
        admin_key,
    )?)
}

fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(url) = &global.project_url {
        profile.project_url.clone_from(url);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
}

pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}
