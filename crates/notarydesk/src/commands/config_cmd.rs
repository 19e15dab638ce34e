//! Config subcommand handlers.

use dialoguer::{Input, Select};
use notarydesk_core::BusinessProfile;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, KeyKind, Profile};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

const MASK: &str = "****";

const SETTABLE_KEYS: &str = "project_url, anon_key, anon_key_env, admin_key, admin_key_env, \
    table, automation_webhook, success_url, cancel_url, business_name, business_phone, \
    business_email, ca_cert, insecure, timeout, functions.checkout, functions.email, \
    functions.sms, functions.crm";

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of the config with admin keys masked. Anon keys are public.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.admin_key.is_some() {
            profile.admin_key = Some(MASK.into());
        }
    }
    cfg
}

fn save_config(cfg: &Config) -> Result<(), CliError> {
    config::save_config(cfg)?;
    Ok(())
}

/// Empty input clears an optional setting.
fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

fn checked_url(field: &str, value: &str) -> Result<Option<String>, CliError> {
    let Some(value) = optional(value) else {
        return Ok(None);
    };
    url::Url::parse(&value).map_err(|e| CliError::Validation {
        field: field.into(),
        reason: format!("invalid URL '{value}': {e}"),
    })?;
    Ok(Some(value))
}

/// Apply one `config set` assignment to a profile.
fn apply_setting(profile: &mut Profile, key: &str, value: &str) -> Result<(), CliError> {
    let key = key.replace('-', "_");
    match key.as_str() {
        "project_url" => {
            profile.project_url = checked_url("project_url", value)?.ok_or_else(|| {
                CliError::Validation {
                    field: "project_url".into(),
                    reason: "cannot be empty".into(),
                }
            })?;
        }
        "anon_key" => profile.anon_key = optional(value),
        "anon_key_env" => profile.anon_key_env = optional(value),
        "admin_key" => profile.admin_key = optional(value),
        "admin_key_env" => profile.admin_key_env = optional(value),
        "table" => profile.table = optional(value),
        "automation_webhook" => {
            profile.automation_webhook = checked_url("automation_webhook", value)?;
        }
        "success_url" => profile.success_url = checked_url("success_url", value)?,
        "cancel_url" => profile.cancel_url = checked_url("cancel_url", value)?,
        "business_name" => profile.business_name = optional(value),
        "business_phone" => profile.business_phone = optional(value),
        "business_email" => profile.business_email = optional(value),
        "ca_cert" => profile.ca_cert = optional(value).map(Into::into),
        "insecure" => {
            profile.insecure = Some(value.parse().map_err(|_| CliError::Validation {
                field: "insecure".into(),
                reason: "must be 'true' or 'false'".into(),
            })?);
        }
        "timeout" => {
            profile.timeout = Some(value.parse().map_err(|_| CliError::Validation {
                field: "timeout".into(),
                reason: "must be a number (seconds)".into(),
            })?);
        }
        "functions.checkout" => profile.functions.checkout = optional(value),
        "functions.email" => profile.functions.email = optional(value),
        "functions.sms" => profile.functions.sms = optional(value),
        "functions.crm" => profile.functions.crm = optional(value),
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!("unknown config key '{other}'. Valid keys: {SETTABLE_KEYS}"),
            });
        }
    }
    Ok(())
}

/// Offer to store a key in the system keyring or return it for plaintext config.
///
/// Returns `Some(secret)` if the user chose plaintext, `None` if stored in keyring.
fn prompt_keyring_storage(
    profile_name: &str,
    kind: KeyKind,
    secret: &str,
) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt(format!("Where to store the {kind}?"))
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        notarydesk_config::store_key(profile_name, kind, secret)?;
        eprintln!("   ✓ {kind} stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(secret.to_owned()))
    }
}

fn input(prompt: &str, default: &str) -> Result<String, CliError> {
    Input::<String>::new()
        .with_prompt(prompt)
        .default(default.to_owned())
        .interact_text()
        .map_err(prompt_err)
}

fn optional_input(prompt: &str) -> Result<Option<String>, CliError> {
    let value = Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;
    Ok(optional(&value))
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("notarydesk configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name = input("Profile name", "default")?;

            let project_url: String = Input::new()
                .with_prompt("Project URL")
                .validate_with(|raw: &String| -> Result<(), String> {
                    url::Url::parse(raw).map(|_| ()).map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_err)?;

            let anon_key: String = Input::new()
                .with_prompt("Anon (publishable) key")
                .interact_text()
                .map_err(prompt_err)?;
            if anon_key.trim().is_empty() {
                return Err(CliError::Validation {
                    field: "anon_key".into(),
                    reason: "anon key cannot be empty".into(),
                });
            }

            eprintln!("\n   The admin key is only needed for `bookings set-status` and `cancel`.");
            let admin = rpassword::prompt_password("Admin key (leave empty to skip): ")?;
            let admin_key = if admin.is_empty() {
                None
            } else {
                prompt_keyring_storage(&profile_name, KeyKind::Admin, &admin)?
            };

            let fallback = BusinessProfile::default();
            let business_name = input("Business name", &fallback.name)?;
            let business_phone = input("Business phone", &fallback.phone)?;
            let business_email = input("Business email", &fallback.email)?;
            let automation_webhook = optional_input("Automation webhook URL (optional)")?;

            let mut profile = Profile::new(project_url);
            profile.anon_key = Some(anon_key.trim().to_owned());
            profile.admin_key = admin_key;
            profile.business_name = Some(business_name);
            profile.business_phone = Some(business_phone);
            profile.business_email = Some(business_email);
            if let Some(url) = automation_webhook {
                apply_setting(&mut profile, "automation_webhook", &url)?;
            }

            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());
            save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Book a test appointment: notarydesk book");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let text = toml::to_string_pretty(&cfg).map_err(|e| CliError::Render(e.to_string()))?;
            let out = output::render_single(&global.output, &cfg, |_| text.clone(), |_| {
                config::config_path().display().to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);

            let profile = cfg
                .profiles
                .entry(profile_name.clone())
                .or_insert_with(Profile::default);
            apply_setting(profile, &key, &value)?;

            save_config(&cfg)?;
            eprintln!("✓ Set {key} on profile '{profile_name}'");
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: notarydesk config init");
            } else {
                for (name, profile) in &cfg.profiles {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}\t{}", profile.project_url);
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }

            cfg.default_profile = Some(name.clone());
            save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        // ── SetKey ──────────────────────────────────────────────────
        ConfigCommand::SetKey { profile, admin } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));

            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name: profile_name,
                });
            }

            let kind = if admin { KeyKind::Admin } else { KeyKind::Anon };
            let secret = rpassword::prompt_password(format!("{kind}: "))?;
            if secret.is_empty() {
                return Err(CliError::Validation {
                    field: "key".into(),
                    reason: "value cannot be empty".into(),
                });
            }
            notarydesk_config::store_key(&profile_name, kind, &secret)?;

            eprintln!("✓ {kind} stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}
