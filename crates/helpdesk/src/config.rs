//! Translation of the TOML profile plus CLI flags into a core
//! `ClientConfig`.
//!
//! Flags and `HELPDESK_*` variables override the profile field by field;
//! with no profile at all, the flags alone must name an account.

use std::time::Duration;

use secrecy::SecretString;

use helpdesk_api::{Credentials, TlsMode, TransportConfig};
use helpdesk_config::{Config, Profile};
use helpdesk_core::{CacheConfig, ClientConfig};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Profile resolution ───────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref())
}

/// Output format: flag > env > `defaults.output` > table.
pub fn output_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    use clap::ValueEnum;

    global.output.unwrap_or_else(|| {
        OutputFormat::from_str(&config.defaults.output, true).unwrap_or(OutputFormat::Table)
    })
}

/// Build the core client configuration for this invocation.
pub fn build_client_config(global: &GlobalOpts, config: &Config) -> Result<ClientConfig, CliError> {
    let profile_name = active_profile_name(global, config);

    let profile = match config.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        // An explicitly requested profile must exist.
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(config),
            });
        }
        None if global.subdomain.is_some() || global.base_url.is_some() => Profile::default(),
        None => {
            return Err(CliError::NoConfig {
                path: helpdesk_config::config_path().display().to_string(),
            });
        }
    };

    let merged = Profile {
        subdomain: global.subdomain.clone().or(profile.subdomain.clone()),
        base_url: global.base_url.clone().or(profile.base_url.clone()),
        email: global.email.clone().unwrap_or_else(|| profile.email.clone()),
        ..profile
    };

    if merged.email.trim().is_empty() {
        return Err(CliError::Validation {
            field: "email".into(),
            reason: "set it in the profile or pass --email".into(),
        });
    }

    let base_url = merged.base_url()?;
    let token = resolve_token(&merged, &profile_name, global)?;

    let tls = if global.insecure {
        TlsMode::DangerAcceptInvalid
    } else {
        merged.tls_mode()
    };

    let timeout = global
        .timeout
        .or(merged.timeout)
        .unwrap_or(config.defaults.timeout);

    let cache = if global.no_cache {
        CacheConfig::disabled()
    } else {
        CacheConfig::from(&config.cache)
    };

    Ok(ClientConfig {
        base_url,
        credentials: Credentials::new(merged.email, token),
        transport: TransportConfig {
            tls,
            timeout: Duration::from_secs(timeout),
            ..TransportConfig::default()
        },
        cache,
    })
}

/// `--token` wins over everything the profile knows about.
fn resolve_token(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<SecretString, CliError> {
    if let Some(ref token) = global.token {
        return Ok(SecretString::from(token.clone()));
    }
    Ok(helpdesk_config::resolve_token(profile, profile_name)?)
}

pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        return "(none)".into();
    }
    let mut names: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
    names.sort_unstable();
    names.join(", ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser;
    use secrecy::ExposeSecret;

    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["helpdesk"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["config", "show"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with(name: &str, profile: Profile) -> Config {
        let mut config = Config::default();
        config.profiles.insert(name.into(), profile);
        config
    }

    #[test]
    fn flags_alone_describe_an_account() {
        let opts = global(&["--subdomain", "acme", "--email", "a@acme.test", "--token", "t0k"]);
        let cfg = build_client_config(&opts, &Config::default()).unwrap();
        assert_eq!(cfg.base_url.as_url().as_str(), "https://acme.zendesk.com/api/v2/");
        assert_eq!(cfg.credentials.email(), "a@acme.test");
    }

    #[test]
    fn flags_override_the_profile() {
        let profile = Profile {
            subdomain: Some("acme".into()),
            email: "a@acme.test".into(),
            token: Some("from-file".into()),
            timeout: Some(5),
            ..Profile::default()
        };
        let config = config_with("default", profile);
        let opts = global(&["--token", "from-flag", "--timeout", "9"]);
        let cfg = build_client_config(&opts, &config).unwrap();
        assert_eq!(cfg.transport.timeout, Duration::from_secs(9));
        assert_eq!(cfg.base_url.as_url().host_str(), Some("acme.zendesk.com"));

        let token = resolve_token(&config.profiles["default"], "default", &opts).unwrap();
        assert_eq!(token.expose_secret(), "from-flag");
    }

    #[test]
    fn no_profile_and_no_flags_is_no_config() {
        let err = build_client_config(&global(&[]), &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }

    #[test]
    fn unknown_explicit_profile_lists_alternatives() {
        let config = config_with("work", Profile::default());
        let err = build_client_config(&global(&["-p", "home"]), &config).unwrap_err();
        match err {
            CliError::ProfileNotFound { name, available } => {
                assert_eq!(name, "home");
                assert_eq!(available, "work");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn no_cache_disables_every_store() {
        let opts = global(&[
            "--base-url",
            "http://127.0.0.1:9/api/v2/",
            "--email",
            "a@acme.test",
            "--token",
            "t",
            "--no-cache",
        ]);
        let cfg = build_client_config(&opts, &Config::default()).unwrap();
        assert!(!cfg.cache.enabled);
    }

    #[test]
    fn output_falls_back_to_config_default() {
        let mut config = Config::default();
        config.defaults.output = "yaml".into();
        assert_eq!(output_format(&global(&[]), &config), OutputFormat::Yaml);
        assert_eq!(output_format(&global(&["-o", "json"]), &config), OutputFormat::Json);
    }
}
