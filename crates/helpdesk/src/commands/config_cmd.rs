//! Config subcommand handlers.

use helpdesk_config::{self as config, Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{active_profile_name, available_profiles};
use crate::error::CliError;
use crate::output;

use super::util;

const MASK: &str = "********";

/// Copy of `cfg` safe to print: plaintext tokens are masked.
fn redacted(cfg: &Config) -> Config {
    let mut shown = cfg.clone();
    for profile in shown.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some(MASK.into());
        }
    }
    shown
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config()?);
            let out = output::render_single(
                util::format(global),
                &cfg,
                |c| format!("{c:#?}"),
                |_| config::config_path().display().to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config()?;
            let active = active_profile_name(global, &cfg);
            let mut names: Vec<&String> = cfg.profiles.keys().collect();
            names.sort_unstable();
            let lines: Vec<String> = names
                .into_iter()
                .map(|name| {
                    let marker = if *name == active { "*" } else { " " };
                    format!("{marker} {name}")
                })
                .collect();
            output::print_output(&lines.join("\n"), global.quiet);
            Ok(())
        }

        ConfigCommand::AddProfile {
            name,
            subdomain,
            base_url,
            email,
            token_env,
        } => {
            let profile = Profile {
                subdomain,
                base_url,
                email,
                token_env,
                ..Profile::default()
            };
            // Fail now rather than on first use.
            profile.base_url()?;

            let mut cfg = config::load_config()?;
            if cfg.profiles.is_empty() {
                cfg.default_profile = Some(name.clone());
            }
            cfg.profiles.insert(name.clone(), profile);
            config::save_config(&cfg)?;

            if !global.quiet {
                eprintln!("Profile '{name}' saved to {}", config::config_path().display());
                eprintln!("Store its token with: helpdesk config set-token --profile {name} <TOKEN>");
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config()?;
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: available_profiles(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Default profile set to '{name}'");
            }
            Ok(())
        }

        ConfigCommand::SetToken { profile, token } => {
            let cfg = config::load_config()?;
            let name = profile.unwrap_or_else(|| active_profile_name(global, &cfg));
            config::store_token(&name, &token)?;
            if !global.quiet {
                eprintln!("Token for profile '{name}' stored in the system keyring");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn show_masks_plaintext_tokens() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "work".into(),
            Profile {
                subdomain: Some("acme".into()),
                email: "a@acme.test".into(),
                token: Some("s3cret".into()),
                ..Profile::default()
            },
        );
        let shown = redacted(&cfg);
        assert_eq!(shown.profiles["work"].token.as_deref(), Some(MASK));
        assert!(!format!("{shown:?}").contains("s3cret"));
    }
}
