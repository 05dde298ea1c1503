// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `quill config` command: prints the resolved configuration as TOML.

use quill_config::QuillConfig;
use quill_core::QuillError;

const REDACTED: &str = "********";

pub fn run_config(config: &QuillConfig) -> Result<(), QuillError> {
    print!("{}", render(config)?);
    Ok(())
}

/// Serializes the config after masking both secrets.
fn render(config: &QuillConfig) -> Result<String, QuillError> {
    toml::to_string_pretty(&redacted(config))
        .map_err(|e| QuillError::Internal(format!("failed to serialize config: {e}")))
}

fn redacted(config: &QuillConfig) -> QuillConfig {
    let mut copy = config.clone();
    mask(&mut copy.telegram.bot_token);
    mask(&mut copy.airtable.api_token);
    copy
}

fn mask(secret: &mut Option<String>) {
    if secret.is_some() {
        *secret = Some(REDACTED.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_are_masked() {
        let mut config = QuillConfig::default();
        config.telegram.bot_token = Some("123456:real-token".into());
        config.airtable.api_token = Some("patSECRET".into());

        let out = render(&config).unwrap();
        assert!(!out.contains("real-token"));
        assert!(!out.contains("patSECRET"));
        assert_eq!(out.matches(REDACTED).count(), 2);
    }

    #[test]
    fn absent_secrets_stay_absent() {
        let out = render(&QuillConfig::default()).unwrap();
        assert!(!out.contains(REDACTED));
        assert!(!out.contains("bot_token"));
    }

    #[test]
    fn output_round_trips_through_loader() {
        let out = render(&QuillConfig::default()).unwrap();
        assert!(out.contains("[content]"));
        assert!(out.contains("id_prefix = \"CC\""));

        let reloaded = quill_config::load_and_validate_str(&out).unwrap();
        assert_eq!(reloaded.content.id_start, 30);
    }
}
