use std::path::PathBuf;

use serde::Deserialize;

use rondo_types::{KeyCategory, SessionState, MAX_BPM, MAX_MEASURES, MIN_BPM, MIN_MEASURES};

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    defaults: DefaultsConfig,
}

#[derive(Deserialize, Default)]
struct DefaultsConfig {
    bpm: Option<u16>,
    measures_to_change: Option<u8>,
    category: Option<String>,
    prep_bar: Option<bool>,
    click_volume: Option<f32>,
}

pub struct Config {
    defaults: DefaultsConfig,
}

impl Config {
    pub fn load() -> Self {
        let mut base: ConfigFile = match toml::from_str(DEFAULT_CONFIG) {
            Ok(base) => base,
            Err(e) => {
                log::error!(target: "config", "embedded config.toml is malformed: {}", e);
                ConfigFile::default()
            }
        };

        if let Some(path) = user_config_path() {
            if path.exists() {
                match std::fs::read_to_string(&path) {
                    Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                        Ok(user) => merge_defaults(&mut base.defaults, user.defaults),
                        Err(e) => {
                            log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                        }
                    },
                    Err(e) => {
                        log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
                    }
                }
            }
        }

        Config {
            defaults: base.defaults,
        }
    }

    /// Session defaults with out-of-range values clamped.
    pub fn session_defaults(&self) -> SessionState {
        let fallback = SessionState::default();
        SessionState {
            bpm: self
                .defaults
                .bpm
                .unwrap_or(fallback.bpm)
                .clamp(MIN_BPM, MAX_BPM),
            measures_to_change: self
                .defaults
                .measures_to_change
                .unwrap_or(fallback.measures_to_change)
                .clamp(MIN_MEASURES, MAX_MEASURES),
            category: self
                .defaults
                .category
                .as_deref()
                .and_then(parse_category)
                .unwrap_or(fallback.category),
            prep_bar: self.defaults.prep_bar.unwrap_or(fallback.prep_bar),
            click_volume: self
                .defaults
                .click_volume
                .unwrap_or(fallback.click_volume)
                .clamp(0.0, 1.0),
            midi_enabled: fallback.midi_enabled,
        }
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("rondo").join("config.toml"))
}

fn merge_defaults(base: &mut DefaultsConfig, user: DefaultsConfig) {
    if user.bpm.is_some() {
        base.bpm = user.bpm;
    }
    if user.measures_to_change.is_some() {
        base.measures_to_change = user.measures_to_change;
    }
    if user.category.is_some() {
        base.category = user.category;
    }
    if user.prep_bar.is_some() {
        base.prep_bar = user.prep_bar;
    }
    if user.click_volume.is_some() {
        base.click_volume = user.click_volume;
    }
}

fn parse_category(s: &str) -> Option<KeyCategory> {
    match s.to_lowercase().as_str() {
        "all" => Some(KeyCategory::All),
        "majors" | "major" => Some(KeyCategory::Majors),
        "minors" | "minor" => Some(KeyCategory::Minors),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults() {
        let base: ConfigFile = toml::from_str(DEFAULT_CONFIG).unwrap();
        let config = Config {
            defaults: base.defaults,
        };
        let session = config.session_defaults();
        assert_eq!(session.bpm, 120);
        assert_eq!(session.measures_to_change, 4);
        assert_eq!(session.category, KeyCategory::All);
        assert!(session.prep_bar);
        assert!((session.click_volume - 0.7).abs() < f32::EPSILON);
        assert!(!session.midi_enabled);
    }

    #[test]
    fn test_merge_overrides_only_present_fields() {
        let mut base: ConfigFile = toml::from_str(DEFAULT_CONFIG).unwrap();
        let user: ConfigFile = toml::from_str(
            r#"
            [defaults]
            bpm = 90
            category = "Minors"
            "#,
        )
        .unwrap();
        merge_defaults(&mut base.defaults, user.defaults);
        let config = Config {
            defaults: base.defaults,
        };
        let session = config.session_defaults();
        assert_eq!(session.bpm, 90);
        assert_eq!(session.category, KeyCategory::Minors);
        assert_eq!(session.measures_to_change, 4);
        assert!(session.prep_bar);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let user: ConfigFile = toml::from_str(
            r#"
            [defaults]
            bpm = 1000
            measures_to_change = 99
            click_volume = 3.5
            "#,
        )
        .unwrap();
        let config = Config {
            defaults: user.defaults,
        };
        let session = config.session_defaults();
        assert_eq!(session.bpm, MAX_BPM);
        assert_eq!(session.measures_to_change, MAX_MEASURES);
        assert!((session.click_volume - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_parse_category() {
        assert_eq!(parse_category("All"), Some(KeyCategory::All));
        assert_eq!(parse_category("majors"), Some(KeyCategory::Majors));
        assert_eq!(parse_category("Minor"), Some(KeyCategory::Minors));
        assert_eq!(parse_category("pentatonic"), None);
    }
}
