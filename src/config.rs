use crate::ConfigError;

const DEFAULT_EXP_LABEL: &str = "EXP";

/// Presentation options for the aftermath panels.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AftermathConfig {
    /// Use the compact, one-column-per-actor experience panel even when no
    /// message will show.
    pub always_compact_exp: bool,
    /// Label drawn next to gained experience in the compact panel.
    pub exp_label: String,
}

impl Default for AftermathConfig {
    fn default() -> Self {
        Self {
            always_compact_exp: false,
            exp_label: DEFAULT_EXP_LABEL.to_owned(),
        }
    }
}

impl AftermathConfig {
    /// Read plugin-style string parameters.
    ///
    /// Recognized keys are `always_compact_exp` and `exp_label`. Missing
    /// keys keep their defaults; unknown keys are ignored. An empty
    /// `exp_label` falls back to the default label.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBool`] if `always_compact_exp` is not
    /// `true` or `false`.
    ///
    /// # Example
    ///
    /// ```
    /// use aftermath::AftermathConfig;
    ///
    /// let config = AftermathConfig::from_params([
    ///     ("always_compact_exp", "true"),
    ///     ("exp_label", "XP"),
    /// ])
    /// .unwrap();
    ///
    /// assert!(config.always_compact_exp);
    /// assert_eq!(config.exp_label, "XP");
    /// ```
    pub fn from_params<'a, I>(params: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = Self::default();
        for (key, value) in params {
            match key {
                "always_compact_exp" => config.always_compact_exp = parse_bool(key, value)?,
                "exp_label" => {
                    let label = value.trim();
                    if !label.is_empty() {
                        config.exp_label = label.to_owned();
                    }
                }
                _ => tracing::warn!(key, "ignoring unknown aftermath parameter"),
            }
        }
        Ok(config)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" | "" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key: key.to_owned(),
            value: value.to_owned(),
        }),
    }
}

/// Screen geometry the layout decisions are computed from, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowMetrics {
    /// Height of the whole drawable area.
    pub box_height: u32,
    /// Height of the one-line title panel above the aftermath panels.
    pub title_height: u32,
    /// Standard height of the dialog box.
    pub message_height: u32,
}

impl Default for WindowMetrics {
    fn default() -> Self {
        Self {
            box_height: 624,
            title_height: 72,
            message_height: 180,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AftermathConfig::default();
        assert!(!config.always_compact_exp);
        assert_eq!(config.exp_label, "EXP");
    }

    #[test]
    fn empty_params_keep_defaults() {
        let config = AftermathConfig::from_params([]).unwrap();
        assert_eq!(config, AftermathConfig::default());
    }

    #[test]
    fn bool_is_case_insensitive() {
        let config = AftermathConfig::from_params([("always_compact_exp", " TRUE ")]).unwrap();
        assert!(config.always_compact_exp);
    }

    #[test]
    fn bad_bool_is_an_error() {
        let err = AftermathConfig::from_params([("always_compact_exp", "yes")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidBool {
                key: "always_compact_exp".into(),
                value: "yes".into(),
            }
        );
    }

    #[test]
    fn blank_label_keeps_default() {
        let config = AftermathConfig::from_params([("exp_label", "  ")]).unwrap();
        assert_eq!(config.exp_label, "EXP");
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config = AftermathConfig::from_params([("window_skin", "dark")]).unwrap();
        assert_eq!(config, AftermathConfig::default());
    }
}
