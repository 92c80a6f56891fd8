use serde::{Deserialize, Serialize};

/// Style overrides a host hands to the engine. Every field is
/// optional; absent fields keep their current value.
///
/// `color` and `wall_color` are aliases for the same override. Setting
/// either re-derives the shaded-wall and roof tones from it, so an
/// explicit `roof_color` should ride along when both matter.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleConfig {
    pub color: Option<String>,
    pub wall_color: Option<String>,
    pub roof_color: Option<String>,
    pub shadows: Option<bool>,
}

impl StyleConfig {
    /// The wall override with `color` taking precedence over
    /// `wall_color`, unparsed.
    pub fn wall_source(&self) -> Option<&str> {
        self.color.as_deref().or(self.wall_color.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::StyleConfig;

    #[test]
    fn parses_camel_case_overrides() {
        let config: StyleConfig = serde_json::from_str(
            r##"{ "wallColor": "#a0937d", "roofColor": "rgb(255, 0, 0)", "shadows": true }"##,
        )
        .unwrap();
        assert_eq!(config.wall_color.as_deref(), Some("#a0937d"));
        assert_eq!(config.roof_color.as_deref(), Some("rgb(255, 0, 0)"));
        assert_eq!(config.shadows, Some(true));
        assert_eq!(config.wall_source(), Some("#a0937d"));
    }

    #[test]
    fn color_shorthand_wins_over_wall_color() {
        let config: StyleConfig = serde_json::from_str(
            r##"{ "color": "salmon", "wallColor": "#102030" }"##,
        )
        .unwrap();
        assert_eq!(config.wall_source(), Some("salmon"));
    }

    #[test]
    fn absent_fields_stay_unset() {
        let config: StyleConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, StyleConfig::default());
        assert_eq!(config.wall_source(), None);
    }
}
