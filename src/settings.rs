//! Recognized inference/emission options, with serde support so a host
//! application can load persisted preferences.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Identifier for the outermost declaration.
    pub root_type_name: String,
    /// Recognize ISO-8601 timestamps in string values.
    pub detect_dates: bool,
    /// Declaration emitter only: alias vs interface style.
    pub output_style: OutputStyle,
    /// Schema emitter only: reject unknown object keys.
    pub strict_objects: bool,
    /// Declaration and example emitters only: rewrite snake_case property
    /// identifiers to camelCase. Schema keys are never rewritten, since the
    /// emitted schema must validate the unmodified input.
    pub snake_to_camel: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_type_name: "Root".to_string(),
            detect_dates: false,
            output_style: OutputStyle::Type,
            strict_objects: false,
            snake_to_camel: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    #[default]
    Type,
    Interface,
}

impl std::fmt::Display for OutputStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            OutputStyle::Type => "type",
            OutputStyle::Interface => "interface",
        })
    }
}
