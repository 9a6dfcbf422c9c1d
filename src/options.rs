/// Parser and renderer options
use crate::error::Result;
use crate::flavor::BlockKind;
use serde::{Deserialize, Serialize};

/// Switches set before a parse; they never change during one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Emit HTML5 void elements (`<br>`) instead of XHTML (`<br />`)
    pub html5: bool,
    /// Turn every newline inside paragraph text into a hard line break
    pub enable_newlines: bool,
    /// Keep an ordered list's first number as its `start` attribute
    pub keep_list_start_number: bool,
    /// Mark descending ordered lists as `reversed`
    pub keep_reversed_list: bool,
    /// Render checkboxes as `<input>` elements rather than their literal marker
    pub render_checkbox_inputs: bool,
    /// Maximum nesting of block and inline parsing before the parse fails
    pub max_nesting_depth: usize,
    /// Replaces the flavor's block priority order when set
    pub block_priorities: Option<Vec<BlockKind>>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            html5: false,
            enable_newlines: false,
            keep_list_start_number: true,
            keep_reversed_list: false,
            render_checkbox_inputs: true,
            max_nesting_depth: 32,
            block_priorities: None,
        }
    }
}

impl Options {
    /// Load options from a TOML document; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Closing sequence for void elements
    pub(crate) fn void_close(&self) -> &'static str {
        if self.html5 { ">" } else { " />" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_keep_defaults() {
        let options = Options::from_toml_str("html5 = true\n").unwrap();
        assert!(options.html5);
        assert!(options.keep_list_start_number);
        assert_eq!(options.max_nesting_depth, 32);
    }

    #[test]
    fn block_priorities_parse_from_names() {
        let options =
            Options::from_toml_str("block_priorities = [\"Hr\", \"Quote\", \"Headline\"]\n")
                .unwrap();
        assert_eq!(
            options.block_priorities,
            Some(vec![BlockKind::Hr, BlockKind::Quote, BlockKind::Headline])
        );
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = Options::from_toml_str("html5 = \"yes\"").unwrap_err();
        assert!(matches!(err, crate::error::Error::Config(_)));
    }
}
