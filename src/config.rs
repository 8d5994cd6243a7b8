use serde::{Deserialize, Serialize};

use crate::error::FormResult;
use crate::grid::{compute_sub_columns, validate_widths, SubColumns};

/// Renderer settings, usually loaded from YAML:
///
/// ```yaml
/// col_left: 2
/// col_right: 8
/// group_level: 1
/// prior_groups: [contact]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Grid units taken by labels.
    pub col_left: u32,
    /// Grid units taken by widgets.
    pub col_right: u32,
    /// Width of a nested fieldset in grid units.
    pub sub_width: u32,
    /// How many levels of containers are turned into groups.
    pub group_level: usize,
    /// Groups rendered before all others, in this order.
    pub prior_groups: Vec<String>,
    /// Show control errors next to their inputs instead of in the form error list.
    pub errors_at_inputs: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            col_left: 3,
            col_right: 6,
            sub_width: 8,
            group_level: 0,
            prior_groups: Vec::new(),
            errors_at_inputs: true,
        }
    }
}

impl RendererConfig {
    pub fn from_yaml(yaml: &str) -> FormResult<Self> {
        let config: RendererConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> FormResult<()> {
        validate_widths(self.col_left, self.col_right, self.sub_width)
    }

    pub fn sub_columns(&self) -> FormResult<SubColumns> {
        compute_sub_columns(self.col_left, self.col_right, self.sub_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormError;

    #[test]
    fn test_defaults() {
        let config = RendererConfig::default();
        assert_eq!(config.col_left, 3);
        assert_eq!(config.col_right, 6);
        assert_eq!(config.sub_width, 8);
        assert_eq!(config.group_level, 0);
        assert!(config.prior_groups.is_empty());
        assert!(config.errors_at_inputs);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = RendererConfig::from_yaml("group_level: 2\nprior_groups: [contact]\n").unwrap();
        assert_eq!(config.group_level, 2);
        assert_eq!(config.prior_groups, vec!["contact".to_string()]);
        assert_eq!(config.col_right, 6);
    }

    #[test]
    fn test_invalid_widths_rejected() {
        let result = RendererConfig::from_yaml("col_left: 8\ncol_right: 6\n");
        assert!(matches!(result, Err(FormError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_overflowing_widths_rejected() {
        let result = RendererConfig::from_yaml("col_left: 4294967295\ncol_right: 1\n");
        assert!(matches!(result, Err(FormError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_bad_yaml() {
        let result = RendererConfig::from_yaml("col_left: [nope");
        assert!(matches!(result, Err(FormError::YamlError(_))));
    }
}
