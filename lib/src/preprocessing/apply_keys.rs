//! Selection of which mappings of a sample a transform rewrites.

use crate::preprocessing::error::TransformError;
use serde::{Deserialize, Serialize};

/// One of the two mappings a transform may rewrite. Weights are never a target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Input,
    Label,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Input => "input",
            Target::Label => "label",
        }
    }
}

/// Validated, non-empty subset of `{input, label}`.
///
/// Built either from the constants or by parsing names with [`ApplyKeys::new`],
/// which rejects an empty list and any name outside the two targets. Repeated
/// names are accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApplyKeys {
    input: bool,
    label: bool,
}

impl Default for ApplyKeys {
    fn default() -> Self {
        Self::BOTH
    }
}

impl ApplyKeys {
    pub const BOTH: ApplyKeys = ApplyKeys {
        input: true,
        label: true,
    };
    pub const INPUT: ApplyKeys = ApplyKeys {
        input: true,
        label: false,
    };
    pub const LABEL: ApplyKeys = ApplyKeys {
        input: false,
        label: true,
    };

    /// Parses a list of target names.
    ///
    /// # Errors
    /// Returns [`TransformError::InvalidApplyKeys`] naming the whole tuple if it
    /// is empty or contains a name other than `"input"` or `"label"`.
    ///
    /// # Example
    /// ```
    /// use sciprep::preprocessing::ApplyKeys;
    ///
    /// assert_eq!(ApplyKeys::new(&["input"]).unwrap(), ApplyKeys::INPUT);
    /// assert!(ApplyKeys::new::<&str>(&[]).is_err());
    /// assert!(ApplyKeys::new(&["input", "extra"]).is_err());
    /// ```
    pub fn new<S: AsRef<str>>(keys: &[S]) -> Result<Self, TransformError> {
        let mut selected = ApplyKeys {
            input: false,
            label: false,
        };
        for key in keys {
            match key.as_ref() {
                "input" => selected.input = true,
                "label" => selected.label = true,
                _ => return Err(TransformError::InvalidApplyKeys(format_tuple(keys))),
            }
        }
        if !selected.input && !selected.label {
            return Err(TransformError::InvalidApplyKeys(format_tuple(keys)));
        }
        Ok(selected)
    }

    pub fn contains(&self, target: Target) -> bool {
        match target {
            Target::Input => self.input,
            Target::Label => self.label,
        }
    }

    pub fn targets(&self) -> Vec<Target> {
        [Target::Input, Target::Label]
            .into_iter()
            .filter(|t| self.contains(*t))
            .collect()
    }

    /// Names in canonical order, suitable for writing back into a config.
    pub fn to_names(&self) -> Vec<String> {
        self.targets()
            .into_iter()
            .map(|t| t.as_str().to_string())
            .collect()
    }
}

/// Default `apply_keys` used by configs that omit the field.
pub(crate) fn default_apply_keys() -> Vec<String> {
    ApplyKeys::BOTH.to_names()
}

/// Renders names as a tuple literal: `()`, `('input',)`, `('input', 'x')`.
fn format_tuple<S: AsRef<str>>(keys: &[S]) -> String {
    let quoted: Vec<String> = keys.iter().map(|k| format!("'{}'", k.as_ref())).collect();
    match quoted.len() {
        1 => format!("({},)", quoted[0]),
        _ => format!("({})", quoted.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_subsets() {
        assert_eq!(ApplyKeys::new(&["input", "label"]).unwrap(), ApplyKeys::BOTH);
        assert_eq!(ApplyKeys::new(&["label", "input"]).unwrap(), ApplyKeys::BOTH);
        assert_eq!(ApplyKeys::new(&["label"]).unwrap(), ApplyKeys::LABEL);
        assert_eq!(ApplyKeys::new(&["input", "input"]).unwrap(), ApplyKeys::INPUT);
    }

    #[test]
    fn test_empty_rejected() {
        let err = ApplyKeys::new::<&str>(&[]).unwrap_err();
        match err {
            TransformError::InvalidApplyKeys(tuple) => assert_eq!(tuple, "()"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_extra_key_rejected_and_named() {
        let err = ApplyKeys::new(&["input", "extra"]).unwrap_err();
        assert!(err.to_string().ends_with("('input', 'extra')"));

        let err = ApplyKeys::new(&["weight"]).unwrap_err();
        assert!(err.to_string().ends_with("('weight',)"));
    }

    #[test]
    fn test_targets_and_names() {
        assert_eq!(ApplyKeys::LABEL.targets(), vec![Target::Label]);
        assert_eq!(ApplyKeys::default().to_names(), vec!["input", "label"]);
        assert!(ApplyKeys::INPUT.contains(Target::Input));
        assert!(!ApplyKeys::INPUT.contains(Target::Label));
    }
}
