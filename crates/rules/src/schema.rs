//! YAML DSL schema for alert rules.
//!
//! ```yaml
//! apiVersion: v1
//! kind: ThresholdAlert
//! metadata:
//!   id: high-returns
//!   name: High returns
//! spec:
//!   column: Returns
//!   operator: gt
//!   value: 100
//!   aggregate: max
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::loader::{Result, RuleError};

/// Supported rule kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleKind {
    ThresholdAlert,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::ThresholdAlert => write!(f, "ThresholdAlert"),
        }
    }
}

/// Metadata shared by every rule document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CommonMetadata {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

/// Comparison operators for threshold checks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdOperator {
    Gt,
    Gte,
    Lt,
    Lte,
    Eq,
    Neq,
}

impl ThresholdOperator {
    /// Whether `value` satisfies the operator against `threshold`.
    pub fn matches(self, value: f64, threshold: f64) -> bool {
        match self {
            ThresholdOperator::Gt => value > threshold,
            ThresholdOperator::Gte => value >= threshold,
            ThresholdOperator::Lt => value < threshold,
            ThresholdOperator::Lte => value <= threshold,
            ThresholdOperator::Eq => (value - threshold).abs() < f64::EPSILON,
            ThresholdOperator::Neq => (value - threshold).abs() >= f64::EPSILON,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ThresholdOperator::Gt => ">",
            ThresholdOperator::Gte => ">=",
            ThresholdOperator::Lt => "<",
            ThresholdOperator::Lte => "<=",
            ThresholdOperator::Eq => "==",
            ThresholdOperator::Neq => "!=",
        }
    }
}

/// How column values are reduced before comparison.
///
/// `Any` compares each row on its own; the rest compare one aggregate.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Aggregate {
    #[default]
    Any,
    Mean,
    Max,
    Min,
    Sum,
    Last,
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Aggregate::Any => "any",
            Aggregate::Mean => "mean",
            Aggregate::Max => "max",
            Aggregate::Min => "min",
            Aggregate::Sum => "sum",
            Aggregate::Last => "last",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ThresholdSpec {
    pub column: String,
    pub operator: ThresholdOperator,
    pub value: f64,
    #[serde(default)]
    pub aggregate: Aggregate,
}

/// A complete `ThresholdAlert` document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertRule {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: RuleKind,
    pub metadata: CommonMetadata,
    pub spec: ThresholdSpec,
}

impl AlertRule {
    /// Parse and validate a single YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let rule: AlertRule = serde_yaml::from_str(yaml)?;
        rule.validate()?;
        Ok(rule)
    }

    pub fn id(&self) -> &str {
        &self.metadata.id
    }

    fn validate(&self) -> Result<()> {
        if self.metadata.id.trim().is_empty() {
            return Err(RuleError::Validation(
                "rule metadata.id must not be empty".to_string(),
            ));
        }
        if self.spec.column.trim().is_empty() {
            return Err(RuleError::Validation(format!(
                "rule '{}' has an empty spec.column",
                self.metadata.id
            )));
        }
        if !self.spec.value.is_finite() {
            return Err(RuleError::Validation(format!(
                "rule '{}' threshold must be finite",
                self.metadata.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULE: &str = r#"
apiVersion: v1
kind: ThresholdAlert
metadata:
  id: high-returns
  name: High returns
  tags: [sales]
spec:
  column: Returns
  operator: gte
  value: 100
  aggregate: max
"#;

    #[test]
    fn parses_full_rule() {
        let rule = AlertRule::from_yaml(RULE).unwrap();
        assert_eq!(rule.id(), "high-returns");
        assert_eq!(rule.kind, RuleKind::ThresholdAlert);
        assert!(rule.metadata.enabled);
        assert_eq!(rule.metadata.tags.as_deref(), Some(&["sales".to_string()][..]));
        assert_eq!(rule.spec.operator, ThresholdOperator::Gte);
        assert_eq!(rule.spec.aggregate, Aggregate::Max);
        assert_eq!(rule.spec.value, 100.0);
    }

    #[test]
    fn aggregate_defaults_to_any() {
        let yaml = RULE.replace("  aggregate: max\n", "");
        let rule = AlertRule::from_yaml(&yaml).unwrap();
        assert_eq!(rule.spec.aggregate, Aggregate::Any);
    }

    #[test]
    fn unknown_kind_is_a_parse_error() {
        let yaml = RULE.replace("ThresholdAlert", "AnomalyRule");
        assert!(matches!(AlertRule::from_yaml(&yaml), Err(RuleError::Parse(_))));
    }

    #[test]
    fn unknown_operator_is_a_parse_error() {
        let yaml = RULE.replace("operator: gte", "operator: between");
        assert!(matches!(AlertRule::from_yaml(&yaml), Err(RuleError::Parse(_))));
    }

    #[test]
    fn unknown_metadata_field_is_rejected() {
        let yaml = RULE.replace("  tags: [sales]", "  owner: ops");
        assert!(AlertRule::from_yaml(&yaml).is_err());
    }

    #[test]
    fn empty_id_fails_validation() {
        let yaml = RULE.replace("id: high-returns", "id: \"\"");
        assert!(matches!(
            AlertRule::from_yaml(&yaml),
            Err(RuleError::Validation(_))
        ));
    }

    #[test]
    fn operators_compare() {
        assert!(ThresholdOperator::Gt.matches(2.0, 1.0));
        assert!(!ThresholdOperator::Gt.matches(1.0, 1.0));
        assert!(ThresholdOperator::Gte.matches(1.0, 1.0));
        assert!(ThresholdOperator::Lt.matches(0.5, 1.0));
        assert!(ThresholdOperator::Lte.matches(1.0, 1.0));
        assert!(ThresholdOperator::Eq.matches(0.1 + 0.2, 0.3));
        assert!(ThresholdOperator::Neq.matches(2.0, 1.0));
    }
}
