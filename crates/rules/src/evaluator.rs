//! Rule evaluation against a loaded dataset.

use serde::Serialize;
use tabula_core::Dataset;
use tracing::debug;

use crate::schema::{Aggregate, AlertRule};

/// A rule that fired.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub rule_id: String,
    pub rule_name: String,
    pub column: String,
    /// The compared value: the aggregate, or the first matching row's value
    /// for `any`.
    pub observed: f64,
    /// Rows whose own value satisfies the operator.
    pub matched_rows: Vec<usize>,
    pub message: String,
}

/// Check one rule. Disabled rules and columns with no numeric values never
/// fire.
pub fn evaluate(rule: &AlertRule, dataset: &Dataset) -> Option<Alert> {
    if !rule.metadata.enabled {
        debug!(rule_id = %rule.id(), "rule disabled");
        return None;
    }

    let spec = &rule.spec;
    let extracted = dataset.numbers(&spec.column);
    if extracted.is_empty() {
        debug!(rule_id = %rule.id(), column = %spec.column, "no numeric values");
        return None;
    }

    let matched_rows: Vec<usize> = extracted
        .values
        .iter()
        .filter(|(_, v)| spec.operator.matches(*v, spec.value))
        .map(|(row, _)| *row)
        .collect();

    let values = extracted.plain();
    let observed = match spec.aggregate {
        Aggregate::Any => *values
            .iter()
            .find(|v| spec.operator.matches(**v, spec.value))?,
        Aggregate::Mean => values.iter().sum::<f64>() / values.len() as f64,
        Aggregate::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        Aggregate::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
        Aggregate::Sum => values.iter().sum(),
        Aggregate::Last => *values.last()?,
    };

    if spec.aggregate != Aggregate::Any && !spec.operator.matches(observed, spec.value) {
        return None;
    }

    let message = match spec.aggregate {
        Aggregate::Any => format!(
            "{}: {} row(s) of {} {} {}",
            rule.metadata.name,
            matched_rows.len(),
            spec.column,
            spec.operator.symbol(),
            spec.value
        ),
        agg => format!(
            "{}: {} of {} is {:.2} ({} {})",
            rule.metadata.name,
            agg,
            spec.column,
            observed,
            spec.operator.symbol(),
            spec.value
        ),
    };

    Some(Alert {
        rule_id: rule.id().to_string(),
        rule_name: rule.metadata.name.clone(),
        column: spec.column.clone(),
        observed,
        matched_rows,
        message,
    })
}

/// Check every rule, keeping the alerts in rule order.
pub fn evaluate_all<'a>(
    rules: impl IntoIterator<Item = &'a AlertRule>,
    dataset: &Dataset,
) -> Vec<Alert> {
    rules
        .into_iter()
        .filter_map(|rule| evaluate(rule, dataset))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CommonMetadata, RuleKind, ThresholdOperator, ThresholdSpec};
    use tabula_core::{FieldValue, Record};

    fn rule(operator: ThresholdOperator, value: f64, aggregate: Aggregate) -> AlertRule {
        AlertRule {
            api_version: "v1".into(),
            kind: RuleKind::ThresholdAlert,
            metadata: CommonMetadata {
                id: "r1".into(),
                name: "Revenue watch".into(),
                description: None,
                tags: None,
                enabled: true,
            },
            spec: ThresholdSpec {
                column: "Revenue".into(),
                operator,
                value,
                aggregate,
            },
        }
    }

    fn revenue(cells: &[&str]) -> Dataset {
        cells
            .iter()
            .map(|c| {
                let mut r = Record::new();
                r.insert("Revenue".into(), FieldValue::from(*c));
                r
            })
            .collect()
    }

    #[test]
    fn any_fires_on_matching_rows() {
        let ds = revenue(&["10", "250", "n/a", "300"]);
        let alert = evaluate(&rule(ThresholdOperator::Gt, 200.0, Aggregate::Any), &ds).unwrap();
        assert_eq!(alert.matched_rows, vec![1, 3]);
        assert_eq!(alert.observed, 250.0);
        assert_eq!(alert.message, "Revenue watch: 2 row(s) of Revenue > 200");
    }

    #[test]
    fn any_without_match_is_silent() {
        let ds = revenue(&["10", "20"]);
        assert!(evaluate(&rule(ThresholdOperator::Gt, 200.0, Aggregate::Any), &ds).is_none());
    }

    #[test]
    fn aggregates() {
        let ds = revenue(&["10", "20", "60"]);
        let fire = |op, v, agg| evaluate(&rule(op, v, agg), &ds).map(|a| a.observed);

        assert_eq!(fire(ThresholdOperator::Gte, 30.0, Aggregate::Mean), Some(30.0));
        assert_eq!(fire(ThresholdOperator::Gt, 30.0, Aggregate::Mean), None);
        assert_eq!(fire(ThresholdOperator::Gt, 50.0, Aggregate::Max), Some(60.0));
        assert_eq!(fire(ThresholdOperator::Lt, 15.0, Aggregate::Min), Some(10.0));
        assert_eq!(fire(ThresholdOperator::Eq, 90.0, Aggregate::Sum), Some(90.0));
        assert_eq!(fire(ThresholdOperator::Neq, 60.0, Aggregate::Last), None);
    }

    #[test]
    fn aggregate_reports_individual_matches() {
        let ds = revenue(&["10", "20", "60"]);
        let alert = evaluate(&rule(ThresholdOperator::Gt, 25.0, Aggregate::Mean), &ds).unwrap();
        assert_eq!(alert.matched_rows, vec![2]);
        assert_eq!(alert.message, "Revenue watch: mean of Revenue is 30.00 (> 25)");
    }

    #[test]
    fn disabled_rule_never_fires() {
        let ds = revenue(&["1000"]);
        let mut r = rule(ThresholdOperator::Gt, 0.0, Aggregate::Any);
        r.metadata.enabled = false;
        assert!(evaluate(&r, &ds).is_none());
    }

    #[test]
    fn missing_column_never_fires() {
        let mut r = rule(ThresholdOperator::Gt, 0.0, Aggregate::Max);
        r.spec.column = "Cost".into();
        assert!(evaluate(&r, &revenue(&["5"])).is_none());
    }

    #[test]
    fn evaluate_all_keeps_rule_order() {
        let ds = revenue(&["10", "20"]);
        let mut second = rule(ThresholdOperator::Lt, 15.0, Aggregate::Min);
        second.metadata.id = "r2".into();
        let first = rule(ThresholdOperator::Gt, 15.0, Aggregate::Max);
        let never = rule(ThresholdOperator::Gt, 100.0, Aggregate::Any);

        let alerts = evaluate_all([&first, &never, &second], &ds);
        let ids: Vec<&str> = alerts.iter().map(|a| a.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r2"]);
    }
}
