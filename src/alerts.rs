// Threshold alerting. Stateless: every call builds fresh alerts; history is the caller's concern.

use crate::error::MetricsError;
use crate::models::{AlertRule, AlertSnapshot, TriggeredAlert, default_rules};

/// Rules that fire on `snapshot`, in rule order. Strictly greater-than: a value equal to the
/// threshold does not fire.
pub fn evaluate(snapshot: &AlertSnapshot, rules: &[AlertRule]) -> Vec<TriggeredAlert> {
    rules
        .iter()
        .filter_map(|rule| {
            let value = snapshot.get(rule.metric);
            (value > rule.threshold).then(|| TriggeredAlert {
                metric: rule.metric,
                threshold: rule.threshold,
                level: rule.level,
                message: rule.message.clone(),
                value,
            })
        })
        .collect()
}

/// A fixed rule set, built once from config and shared by the worker and HTTP handlers.
#[derive(Debug, Clone)]
pub struct AlertEvaluator {
    rules: Vec<AlertRule>,
}

impl Default for AlertEvaluator {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl AlertEvaluator {
    pub fn new(rules: Vec<AlertRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[AlertRule] {
        &self.rules
    }

    /// Fails on non-finite values instead of letting NaN silently compare false.
    pub fn evaluate(&self, snapshot: &AlertSnapshot) -> Result<Vec<TriggeredAlert>, MetricsError> {
        for (field, value) in [
            ("cpu", snapshot.cpu),
            ("memory", snapshot.memory),
            ("disk", snapshot.disk),
        ] {
            if !value.is_finite() {
                return Err(MetricsError::InvalidSnapshot { field, value });
            }
        }
        Ok(evaluate(snapshot, &self.rules))
    }
}
