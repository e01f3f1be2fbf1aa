//! Alerting on per-tier SLA signals.
//!
//! Provides alert rules, thresholds, and firing/resolved transitions.

use crate::core::{now, SlaTier, TierMap, Timestamp};
use crate::sla::agreement::TrackerConfig;
use crate::sla::tracker::SlaMetrics;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

/// Alert severity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertSeverity {
    /// Warning
    Warning,
    /// Critical
    Critical,
}

/// Alert state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertState {
    /// Actively firing
    Firing,
    /// Resolved
    Resolved,
}

/// Per-tier value a rule watches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertSignal {
    Availability,
    ErrorBudgetRemaining,
    BurnRate,
}

impl AlertSignal {
    fn read(&self, metrics: &SlaMetrics) -> f64 {
        match self {
            AlertSignal::Availability => metrics.current_availability,
            AlertSignal::ErrorBudgetRemaining => metrics.error_budget_remaining,
            AlertSignal::BurnRate => metrics.error_budget_burn_rate,
        }
    }
}

/// Alert condition operators.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum AlertCondition {
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
}

/// An alert rule.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AlertRule {
    /// Rule name
    pub name: String,
    /// Tier watched
    pub tier: SlaTier,
    /// Signal watched
    pub signal: AlertSignal,
    /// Condition
    pub condition: AlertCondition,
    /// Threshold value
    pub threshold: f64,
    /// Severity
    pub severity: AlertSeverity,
}

impl AlertRule {
    /// Create a new alert rule.
    pub fn new(
        name: &str,
        tier: SlaTier,
        signal: AlertSignal,
        condition: AlertCondition,
        threshold: f64,
    ) -> Self {
        Self {
            name: name.to_string(),
            tier,
            signal,
            condition,
            threshold,
            severity: AlertSeverity::Warning,
        }
    }

    /// Set severity.
    pub fn with_severity(mut self, severity: AlertSeverity) -> Self {
        self.severity = severity;
        self
    }

    /// Check if value triggers this rule.
    pub fn evaluate(&self, value: f64) -> bool {
        match self.condition {
            AlertCondition::GreaterThan => value > self.threshold,
            AlertCondition::LessThan => value < self.threshold,
            AlertCondition::GreaterOrEqual => value >= self.threshold,
            AlertCondition::LessOrEqual => value <= self.threshold,
        }
    }
}

/// An alert instance.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Alert {
    /// Alert name (from rule)
    pub name: String,
    /// Tier the alert is about
    pub tier: SlaTier,
    /// Current state
    pub state: AlertState,
    /// Severity
    pub severity: AlertSeverity,
    /// Latest observed value
    pub value: f64,
    /// Threshold that was crossed
    pub threshold: f64,
    /// When alert started firing
    pub fired_at: Timestamp,
    /// When alert resolved
    pub resolved_at: Option<Timestamp>,
}

impl Alert {
    /// Create a firing alert from a rule.
    pub fn from_rule(rule: &AlertRule, value: f64) -> Self {
        Self {
            name: rule.name.clone(),
            tier: rule.tier,
            state: AlertState::Firing,
            severity: rule.severity,
            value,
            threshold: rule.threshold,
            fired_at: now(),
            resolved_at: None,
        }
    }

    /// Resolve the alert.
    pub fn resolve(&mut self) {
        self.state = AlertState::Resolved;
        self.resolved_at = Some(now());
    }

    /// Check if firing.
    pub fn is_firing(&self) -> bool {
        self.state == AlertState::Firing
    }
}

/// Alert manager for SLA rules.
#[derive(Default)]
pub struct AlertManager {
    /// Alert rules
    rules: Vec<AlertRule>,
    /// Firing alerts by rule name
    alerts: HashMap<String, Alert>,
    /// Resolved alerts
    history: Vec<Alert>,
}

impl AlertManager {
    /// Create a new alert manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Warning and critical error budget rules for every tier.
    pub fn from_config(config: &TrackerConfig) -> Self {
        let mut manager = Self::new();
        for (tier, targets) in config.tiers.iter() {
            manager.add_rule(AlertRule::new(
                &format!("{}_error_budget_low", tier),
                tier,
                AlertSignal::ErrorBudgetRemaining,
                AlertCondition::LessThan,
                targets.alert_threshold,
            ));
            manager.add_rule(
                AlertRule::new(
                    &format!("{}_error_budget_critical", tier),
                    tier,
                    AlertSignal::ErrorBudgetRemaining,
                    AlertCondition::LessThan,
                    targets.critical_threshold,
                )
                .with_severity(AlertSeverity::Critical),
            );
        }
        manager
    }

    /// Add an alert rule.
    pub fn add_rule(&mut self, rule: AlertRule) {
        self.rules.push(rule);
    }

    /// Evaluate every rule; returns alerts that fired or resolved.
    pub fn evaluate(&mut self, metrics: &TierMap<SlaMetrics>) -> Vec<Alert> {
        let mut changed = Vec::new();

        for rule in &self.rules {
            let value = rule.signal.read(metrics.get(rule.tier));

            if rule.evaluate(value) {
                if let Some(alert) = self.alerts.get_mut(&rule.name) {
                    alert.value = value;
                } else {
                    let alert = Alert::from_rule(rule, value);
                    warn!(
                        alert = %alert.name,
                        tier = %alert.tier,
                        severity = ?alert.severity,
                        value,
                        threshold = alert.threshold,
                        "SLA alert firing"
                    );
                    changed.push(alert.clone());
                    self.alerts.insert(rule.name.clone(), alert);
                }
            } else if let Some(mut alert) = self.alerts.remove(&rule.name) {
                alert.value = value;
                alert.resolve();
                info!(alert = %alert.name, tier = %alert.tier, value, "SLA alert resolved");
                changed.push(alert.clone());
                self.history.push(alert);
            }
        }

        changed
    }

    /// Get firing alerts.
    pub fn firing_alerts(&self) -> Vec<&Alert> {
        self.alerts.values().filter(|a| a.is_firing()).collect()
    }

    /// Get alert by name.
    pub fn get_alert(&self, name: &str) -> Option<&Alert> {
        self.alerts.get(name)
    }

    /// Get rules.
    pub fn rules(&self) -> &[AlertRule] {
        &self.rules
    }

    /// Get history.
    pub fn history(&self) -> &[Alert] {
        &self.history
    }
}
