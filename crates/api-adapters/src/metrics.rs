//! Prometheus counters for claim transitions and message traffic.

use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct TransitionLabels {
    pub transition: String,
}

pub struct Metrics {
    registry: Registry,
    claim_transitions: Family<TransitionLabels, Counter>,
    messages_posted: Counter,
}

impl Metrics {
    pub fn new() -> Self {
        let mut registry = Registry::with_prefix("reclaim");
        let claim_transitions = Family::<TransitionLabels, Counter>::default();
        let messages_posted = Counter::default();

        registry.register(
            "claim_transitions",
            "Claim lifecycle transitions by kind",
            claim_transitions.clone(),
        );
        registry.register(
            "messages_posted",
            "Messages accepted into conversations",
            messages_posted.clone(),
        );

        Self { registry, claim_transitions, messages_posted }
    }

    pub fn record_transition(&self, transition: &str) {
        self.claim_transitions
            .get_or_create(&TransitionLabels { transition: transition.to_string() })
            .inc();
    }

    pub fn record_message(&self) {
        self.messages_posted.inc();
    }

    /// OpenMetrics text exposition.
    pub fn render(&self) -> Result<String, std::fmt::Error> {
        let mut out = String::new();
        encode(&mut out, &self.registry)?;
        Ok(out)
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_exposition() {
        let metrics = Metrics::new();
        metrics.record_transition("approved");
        metrics.record_transition("approved");
        metrics.record_message();

        let text = metrics.render().unwrap();
        assert!(text.contains("reclaim_claim_transitions_total{transition=\"approved\"} 2"));
        assert!(text.contains("reclaim_messages_posted_total 1"));
    }
}
