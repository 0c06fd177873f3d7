use biometrics::{Collector, Counter};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("lectern.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("lectern.client.request_errors");
pub(crate) static CLIENT_EMPTY_COMPLETIONS: Counter =
    Counter::new("lectern.client.empty_completions");

pub(crate) static SESSION_SENDS: Counter = Counter::new("lectern.session.sends");
pub(crate) static SESSION_SENDS_DROPPED: Counter = Counter::new("lectern.session.sends_dropped");

pub(crate) static RELAY_REQUESTS: Counter = Counter::new("lectern.relay.requests");
pub(crate) static RELAY_REJECTS: Counter = Counter::new("lectern.relay.rejects");
pub(crate) static RELAY_UPSTREAM_ERRORS: Counter = Counter::new("lectern.relay.upstream_errors");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_counter(&CLIENT_EMPTY_COMPLETIONS);

    collector.register_counter(&SESSION_SENDS);
    collector.register_counter(&SESSION_SENDS_DROPPED);

    collector.register_counter(&RELAY_REQUESTS);
    collector.register_counter(&RELAY_REJECTS);
    collector.register_counter(&RELAY_UPSTREAM_ERRORS);
}
