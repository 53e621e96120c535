pub(crate) mod answer_keys;
pub(crate) mod error;
pub(crate) mod exam_activation;
pub(crate) mod exam_authority;
pub(crate) mod exam_duration;
pub(crate) mod lifecycle;
pub(crate) mod remaining_time;
pub(crate) mod scoring_aggregator;
pub(crate) mod session_manager;
pub(crate) mod tally;
