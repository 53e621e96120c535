pub(crate) mod answers;
pub(crate) mod exams;
pub(crate) mod health;
pub(crate) mod questions;
pub(crate) mod scores;
pub(crate) mod sessions;
