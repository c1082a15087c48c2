pub(crate) mod batch;
pub(crate) mod evaluator;
pub(crate) mod time;
