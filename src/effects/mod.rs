pub(crate) mod config;
pub(crate) mod layer;
pub(crate) mod pipeline;
pub(crate) mod preset;
