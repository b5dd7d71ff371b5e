pub mod estimator;
pub mod ranker;
