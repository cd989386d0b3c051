pub mod estimators;
pub mod mc_engine;
pub mod parallel;
pub mod path_engine;
pub mod paths;
pub mod payoffs;
pub mod regression;
