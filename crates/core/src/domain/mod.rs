pub mod contract;
pub mod error;
pub mod normalize;
pub mod portfolio;
