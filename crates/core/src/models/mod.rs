pub mod asset;
pub mod historical;
pub mod luxury;
pub mod profit;
pub mod quote;
pub mod settings;
