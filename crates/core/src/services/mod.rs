pub mod catalog_service;
pub mod historical_service;
pub mod profit_service;
pub mod quote_service;
