pub mod aggregator;
pub mod openweather;
pub mod rate_limit;
