pub mod forecast;
pub mod point;
pub mod record;
