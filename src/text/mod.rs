pub mod placeholders;
pub mod scenarios;
