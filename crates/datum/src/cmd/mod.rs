pub mod convert;
pub mod cost_models;
pub mod hash;
pub mod script_hash;
