pub mod symbol;
pub mod ticker;
