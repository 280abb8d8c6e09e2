//! Domain types for FeatureLab

pub mod bar;
pub mod table;

pub use bar::Bar;
pub use table::OhlcvTable;
