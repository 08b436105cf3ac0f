pub mod context;
pub mod outlet;
pub mod parsers;
pub mod research;
pub mod workflow;
