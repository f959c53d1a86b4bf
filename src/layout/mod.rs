pub mod connector;
pub mod placement;
pub mod stack;
