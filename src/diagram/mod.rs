pub mod document;
pub mod model;
pub mod theme;
