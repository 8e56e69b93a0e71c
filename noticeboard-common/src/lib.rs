pub mod model;
pub mod spam;
pub mod stats;
pub mod text;
