pub mod order;
pub mod template;
