pub mod prayer;
pub mod solar;
