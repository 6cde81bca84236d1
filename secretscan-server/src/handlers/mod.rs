pub mod batch;
pub mod standalone;
