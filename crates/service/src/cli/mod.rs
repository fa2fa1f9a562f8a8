pub mod args;
pub mod op;
pub mod ops;

pub use ops::{Docs, GrantAdmin, Health, Login, Register, Serve, Stats, Upload, Version};
