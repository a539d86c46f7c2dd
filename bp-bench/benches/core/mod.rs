pub mod bp;
pub mod r2d2;
