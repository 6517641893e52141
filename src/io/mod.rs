pub mod bulk;
pub mod cosmic;
