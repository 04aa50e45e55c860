pub mod area;
pub mod employee;
