pub mod employee;

pub use employee::{Employee, EmployeeInput, FieldViolation, ValidationError};
