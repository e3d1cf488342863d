//! Business logic services

pub mod calculators;
