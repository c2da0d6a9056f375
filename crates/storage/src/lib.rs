#![forbid(unsafe_code)]

pub mod json;
pub mod question_bank;
pub mod repository;
