//! Infrastructure shared by the bucketing layers

pub mod hash;
