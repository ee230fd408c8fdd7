//! Data domain: patient features and their validation.

pub mod domain;
pub mod service;

pub use domain::{Feature, FeatureRange, FeatureVector, FEATURE_COUNT, FEATURE_ORDER};
pub use service::{FieldError, Loc, ValidationErrors};
