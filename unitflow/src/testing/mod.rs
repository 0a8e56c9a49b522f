//! Testing utilities for unitflow units.
//!
//! This module provides:
//! - Outcome assertions
//! - Fixtures: sample units, test objects and isolated configurations
//! - Recording steps that log their calls

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{
    assert_business_failure, assert_failure, assert_fatal, assert_output_value, assert_success,
    assert_validation_failure, assert_violation,
};
pub use fixtures::{copy_id_unit, isolated_configuration, TestInputs, TestObject};
pub use mocks::StepRecorder;
