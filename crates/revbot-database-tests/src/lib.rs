mod testcase;

#[cfg(test)]
mod assignment_slot;
#[cfg(test)]
mod fixtures;
#[cfg(test)]
mod pull_request;
#[cfg(test)]
mod team;
#[cfg(test)]
mod transaction;
#[cfg(test)]
mod user;

pub use testcase::{db_test_case, TEST_LOCK_TIMEOUT};
