//! Frequent sequential pattern mining under attribute constraints.
//!
//! - [`session::Seq2Pat`] mines patterns that satisfy average, gap, median and span
//!   constraints over numeric attributes of the events ([`constraint`]).
//! - [`batch`] splits very large inputs into independently mined chunks.
//! - [`dichotomic`] compares the patterns of a positive and a negative group.
//! - [`encoding`] turns patterns into 0/1 occurrence features, using one of the exact
//!   verifiers in [`verifier`].

#[cfg(test)]
mod test_utils;

pub mod batch;
pub mod constraint;
pub mod dichotomic;
pub mod encoding;
pub mod error;
pub mod io;
pub mod item;
pub mod mining;
pub mod session;
pub mod solver;
pub mod verifier;

/// Name of an item type without its module path, e.g. `String` for
/// `alloc::string::String`. Generic arguments are dropped.
fn item_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let path = full.split('<').next().unwrap_or(full);
    path.rsplit("::").next().unwrap_or(path)
}
