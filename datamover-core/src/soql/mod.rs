//! Query building and fragment checking

mod builder;
mod fragment;

pub use builder::{
    build_count_query, build_delete_query, build_query, build_test_query, BuiltQuery,
};
pub use fragment::{is_valid_order_by, is_valid_where};
