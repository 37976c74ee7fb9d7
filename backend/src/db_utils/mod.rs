pub mod postgres_utils;
pub mod sql_fragment;
