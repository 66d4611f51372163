//! Data layer for the DataTable/DataView architecture.
//!
//! Tables hold the cells; everything downstream works with index lists.
//! [`view_service`] turns a [`view_spec::ViewSpec`] into a staged plan
//! and [`data_view`] resolves that plan back into visible rows.

pub mod data_view;
pub mod datatable;
pub mod type_inference;
pub mod value_compare;
pub mod view_service;
pub mod view_spec;
