pub(crate) mod direct_mapping;
pub(crate) mod indexed_mapping;
pub(crate) mod keyed_mapping;
