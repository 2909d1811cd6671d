pub(crate) mod affine;
pub(crate) mod model;
