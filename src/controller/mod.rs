pub(crate) mod gesture;
pub(crate) mod keys;
pub(crate) mod manip;
