pub(crate) mod compress;
pub(crate) mod decode;
pub(crate) mod loader;
