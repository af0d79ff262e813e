pub(crate) mod signals;
