pub(crate) mod request_context;
