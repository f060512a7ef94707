pub mod archive_client;
pub mod error;
pub mod request;
pub(crate) mod response;
#[cfg(test)]
pub(crate) mod test_server;
