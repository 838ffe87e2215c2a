pub mod extract;
pub mod response;
pub mod ssrf_validation;
pub mod upload;
