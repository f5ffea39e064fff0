pub mod access;
pub mod config;
pub mod expand;
pub mod params;
pub mod request;
pub mod source;
pub mod value;
