pub mod pins;
pub mod server;
pub mod token;
