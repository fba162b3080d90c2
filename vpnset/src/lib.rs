pub mod addr;
pub mod conf;
pub mod fetch;
pub mod index4;
pub mod index6;
pub mod meta;
pub mod range;
pub mod utils;
pub mod vpnset;
