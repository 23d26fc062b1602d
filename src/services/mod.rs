pub mod audit;
pub mod coverage;
pub mod encoding;
pub mod fingerprint;
pub mod html;
pub mod loader;
pub mod presenter;
pub mod schema;
