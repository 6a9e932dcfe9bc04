pub mod playground;
pub mod server;

pub use server::{build_api_router, run_api};
