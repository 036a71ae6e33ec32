pub mod app;
pub mod auth;
pub mod client;
pub mod comprobantes;
pub mod config;
pub mod error;
pub mod extract;
pub mod lookup;
pub mod productos;
pub mod state;
pub mod store;
