pub mod rest;
pub mod websocket;

pub use rest::health;
pub use websocket::{WsState, ws_handler};
