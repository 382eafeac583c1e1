//! Bridge - 外部网关进程（聊天平台连接）的 WebSocket 桥接

mod hub;
mod protocol;

pub use hub::{BridgeHub, BRIDGE_DISCONNECTED};
pub use protocol::{BridgeCommand, BridgeEvent};
