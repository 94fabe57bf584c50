pub mod config;
pub mod handler;
pub mod logging;
pub mod packet;
pub mod paths;

pub use config::{
    Config, ConfigError, ContactsConfig, LogLevel, LoggingConfig, MediaConfig, ValidationError,
};
pub use handler::{DeviceChannel, HandlerError, HandlerResult, PacketHandler, PacketRouter};
pub use logging::{init_logging, LoggingError, LoggingGuard};
pub use packet::Packet;
pub use paths::{AppDirs, DirsError};

pub const APP_NAME: &str = "tether";
pub const APP_AUTHOR: &str = "Tether";
pub const APP_QUALIFIER: &str = "io";
