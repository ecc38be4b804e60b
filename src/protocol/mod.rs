// Line-delimited JSON protocol spoken between the controller and its client

pub mod codec;
pub mod message;

pub use codec::{decode, encode};
pub use message::Message;
