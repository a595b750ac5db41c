use bytes::{Buf, BufMut};

use crate::error::WireError;

/// Size of a control-characteristic write.
pub const CONTROL_MESSAGE_LEN: usize = 7;

/// Commands carried on the control characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start = 0x01,
    Stop = 0x02,
    Ack = 0x03,
}

impl Command {
    fn from_byte(b: u8) -> Result<Self, WireError> {
        match b {
            0x01 => Ok(Command::Start),
            0x02 => Ok(Command::Stop),
            0x03 => Ok(Command::Ack),
            other => Err(WireError::BadCommand(other)),
        }
    }
}

/// A control message: `command, block_number, timestamp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlMessage {
    pub command: Command,
    pub block_number: u16,
    pub timestamp: u32,
}

impl ControlMessage {
    pub fn start() -> Self {
        Self {
            command: Command::Start,
            block_number: 0,
            timestamp: 0,
        }
    }

    pub fn stop() -> Self {
        Self {
            command: Command::Stop,
            block_number: 0,
            timestamp: 0,
        }
    }

    pub fn ack(block_number: u16, timestamp: u32) -> Self {
        Self {
            command: Command::Ack,
            block_number,
            timestamp,
        }
    }

    pub fn encode(&self, buf: &mut impl BufMut) {
        buf.put_u8(self.command as u8);
        buf.put_u16_le(self.block_number);
        buf.put_u32_le(self.timestamp);
    }

    pub fn decode(buf: &mut impl Buf) -> Result<Self, WireError> {
        if buf.remaining() < CONTROL_MESSAGE_LEN {
            return Err(WireError::ShortFrame {
                need: CONTROL_MESSAGE_LEN,
                got: buf.remaining(),
            });
        }
        let command = Command::from_byte(buf.get_u8())?;
        let block_number = buf.get_u16_le();
        let timestamp = buf.get_u32_le();
        Ok(Self {
            command,
            block_number,
            timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ack_roundtrip() {
        let m = ControlMessage::ack(19, 123_456);
        let mut buf = Vec::new();
        m.encode(&mut buf);
        assert_eq!(buf.len(), CONTROL_MESSAGE_LEN);
        let mut cursor = &buf[..];
        assert_eq!(ControlMessage::decode(&mut cursor).unwrap(), m);
    }

    #[test]
    fn bad_command_byte() {
        let bytes = [0x7fu8, 0, 0, 0, 0, 0, 0];
        let mut cursor = &bytes[..];
        assert_eq!(
            ControlMessage::decode(&mut cursor),
            Err(WireError::BadCommand(0x7f))
        );
    }
}
