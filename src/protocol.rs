//! Wire-contract payload types. The core never touches a socket, it
//! produces and consumes these structs; encoding and transport are the
//! host's concern.

use serde::{Deserialize, Serialize};

use crate::constants::RING_BUFFER_CAPACITY;
use crate::entity::{Frame, PlayerNumber};

/// One tick's worth of local-player input, including the trailing history
/// the receiver needs to backfill a dropped packet. `inputs[i]` is the
/// input at frame `current_frame - i`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerInputPacket {
    pub player_number: PlayerNumber,
    pub current_frame: Frame,
    #[serde(with = "serde_big_array_inputs")]
    pub inputs: [u8; RING_BUFFER_CAPACITY],
}

/// `serde`'s derive only implements arrays up to 32 elements out of the
/// box; `RING_BUFFER_CAPACITY` is 64, so this field is serialized as a
/// sequence by hand instead of pulling in a const-generic array crate for
/// one field.
mod serde_big_array_inputs {
    use serde::de::{SeqAccess, Visitor};
    use serde::ser::SerializeTuple;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    use super::RING_BUFFER_CAPACITY;

    pub fn serialize<S: Serializer>(value: &[u8; RING_BUFFER_CAPACITY], serializer: S) -> Result<S::Ok, S::Error> {
        let mut tup = serializer.serialize_tuple(RING_BUFFER_CAPACITY)?;
        for byte in value {
            tup.serialize_element(byte)?;
        }
        tup.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; RING_BUFFER_CAPACITY], D::Error> {
        struct ArrayVisitor;
        impl<'de> Visitor<'de> for ArrayVisitor {
            type Value = [u8; RING_BUFFER_CAPACITY];

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "an array of {RING_BUFFER_CAPACITY} bytes")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut out = [0u8; RING_BUFFER_CAPACITY];
                for (index, slot) in out.iter_mut().enumerate() {
                    *slot = seq
                        .next_element()?
                        .ok_or_else(|| serde::de::Error::invalid_length(index, &self))?;
                }
                Ok(out)
            }
        }
        deserializer.deserialize_tuple(RING_BUFFER_CAPACITY, ArrayVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packet_field_order_is_stable() {
        let packet = PlayerInputPacket {
            player_number: 1,
            current_frame: 42,
            inputs: [0; RING_BUFFER_CAPACITY],
        };
        assert_eq!(packet.player_number, 1);
        assert_eq!(packet.current_frame, 42);
    }
}
