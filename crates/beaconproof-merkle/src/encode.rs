//! Chunk encoding
//!
//! Converts one typed field value into 32-byte chunks and reduces them to
//! the field's single summarizing root. Dispatch over field type is a
//! closed tagged-variant [`Value`] with one encoding rule per variant.
//! Variable-length containers bind their element count into the
//! commitment via the length mixin.

use crate::error::{Error, Result};
use crate::tree::{merkleize, mix_in_length};
use beaconproof_types::{Root, ROOT_SIZE};

/// One typed field value, ready to be reduced to its root chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Fixed-length byte blob; `length` is the schema-declared size
    Vector { bytes: Vec<u8>, length: usize },
    /// Unsigned 64-bit integer
    Uint64(u64),
    /// Fixed-arity record; `capacity` leaves are reserved for its fields
    Container { fields: Vec<Value>, capacity: u64 },
    /// Bounded list of composite elements, one subtree per element
    List { elements: Vec<Value>, limit: u64 },
    /// Bounded byte string, bytes packed 32 per chunk
    ByteList { bytes: Vec<u8>, limit: u64 },
    /// Bounded list of u64 values, packed 4 per chunk
    Uint64List { values: Vec<u64>, limit: u64 },
    /// Bounded bit string in wire form: a trailing delimiter bit marks
    /// the length and is excluded from the packed chunks
    Bitlist { data: Vec<u8>, limit: u64 },
}

impl Value {
    /// Container with the minimal power-of-two capacity for its fields
    pub fn container(fields: Vec<Value>) -> Value {
        let capacity = fields.len().max(1).next_power_of_two() as u64;
        Value::Container { fields, capacity }
    }

    /// Container reserving a schema-declared capacity
    pub fn container_with_capacity(fields: Vec<Value>, capacity: u64) -> Value {
        Value::Container { fields, capacity }
    }

    /// Reduce this value to its single summarizing chunk
    pub fn hash_tree_root(&self) -> Result<Root> {
        match self {
            Value::Vector { bytes, length } => {
                if bytes.len() != *length {
                    return Err(Error::LengthMismatch {
                        field: "vector".into(),
                        expected: *length,
                        actual: bytes.len(),
                    });
                }
                let limit = (*length as u64 + 31) / 32;
                merkleize(&pack_bytes(bytes), limit)
            }
            Value::Uint64(value) => Ok(uint64_chunk(*value)),
            Value::Container { fields, capacity } => {
                let roots = fields
                    .iter()
                    .map(Value::hash_tree_root)
                    .collect::<Result<Vec<_>>>()?;
                merkleize(&roots, *capacity)
            }
            Value::List { elements, limit } => {
                if elements.len() as u64 > *limit {
                    return Err(Error::ListTooLong {
                        field: "list".into(),
                        limit: *limit,
                        actual: elements.len() as u64,
                    });
                }
                let roots = elements
                    .iter()
                    .map(Value::hash_tree_root)
                    .collect::<Result<Vec<_>>>()?;
                Ok(mix_in_length(&merkleize(&roots, *limit)?, elements.len() as u64))
            }
            Value::ByteList { bytes, limit } => {
                if bytes.len() as u64 > *limit {
                    return Err(Error::ListTooLong {
                        field: "byte list".into(),
                        limit: *limit,
                        actual: bytes.len() as u64,
                    });
                }
                let chunk_limit = (*limit + 31) / 32;
                Ok(mix_in_length(
                    &merkleize(&pack_bytes(bytes), chunk_limit)?,
                    bytes.len() as u64,
                ))
            }
            Value::Uint64List { values, limit } => {
                if values.len() as u64 > *limit {
                    return Err(Error::ListTooLong {
                        field: "uint64 list".into(),
                        limit: *limit,
                        actual: values.len() as u64,
                    });
                }
                let mut packed = Vec::with_capacity(values.len() * 8);
                for value in values {
                    packed.extend_from_slice(&value.to_le_bytes());
                }
                let chunk_limit = (*limit * 8 + 31) / 32;
                Ok(mix_in_length(
                    &merkleize(&pack_bytes(&packed), chunk_limit)?,
                    values.len() as u64,
                ))
            }
            Value::Bitlist { data, limit } => {
                let (bits, bit_len) = strip_delimiter(data)?;
                if bit_len > *limit {
                    return Err(Error::ListTooLong {
                        field: "bitlist".into(),
                        limit: *limit,
                        actual: bit_len,
                    });
                }
                let chunk_limit = (*limit + 255) / 256;
                Ok(mix_in_length(
                    &merkleize(&pack_bytes(&bits), chunk_limit)?,
                    bit_len,
                ))
            }
        }
    }
}

/// Records that reduce to a hash tree root
pub trait Merkleize {
    /// Build the encoder value describing this record
    fn ssz_value(&self) -> Result<Value>;

    /// Compute the record's hash tree root
    fn hash_tree_root(&self) -> Result<Root> {
        self.ssz_value()?.hash_tree_root()
    }
}

/// Right-zero-pad bytes to a 32-byte multiple and split into chunks
pub fn pack_bytes(bytes: &[u8]) -> Vec<Root> {
    bytes
        .chunks(ROOT_SIZE)
        .map(|piece| {
            let mut chunk = [0u8; ROOT_SIZE];
            chunk[..piece.len()].copy_from_slice(piece);
            Root::from_bytes(chunk)
        })
        .collect()
}

/// A chunk holding a little-endian u64 in its first 8 bytes
pub fn uint64_chunk(value: u64) -> Root {
    let mut chunk = [0u8; ROOT_SIZE];
    chunk[..8].copy_from_slice(&value.to_le_bytes());
    Root::from_bytes(chunk)
}

/// Drop a bitlist's delimiter bit, returning packed bits and bit length
fn strip_delimiter(data: &[u8]) -> Result<(Vec<u8>, u64)> {
    let last = *data.last().ok_or(Error::MalformedBitlist)?;
    if last == 0 {
        return Err(Error::MalformedBitlist);
    }
    let msb = 7 - last.leading_zeros() as usize;
    let bit_len = (data.len() - 1) * 8 + msb;

    let mut bits = data.to_vec();
    if let Some(tail) = bits.last_mut() {
        *tail &= !(1u8 << msb);
    }
    bits.truncate((bit_len + 7) / 8);
    Ok((bits, bit_len as u64))
}

/// Fixed-length byte field with the actual size checked against the schema
pub fn checked_vector(field: &str, bytes: &[u8], length: usize) -> Result<Value> {
    if bytes.len() != length {
        return Err(Error::LengthMismatch {
            field: field.into(),
            expected: length,
            actual: bytes.len(),
        });
    }
    Ok(Value::Vector {
        bytes: bytes.to_vec(),
        length,
    })
}

/// Bounded composite list with the element count checked against the limit
pub fn checked_list(field: &str, elements: Vec<Value>, limit: u64) -> Result<Value> {
    if elements.len() as u64 > limit {
        return Err(Error::ListTooLong {
            field: field.into(),
            limit,
            actual: elements.len() as u64,
        });
    }
    Ok(Value::List { elements, limit })
}

/// Bounded byte string with the byte count checked against the limit
pub fn checked_byte_list(field: &str, bytes: &[u8], limit: u64) -> Result<Value> {
    if bytes.len() as u64 > limit {
        return Err(Error::ListTooLong {
            field: field.into(),
            limit,
            actual: bytes.len() as u64,
        });
    }
    Ok(Value::ByteList {
        bytes: bytes.to_vec(),
        limit,
    })
}

/// Bounded u64 list with the element count checked against the limit
pub fn checked_uint64_list(field: &str, values: &[u64], limit: u64) -> Result<Value> {
    if values.len() as u64 > limit {
        return Err(Error::ListTooLong {
            field: field.into(),
            limit,
            actual: values.len() as u64,
        });
    }
    Ok(Value::Uint64List {
        values: values.to_vec(),
        limit,
    })
}

/// Bounded bitlist with the bit count checked against the limit
pub fn checked_bitlist(field: &str, data: &[u8], limit: u64) -> Result<Value> {
    let (_, bit_len) = strip_delimiter(data)?;
    if bit_len > limit {
        return Err(Error::ListTooLong {
            field: field.into(),
            limit,
            actual: bit_len,
        });
    }
    Ok(Value::Bitlist {
        data: data.to_vec(),
        limit,
    })
}
