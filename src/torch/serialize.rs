//! Tensor snapshots for checkpoints
#![allow(clippy::use_self)] // created by serde derive for KindDef

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use std::convert::TryFrom;
use tch::{Device, Kind, Tensor};
use thiserror::Error;

/// Remote serialization definition for [`tch::Kind`].
///
/// Use `#[serde(with = "KindDef")]` when serializing a field of type [`Kind`].
#[derive(Serialize, Deserialize)]
#[serde(remote = "Kind")]
pub enum KindDef {
    Uint8,
    Int8,
    Int16,
    Int,
    Int64,
    Half,
    Float,
    Double,
    ComplexHalf,
    ComplexFloat,
    ComplexDouble,
    Bool,
    QInt8,
    QUInt8,
    QInt32,
    BFloat16,
}

/// System byte order serialization.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ByteOrder {
    LittleEndian,
    BigEndian,
}

impl ByteOrder {
    /// Native byte order for this system
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            Self::BigEndian
        } else {
            Self::LittleEndian
        }
    }
}

/// Owned copy of a tensor's contents, detached from any device or variable store.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorData {
    #[serde(with = "KindDef")]
    pub kind: Kind,
    pub shape: Vec<i64>,
    pub byte_order: ByteOrder,
    #[serde_as(as = "Bytes")]
    pub data: Vec<u8>,
}

impl TensorData {
    /// Number of elements implied by the shape.
    pub fn numel(&self) -> usize {
        self.shape
            .iter()
            .map(|&d| usize::try_from(d).unwrap_or(0))
            .product()
    }
}

/// Copy the data out of a tensor.
impl From<&Tensor> for TensorData {
    fn from(tensor: &Tensor) -> Self {
        let tensor = tensor.to_device(Device::Cpu).contiguous();
        let kind = tensor.kind();
        let shape = tensor.size();
        let num_elements = tensor.numel();

        // Tensor memory may be shared and reallocated; always copy.
        let mut data = vec![0; num_elements * kind.elt_size_in_bytes()];
        tensor.copy_data_u8(&mut data, num_elements);

        Self {
            kind,
            shape,
            byte_order: ByteOrder::native(),
            data,
        }
    }
}

/// Tensor data is not in the native byte order of this system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("tensor data has non-native byte order {0:?}")]
pub struct ByteOrderError(pub ByteOrder);

/// Create a CPU tensor by copying the snapshot data.
impl TryFrom<&TensorData> for Tensor {
    type Error = ByteOrderError;

    fn try_from(t: &TensorData) -> Result<Self, Self::Error> {
        if t.byte_order != ByteOrder::native() {
            return Err(ByteOrderError(t.byte_order));
        }
        Ok(Self::of_data_size(&t.data, &t.shape, t.kind))
    }
}
