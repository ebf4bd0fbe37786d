//! TRANSFER: bit-level reinterpretation of a constant

use tracing::trace;

use super::{TypeVal, Value, extended};
use crate::common::{SemaError, SemaResult};
use crate::types::{Category, SemaType};

/// Widest numeric storage: a COMPLEX of two 10-byte reals
const MAX_NUMERIC_WIDTH: usize = 20;

impl TypeVal {
    /// Reinterpret the storage bytes of this constant as `target`
    ///
    /// The source is serialized little-endian, then truncated or zero
    /// filled to the size of `target` and decoded.
    pub fn transfer(&self, target: &SemaType) -> SemaResult<TypeVal> {
        let bytes = self.storage_bytes()?;
        trace!(source = %self.ty, target = %target, len = bytes.len(), "transfer");
        self.from_storage(&bytes, target)
    }

    fn storage_bytes(&self) -> SemaResult<Vec<u8>> {
        if let Value::Character(bytes) = &self.value {
            if bytes.is_empty() {
                return Err(SemaError::semantic(
                    "cannot transfer a zero-length character constant",
                    self.span,
                ));
            }
            return Ok(bytes.clone());
        }

        let size = self.numeric_width(&self.ty)?;
        let mut buf = [0u8; MAX_NUMERIC_WIDTH];
        match self.value {
            Value::Logical(b) => buf[0] = u8::from(b),
            Value::Integer(v) => {
                if size > 8 {
                    return Err(self.unsupported_width(&self.ty));
                }
                buf[..size].copy_from_slice(&v.to_le_bytes()[..size]);
            }
            Value::Real(v) => self.write_real(&mut buf[..size], v)?,
            Value::Complex(re, im) => {
                let half = size / 2;
                self.write_real(&mut buf[..half], re)?;
                self.write_real(&mut buf[half..size], im)?;
            }
            Value::Character(_) => {}
        }
        Ok(buf[..size].to_vec())
    }

    fn write_real(&self, out: &mut [u8], v: f64) -> SemaResult<()> {
        match out.len() {
            4 => out.copy_from_slice(&(v as f32).to_le_bytes()),
            8 => out.copy_from_slice(&v.to_le_bytes()),
            10 => out.copy_from_slice(&extended::encode(v)),
            _ => return Err(self.unsupported_width(&self.ty)),
        }
        Ok(())
    }

    fn from_storage(&self, source: &[u8], target: &SemaType) -> SemaResult<TypeVal> {
        if !target.is_scalar() {
            return Err(SemaError::unsupported(
                format!("TRANSFER to {} is not supported", target),
                self.span,
            ));
        }

        if target.is_character() {
            let size = target.size().ok_or_else(|| {
                SemaError::unsupported(
                    "TRANSFER to a variable length character is not supported",
                    self.span,
                )
            })? as usize;
            let mut out = vec![0u8; size];
            let n = source.len().min(size);
            out[..n].copy_from_slice(&source[..n]);
            return Ok(TypeVal::from_parts(
                target.clone(),
                Value::Character(out),
                self.span,
            ));
        }

        let size = self.numeric_width(target)?;
        let mut buf = [0u8; MAX_NUMERIC_WIDTH];
        let n = source.len().min(size);
        buf[..n].copy_from_slice(&source[..n]);
        let buf = &buf[..size];

        let value = match target.category() {
            Some(Category::Logical) => Value::Logical(buf.iter().any(|b| *b != 0)),
            Some(Category::Integer | Category::Byte) => {
                if size > 8 {
                    return Err(self.unsupported_width(target));
                }
                let mut wide = [0u8; 8];
                wide[..size].copy_from_slice(buf);
                // Sign extend from the target width
                let shift = 64 - 8 * size as u32;
                Value::Integer((i64::from_le_bytes(wide) << shift) >> shift)
            }
            Some(Category::Real) => Value::Real(self.read_real(buf, target)?),
            Some(Category::Complex) => {
                let half = size / 2;
                Value::Complex(
                    self.read_real(&buf[..half], target)?,
                    self.read_real(&buf[half..], target)?,
                )
            }
            _ => return Err(self.unsupported_width(target)),
        };

        Ok(TypeVal::from_parts(target.clone(), value, self.span))
    }

    fn read_real(&self, bytes: &[u8], target: &SemaType) -> SemaResult<f64> {
        match bytes.len() {
            4 => {
                let mut b = [0u8; 4];
                b.copy_from_slice(bytes);
                Ok(f64::from(f32::from_le_bytes(b)))
            }
            8 => {
                let mut b = [0u8; 8];
                b.copy_from_slice(bytes);
                Ok(f64::from_le_bytes(b))
            }
            10 => {
                let mut b = [0u8; 10];
                b.copy_from_slice(bytes);
                Ok(extended::decode(b))
            }
            _ => Err(self.unsupported_width(target)),
        }
    }

    /// Storage size of a numeric or logical scalar, bounded by the buffer
    fn numeric_width(&self, ty: &SemaType) -> SemaResult<usize> {
        match ty.size() {
            Some(size) if size > 0 && size as usize <= MAX_NUMERIC_WIDTH => Ok(size as usize),
            _ => Err(self.unsupported_width(ty)),
        }
    }

    fn unsupported_width(&self, ty: &SemaType) -> SemaError {
        SemaError::unsupported(format!("TRANSFER of {} is not supported", ty), self.span)
    }
}
