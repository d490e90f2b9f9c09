//! LayerZero V2 executor options.
//!
//! Options are a packed byte string: a `u16` type-3 header followed by
//! worker entries `worker_id:u8 | length:u16 | option_type:u8 | body`, where
//! `length` covers the option type byte and the body.

use alloy_primitives::Bytes;

const TYPE_3: u16 = 3;
const EXECUTOR_WORKER_ID: u8 = 1;

const OPTION_TYPE_LZCOMPOSE: u8 = 3;

/// Default gas budget for `lzCompose` on the destination.
pub const DEFAULT_COMPOSE_GAS_LIMIT: u128 = 2_000_000;

/// Builder for type-3 executor options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorOptions {
    buf: Vec<u8>,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutorOptions {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: TYPE_3.to_be_bytes().to_vec(),
        }
    }

    /// Gas (and optional native value) for the compose call at `index`.
    #[must_use]
    pub fn lz_compose(self, index: u16, gas: u128, value: u128) -> Self {
        let mut body = index.to_be_bytes().to_vec();
        body.extend_from_slice(&gas.to_be_bytes());
        if value > 0 {
            body.extend_from_slice(&value.to_be_bytes());
        }
        self.push(OPTION_TYPE_LZCOMPOSE, &body)
    }

    fn push(mut self, option_type: u8, body: &[u8]) -> Self {
        // Bodies are at most 2 + 16 + 16 bytes, so the length always fits.
        let len = (body.len() + 1) as u16;
        self.buf.push(EXECUTOR_WORKER_ID);
        self.buf.extend_from_slice(&len.to_be_bytes());
        self.buf.push(option_type);
        self.buf.extend_from_slice(body);
        self
    }

    #[must_use]
    pub fn build(self) -> Bytes {
        self.buf.into()
    }
}

/// Options for the swap dispatch: a single compose call with `gas`.
#[must_use]
pub fn compose_options(gas: u128) -> Bytes {
    ExecutorOptions::new().lz_compose(0, gas, 0).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::bytes;

    #[test]
    fn empty_options_is_header_only() {
        assert_eq!(ExecutorOptions::new().build(), bytes!("0003"));
    }

    #[test]
    fn compose_default_gas() {
        assert_eq!(
            compose_options(DEFAULT_COMPOSE_GAS_LIMIT),
            bytes!("0003010013030000000000000000000000000000001e8480")
        );
    }

    #[test]
    fn compose_with_value_extends_length() {
        let opts = ExecutorOptions::new().lz_compose(1, 100, 5).build();
        // header(2) + worker(1) + len(2) + type(1) + index(2) + gas(16) + value(16)
        assert_eq!(opts.len(), 40);
        assert_eq!(&opts[3..5], &[0x00, 0x23]);
        assert_eq!(opts[5], OPTION_TYPE_LZCOMPOSE);
        assert_eq!(&opts[6..8], &[0x00, 0x01]);
    }
}
