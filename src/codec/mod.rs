//! Protocol command codec.
//!
//! A protocol command is a `uint8` opcode followed by a fixed, ordered list of
//! typed arguments, encoded as a standard ABI tuple (the same bytes as
//! `abi.encode(["uint8", ...], [opcode, ...])`). The dispatcher decodes the
//! tuple on-chain; this module performs type and width checks only.

pub mod opcodes;

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{Address, Bytes, I256, U256};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::errors::GovernError;

/// Declared ABI type of a single command argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmdArgType {
    Address,
    Uint(usize),
    Int(usize),
    Bool,
}

impl CmdArgType {
    fn to_sol_type(self) -> DynSolType {
        match self {
            CmdArgType::Address => DynSolType::Address,
            CmdArgType::Uint(bits) => DynSolType::Uint(bits),
            CmdArgType::Int(bits) => DynSolType::Int(bits),
            CmdArgType::Bool => DynSolType::Bool,
        }
    }
}

impl fmt::Display for CmdArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CmdArgType::Address => write!(f, "address"),
            CmdArgType::Uint(bits) => write!(f, "uint{bits}"),
            CmdArgType::Int(bits) => write!(f, "int{bits}"),
            CmdArgType::Bool => write!(f, "bool"),
        }
    }
}

impl FromStr for CmdArgType {
    type Err = GovernError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ty = match s {
            "address" => CmdArgType::Address,
            "bool" => CmdArgType::Bool,
            "uint" => CmdArgType::Uint(256),
            "int" => CmdArgType::Int(256),
            _ => {
                if let Some(bits) = s.strip_prefix("uint") {
                    CmdArgType::Uint(parse_bits(bits)?)
                } else if let Some(bits) = s.strip_prefix("int") {
                    CmdArgType::Int(parse_bits(bits)?)
                } else {
                    return Err(GovernError::Encoding(format!("unsupported argument type `{s}`")));
                }
            }
        };
        Ok(ty)
    }
}

fn parse_bits(s: &str) -> Result<usize, GovernError> {
    let bits: usize = s
        .parse()
        .map_err(|_| GovernError::Encoding(format!("invalid bit width `{s}`")))?;
    check_bits(bits)?;
    Ok(bits)
}

fn check_bits(bits: usize) -> Result<(), GovernError> {
    if bits == 0 || bits > 256 || bits % 8 != 0 {
        return Err(GovernError::Encoding(format!("bit width {bits} is not a multiple of 8 in 8..=256")));
    }
    Ok(())
}

/// A single typed argument of a protocol command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CmdArg {
    Address(Address),
    Uint { bits: usize, value: U256 },
    Int { bits: usize, value: I256 },
    Bool(bool),
}

impl CmdArg {
    pub fn uint(bits: usize, value: impl Into<U256>) -> Self {
        CmdArg::Uint { bits, value: value.into() }
    }

    pub fn int(bits: usize, value: i64) -> Self {
        CmdArg::Int { bits, value: I256::unchecked_from(value) }
    }

    /// Declared type of this argument.
    pub fn arg_type(&self) -> CmdArgType {
        match self {
            CmdArg::Address(_) => CmdArgType::Address,
            CmdArg::Uint { bits, .. } => CmdArgType::Uint(*bits),
            CmdArg::Int { bits, .. } => CmdArgType::Int(*bits),
            CmdArg::Bool(_) => CmdArgType::Bool,
        }
    }

    /// Check the value fits its declared width and convert to an ABI value.
    fn to_sol_value(&self) -> Result<DynSolValue, GovernError> {
        match self {
            CmdArg::Address(addr) => Ok(DynSolValue::Address(*addr)),
            CmdArg::Bool(b) => Ok(DynSolValue::Bool(*b)),
            CmdArg::Uint { bits, value } => {
                check_bits(*bits)?;
                if *bits < 256 && value.bit_len() > *bits {
                    return Err(GovernError::Encoding(format!("{value} does not fit in uint{bits}")));
                }
                Ok(DynSolValue::Uint(*value, *bits))
            }
            CmdArg::Int { bits, value } => {
                check_bits(*bits)?;
                if *bits < 256 {
                    let bound = I256::ONE << (*bits - 1);
                    if *value >= bound || *value < -bound {
                        return Err(GovernError::Encoding(format!("{value} does not fit in int{bits}")));
                    }
                }
                Ok(DynSolValue::Int(*value, *bits))
            }
        }
    }

    fn from_sol_value(value: DynSolValue) -> Result<Self, GovernError> {
        match value {
            DynSolValue::Address(addr) => Ok(CmdArg::Address(addr)),
            DynSolValue::Bool(b) => Ok(CmdArg::Bool(b)),
            DynSolValue::Uint(value, bits) => Ok(CmdArg::Uint { bits, value }),
            DynSolValue::Int(value, bits) => Ok(CmdArg::Int { bits, value }),
            other => Err(GovernError::Encoding(format!("unexpected decoded value {other:?}"))),
        }
    }
}

impl fmt::Display for CmdArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CmdArg::Address(addr) => write!(f, "address:{addr}"),
            CmdArg::Uint { bits, value } => write!(f, "uint{bits}:{value}"),
            CmdArg::Int { bits, value } => write!(f, "int{bits}:{value}"),
            CmdArg::Bool(b) => write!(f, "bool:{b}"),
        }
    }
}

/// Parses the CLI form `type:value`, e.g. `uint16:2` or `address:0x11..11`.
impl FromStr for CmdArg {
    type Err = GovernError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (ty, raw) = s
            .split_once(':')
            .ok_or_else(|| GovernError::Encoding(format!("expected `type:value`, got `{s}`")))?;
        let invalid = || GovernError::Encoding(format!("invalid {ty} value `{raw}`"));

        let arg = match ty.parse::<CmdArgType>()? {
            CmdArgType::Address => CmdArg::Address(raw.parse().map_err(|_| invalid())?),
            CmdArgType::Bool => CmdArg::Bool(raw.parse().map_err(|_| invalid())?),
            CmdArgType::Uint(bits) => CmdArg::Uint { bits, value: raw.parse().map_err(|_| invalid())? },
            CmdArgType::Int(bits) => CmdArg::Int { bits, value: raw.parse().map_err(|_| invalid())? },
        };
        arg.to_sol_value()?;
        Ok(arg)
    }
}

/// An encoded administrative command addressed to a dispatcher callpath.
///
/// `sudo` marks commands that need elevated dispatch privilege (e.g. proxy
/// installs and safe-mode toggles).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtocolCommand {
    pub callpath: u16,
    pub payload: Bytes,
    pub sudo: bool,
}

impl ProtocolCommand {
    pub fn new(callpath: u16, payload: Bytes, sudo: bool) -> Self {
        Self { callpath, payload, sudo }
    }
}

/// Encode `(uint8 opcode, ...args)` as an ABI tuple.
pub fn encode(opcode: u8, args: &[CmdArg]) -> Result<Bytes, GovernError> {
    let mut values = Vec::with_capacity(args.len() + 1);
    values.push(DynSolValue::Uint(U256::from(opcode), 8));
    for arg in args {
        values.push(arg.to_sol_value()?);
    }
    Ok(DynSolValue::Tuple(values).abi_encode_params().into())
}

/// Decode a payload produced by [`encode`] given the argument types.
pub fn decode(payload: &[u8], types: &[CmdArgType]) -> Result<(u8, Vec<CmdArg>), GovernError> {
    let mut sol_types = Vec::with_capacity(types.len() + 1);
    sol_types.push(DynSolType::Uint(8));
    sol_types.extend(types.iter().map(|t| t.to_sol_type()));

    let decoded = DynSolType::Tuple(sol_types)
        .abi_decode_params(payload)
        .map_err(|e| GovernError::Encoding(format!("payload does not decode: {e}")))?;
    let DynSolValue::Tuple(mut values) = decoded else {
        return Err(GovernError::Encoding("payload is not a tuple".to_string()));
    };
    if values.is_empty() {
        return Err(GovernError::Encoding("payload has no opcode".to_string()));
    }

    let opcode = match values.remove(0) {
        DynSolValue::Uint(value, _) => u8::try_from(value)
            .map_err(|_| GovernError::Encoding(format!("opcode {value} exceeds uint8")))?,
        other => return Err(GovernError::Encoding(format!("opcode decoded as {other:?}"))),
    };
    let args = values
        .into_iter()
        .map(CmdArg::from_sol_value)
        .collect::<Result<Vec<_>, _>>()?;
    Ok((opcode, args))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const PROXY: Address = address!("1111111111111111111111111111111111111111");

    #[test]
    fn test_install_proxy_encoding_layout() {
        let payload = encode(21, &[CmdArg::Address(PROXY), CmdArg::uint(16, alloy_primitives::U256::from(2u64))]).unwrap();

        assert_eq!(payload.len(), 96);
        assert_eq!(payload[31], 21);
        assert!(payload[..31].iter().all(|b| *b == 0));
        assert_eq!(&payload[44..64], PROXY.as_slice());
        assert_eq!(payload[95], 2);
    }

    #[test]
    fn test_install_proxy_decodes_to_same_triple() {
        let payload = encode(21, &[CmdArg::Address(PROXY), CmdArg::uint(16, alloy_primitives::U256::from(2u64))]).unwrap();
        let (opcode, args) =
            decode(&payload, &[CmdArgType::Address, CmdArgType::Uint(16)]).unwrap();

        assert_eq!(opcode, 21);
        assert_eq!(args, vec![CmdArg::Address(PROXY), CmdArg::uint(16, alloy_primitives::U256::from(2u64))]);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let args = [CmdArg::Bool(true), CmdArg::int(24, -128), CmdArg::uint(128, alloy_primitives::U256::from(10_000u64))];
        assert_eq!(encode(23, &args).unwrap(), encode(23, &args).unwrap());
    }

    #[test]
    fn test_negative_int_is_sign_extended() {
        let payload = encode(11, &[CmdArg::int(24, -1)]).unwrap();
        assert!(payload[32..64].iter().all(|b| *b == 0xff));
    }

    #[test]
    fn test_uint_overflow_rejected() {
        let err = encode(21, &[CmdArg::uint(16, alloy_primitives::U256::from(70_000u64))]).unwrap_err();
        assert!(matches!(err, GovernError::Encoding(_)));
    }

    #[test]
    fn test_int_range_bounds() {
        assert!(encode(1, &[CmdArg::int(8, 127)]).is_ok());
        assert!(encode(1, &[CmdArg::int(8, -128)]).is_ok());
        assert!(encode(1, &[CmdArg::int(8, 128)]).is_err());
        assert!(encode(1, &[CmdArg::int(8, -129)]).is_err());
    }

    #[test]
    fn test_int_constructor_keeps_i64_extremes() {
        for v in [i64::MIN, -1, 0, i64::MAX] {
            let CmdArg::Int { value, .. } = CmdArg::int(64, v) else { panic!("not an int") };
            assert_eq!(value.to_string(), v.to_string());
        }
        assert!(encode(1, &[CmdArg::int(64, i64::MIN)]).is_ok());
    }

    #[test]
    fn test_bad_bit_width_rejected() {
        assert!(encode(1, &[CmdArg::uint(12, alloy_primitives::U256::from(1u64))]).is_err());
        assert!("uint300:1".parse::<CmdArg>().is_err());
    }

    #[test]
    fn test_parse_cli_args() {
        assert_eq!("uint16:2".parse::<CmdArg>().unwrap(), CmdArg::uint(16, alloy_primitives::U256::from(2u64)));
        assert_eq!("bool:false".parse::<CmdArg>().unwrap(), CmdArg::Bool(false));
        assert_eq!("int24:-64".parse::<CmdArg>().unwrap(), CmdArg::int(24, -64));
        assert_eq!(
            "address:0x1111111111111111111111111111111111111111".parse::<CmdArg>().unwrap(),
            CmdArg::Address(PROXY)
        );
        assert!("uint8:256".parse::<CmdArg>().is_err());
        assert!("string:hello".parse::<CmdArg>().is_err());
        assert!("uint16".parse::<CmdArg>().is_err());
    }

    #[test]
    fn test_display_parses_back() {
        let arg = CmdArg::uint(16, alloy_primitives::U256::from(3500u64));
        assert_eq!(arg.to_string().parse::<CmdArg>().unwrap(), arg);
    }
}
