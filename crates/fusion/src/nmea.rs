//! NMEA-style sentence framing.
//!
//! A sentence is `$<body>*<cs>\r\n` where `cs` is the XOR of all bytes
//! between `$` and `*`, written as two upper-case hex digits.

use std::fmt;

use crate::error::Result;
use crate::text::FixedString;

/// XOR of the bytes between the leading `$` (if any) and the first `*`.
pub fn checksum(sentence: &[u8]) -> u8 {
    let body = match sentence.first() {
        Some(b'$') | Some(b'!') => &sentence[1..],
        _ => sentence,
    };
    body.iter()
        .take_while(|&&b| b != b'*')
        .fold(0u8, |cs, &b| cs ^ b)
}

/// Checks the two hex digits after `*` against the computed checksum.
pub fn verify(sentence: &str) -> bool {
    let Some(star) = sentence.rfind('*') else {
        return false;
    };
    let digits = sentence[star + 1..].trim_end();
    if digits.len() != 2 {
        return false;
    }
    match u8::from_str_radix(digits, 16) {
        Ok(expected) => checksum(&sentence.as_bytes()[..star]) == expected,
        Err(_) => false,
    }
}

/// Appends one framed sentence. `body` must start with `$` and end with `*`;
/// the checksum and line terminator are added here. On overflow nothing of
/// this sentence remains in `out`.
pub fn append_sentence<const N: usize>(
    out: &mut FixedString<N>,
    body: fmt::Arguments<'_>,
) -> Result<()> {
    let start = out.len();
    out.append(body)?;
    let cs = checksum(&out.as_bytes()[start..]);
    out.append(format_args!("{cs:02X}\r\n")).inspect_err(|_| out.truncate(start))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_checksum() {
        let s = "$GPGGA,092750.000,5321.6802,N,00630.3372,W,1,8,1.03,61.7,M,55.2,M,,*76";
        assert!(verify(s));
        assert!(verify("$GPGGA,092750.000,5321.6802,N,00630.3372,W,1,8,1.03,61.7,M,55.2,M,,*76\r\n"));
        assert!(!verify("$GPGGA,092750.000,5321.6802,N,00630.3372,W,1,8,1.03,61.7,M,55.2,M,,*77"));
        assert!(!verify("$GPGGA,no checksum"));
    }

    #[test]
    fn appended_sentence_verifies() {
        let mut out: FixedString<64> = FixedString::new();
        append_sentence(&mut out, format_args!("$PFLAU,,,,1,0,{},0,{},{},{}*", 90, 100, 1000, "AABBCC"))
            .unwrap();
        assert!(out.ends_with("\r\n"));
        assert!(verify(&out));
    }

    #[test]
    fn overflow_removes_partial_sentence() {
        let mut out: FixedString<24> = FixedString::try_from("keep").unwrap();
        let res = append_sentence(&mut out, format_args!("$PFLAU,,,,1,0,{}*", 123456789));
        assert!(res.is_err());
        assert_eq!(out, "keep");
    }
}
