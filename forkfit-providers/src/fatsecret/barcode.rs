//! Barcode canonicalization.

use forkfit_core::CoreError;

/// Converts a scanned code to the 13-digit GTIN FatSecret expects.
///
/// Non-digits are dropped first. UPC-A (12 digits) gets one leading zero,
/// EAN-8 gets five, EAN-13 passes through.
pub fn normalize_gtin13(raw: &str) -> Result<String, CoreError> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    match digits.len() {
        13 => Ok(digits),
        12 => Ok(format!("0{digits}")),
        8 => Ok(format!("00000{digits}")),
        len => Err(CoreError::InvalidArgument(format!(
            "Unsupported barcode length: {len}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upc_a() {
        assert_eq!(normalize_gtin13("012345678905").unwrap(), "0012345678905");
    }

    #[test]
    fn test_ean_8() {
        assert_eq!(normalize_gtin13("12345678").unwrap(), "0000012345678");
    }

    #[test]
    fn test_ean_13_strips_separators() {
        assert_eq!(
            normalize_gtin13(" 5-012345-678900 ").unwrap(),
            "5012345678900"
        );
    }

    #[test]
    fn test_unsupported_length() {
        match normalize_gtin13("1234567890") {
            Err(CoreError::InvalidArgument(msg)) => assert!(msg.ends_with("10")),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(normalize_gtin13("abc").is_err());
    }
}
