//! Static catalog of standard currency templates.
//!
//! The catalog is a fixed, immutable reference list - it is not scoped
//! to any book. Selection UIs read it directly and book provisioning
//! uses it for defaults; cloning a template into a book creates a
//! regular commodity row.

use serde::Serialize;

/// A standard currency template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrencyTemplate {
    /// Commodity namespace the template belongs to.
    pub namespace: &'static str,
    /// ISO 4217 code.
    pub mnemonic: &'static str,
    /// Full currency name.
    pub fullname: &'static str,
    /// Minor units per major unit (100 for cent-based, 1 for none).
    pub fraction: i32,
}

/// Standard currencies offered for book setup.
pub const STANDARD_CURRENCIES: &[CurrencyTemplate] = &[
    CurrencyTemplate {
        namespace: "ISO4217",
        mnemonic: "USD",
        fullname: "United States Dollar",
        fraction: 100,
    },
    CurrencyTemplate {
        namespace: "ISO4217",
        mnemonic: "EUR",
        fullname: "Euro",
        fraction: 100,
    },
    CurrencyTemplate {
        namespace: "ISO4217",
        mnemonic: "GBP",
        fullname: "Pound Sterling",
        fraction: 100,
    },
    CurrencyTemplate {
        namespace: "ISO4217",
        mnemonic: "JPY",
        fullname: "Japanese Yen",
        fraction: 1,
    },
    CurrencyTemplate {
        namespace: "ISO4217",
        mnemonic: "CAD",
        fullname: "Canadian Dollar",
        fraction: 100,
    },
    CurrencyTemplate {
        namespace: "ISO4217",
        mnemonic: "AUD",
        fullname: "Australian Dollar",
        fraction: 100,
    },
    CurrencyTemplate {
        namespace: "ISO4217",
        mnemonic: "LKR",
        fullname: "Sri Lankan Rupee",
        fraction: 100,
    },
];

/// Returns the standard currency catalog.
#[must_use]
pub const fn standard_currencies() -> &'static [CurrencyTemplate] {
    STANDARD_CURRENCIES
}

/// Looks up a standard currency by its ISO code.
#[must_use]
pub fn find_standard(mnemonic: &str) -> Option<&'static CurrencyTemplate> {
    STANDARD_CURRENCIES
        .iter()
        .find(|c| c.mnemonic.eq_ignore_ascii_case(mnemonic))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_positive_fractions() {
        for template in standard_currencies() {
            assert!(template.fraction > 0, "{} fraction", template.mnemonic);
        }
    }

    #[test]
    fn test_catalog_mnemonics_unique() {
        let mut codes: Vec<_> = standard_currencies().iter().map(|c| c.mnemonic).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), standard_currencies().len());
    }

    #[test]
    fn test_yen_has_no_minor_unit() {
        assert_eq!(find_standard("JPY").unwrap().fraction, 1);
    }

    #[test]
    fn test_find_is_case_insensitive() {
        assert_eq!(find_standard("usd").unwrap().mnemonic, "USD");
        assert!(find_standard("XXX").is_none());
    }
}
