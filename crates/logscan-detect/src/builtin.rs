//! The built-in detector table.
//!
//! Order is significant: it is the order in which matches are appended to
//! a line's record. Whether a line carries PII does not depend on it.

use crate::detector::{Detector, KeywordDetector, PatternDetector};
use crate::error::Result;

/// Driving-licence numbers (state code, RTO code, year, serial).
pub const DL: &str = r"[A-Z]{2}[0-9]{2}[\-\s]?[0-9]{4}[0-9]{7}";
/// GST taxpayer identification numbers.
pub const GSTIN: &str = r"[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][A-Z0-9]Z[A-Z0-9]";
/// IPv4-shaped dotted quads (octet ranges are not checked).
pub const IP: &str = r"([0-9]{1,3}\.){3}[0-9]{1,3}";
/// MAC addresses with `:` or `-` separators.
pub const MAC: &str = r"([0-9A-Fa-f]{2}[:-]){5}([0-9A-Fa-f]{2})";
/// Decimal latitude/longitude pairs.
pub const COORD: &str = r"-?[0-9]{1,3}\.[0-9]+,\s*-?[0-9]{1,3}\.[0-9]+";
/// E-mail addresses.
pub const EMAIL: &str = r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}";
/// Indian mobile numbers with optional `+91`, `91` or `0` prefix.
pub const MOBILE: &str = r"(\+91|91|0)?[6-9][0-9]{9}";
/// Permanent account numbers.
pub const PAN: &str = r"[A-Z]{5}[0-9]{4}[A-Z]";
/// UPI handles (`name@provider`).
pub const UPI: &str = r"[A-Za-z0-9]+@[A-Za-z]+";
/// Voter identity card numbers.
pub const VOTER_ID: &str = r"[A-Z]{3}[0-9]{7}";
/// Payment card numbers by issuer prefix and length.
pub const CARD: &str = concat!(
    r"4[0-9]{12}(?:[0-9]{3})?",
    r"|5[1-5][0-9]{14}",
    r"|2(?:2[2-9][0-9]{12}|[3-6][0-9]{13}|7(?:[01][0-9]{12}|20[0-9]{12}))",
    r"|3[47][0-9]{13}",
    r"|60[0-9]{14}",
    r"|65[0-9]{14}",
    r"|81[0-9]{14}",
    r"|508[0-9][0-9]{12}",
);

/// Address field labels.
pub const ADDRESS_KEYWORDS: &[&str] = &[
    "address",
    "full address",
    "complete address",
    "residential address",
    "permanent address",
    "locality",
    "pincode",
    "postal code",
    "zip",
    "zip code",
    "city",
    "state",
    "add",
];
/// Name field labels.
pub const NAME_KEYWORDS: &[&str] = &["name", "nam"];
/// Date-of-birth field labels.
pub const DOB_KEYWORDS: &[&str] = &["date of birth", "dob", "birthdate", "born on"];
/// Bank account field labels.
pub const ACCOUNT_NUMBER_KEYWORDS: &[&str] = &[
    "account number",
    "acc number",
    "bank account",
    "account no",
    "a/c no",
];
/// Customer identifier field labels.
pub const CUSTOMER_ID_KEYWORDS: &[&str] = &["customer id", "cust id", "customer number", "cust"];
/// Identity document hints.
pub const SENSITIVE_HINTS_KEYWORDS: &[&str] = &[
    "national id",
    "identity card",
    "proof of identity",
    "document number",
];
/// Insurance policy field labels.
pub const INSURANCE_POLICY_KEYWORDS: &[&str] = &[
    "insurance number",
    "policy number",
    "insurance id",
    "ins id",
];

/// Build the built-in detectors in catalog order.
pub fn detectors() -> Result<Vec<Box<dyn Detector>>> {
    let patterns: [(&str, &str); 11] = [
        ("DL_REGEX", DL),
        ("GSTIN_REGEX", GSTIN),
        ("IP_REGEX", IP),
        ("MAC_REGEX", MAC),
        ("COORD_REGEX", COORD),
        ("EMAIL_REGEX", EMAIL),
        ("MOBILE_REGEX", MOBILE),
        ("PAN_REGEX", PAN),
        ("UPI_REGEX", UPI),
        ("VOTERID_REGEX", VOTER_ID),
        ("CARD_REGEX", CARD),
    ];
    let keywords: [(&str, &[&str]); 7] = [
        ("ADDRESS_KEYWORD", ADDRESS_KEYWORDS),
        ("NAME_KEYWORD", NAME_KEYWORDS),
        ("DOB_KEYWORD", DOB_KEYWORDS),
        ("ACCOUNT_NUMBER_KEYWORD", ACCOUNT_NUMBER_KEYWORDS),
        ("CUSTOMER_ID_KEYWORD", CUSTOMER_ID_KEYWORDS),
        ("SENSITIVE_HINTS_KEYWORD", SENSITIVE_HINTS_KEYWORDS),
        ("INSURANCE_POLICY_KEYWORD", INSURANCE_POLICY_KEYWORDS),
    ];

    let mut detectors: Vec<Box<dyn Detector>> =
        Vec::with_capacity(patterns.len() + keywords.len());
    for (name, pattern) in patterns {
        let detector = PatternDetector::new(name, pattern)?;
        // An e-mail address is reported once, by EMAIL_REGEX.
        let detector = if name == "UPI_REGEX" {
            detector.excluding(EMAIL)?
        } else {
            detector
        };
        detectors.push(Box::new(detector));
    }
    for (name, words) in keywords {
        detectors.push(Box::new(KeywordDetector::new(name, words.iter().copied())?));
    }

    Ok(detectors)
}
