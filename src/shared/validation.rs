use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for organization role codes
    /// Exactly eight uppercase letters or digits
    /// - Valid: "AB12CD34", "00000000"
    /// - Invalid: "ab12cd34", "AB12CD3", "AB12-D34"
    pub static ref ROLE_CODE_REGEX: Regex = Regex::new(r"^[A-Z0-9]{8}$").unwrap();
}
