/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// ACCOUNTS
// =============================================================================

/// Minimum password length for general accounts
pub const MIN_PASSWORD_LENGTH: u64 = 8;

/// Length of the generated organization role code
pub const ROLE_CODE_LENGTH: usize = 8;

/// Characters a role code is drawn from
pub const ROLE_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

// =============================================================================
// REPORTS
// =============================================================================

/// Maximum report description length in characters
pub const MAX_DESCRIPTION_LENGTH: u64 = 5000;

/// Maximum accepted report photo size
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Image content types accepted for report photos
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

// =============================================================================
// VOLUNTEERS
// =============================================================================

/// Upper bound on volunteers a movement may ask for
pub const MAX_NEEDED_VOLUNTEERS: i32 = 10_000;
