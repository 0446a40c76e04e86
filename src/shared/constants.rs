/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// PHOTO CONSTANTS
// =============================================================================

/// Maximum size of a single photo upload (10MB)
pub const MAX_PHOTO_SIZE: usize = 10 * 1024 * 1024;

/// Content types accepted for photo uploads
pub const ALLOWED_PHOTO_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/heic",
    "image/heif",
];

/// Entity segment used in storage paths before the entity has an id
pub const NEW_ENTITY_SEGMENT: &str = "new";

/// Length of the random suffix appended to uploaded photo names
pub const PHOTO_RANDOM_SUFFIX_LEN: usize = 6;

// =============================================================================
// SIGNATURE CONSTANTS
// =============================================================================

/// Prefix every signature image must carry
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Upper bound on the decoded signature image (2MB)
pub const MAX_SIGNATURE_SIZE: usize = 2 * 1024 * 1024;
