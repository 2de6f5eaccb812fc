//! Database schema definitions and SQL constants.

/// Current schema version for the database.
///
/// Stored in the metadata table; a database carrying any other version is
/// refused.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// SQL statement to create the metadata table.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// SQL statement to create the books table.
///
/// Counters are constrained to be non-negative.
pub const CREATE_BOOKS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS books (
        title TEXT PRIMARY KEY NOT NULL,
        author TEXT NOT NULL,
        num_available INTEGER NOT NULL DEFAULT 1 CHECK (num_available >= 0),
        num_loaned INTEGER NOT NULL DEFAULT 0 CHECK (num_loaned >= 0),
        added_by TEXT,
        created_at INTEGER NOT NULL
    )";

/// SQL statement to create the reservations table.
///
/// `(borrower, title)` is not unique: each row is one copy.
pub const CREATE_RESERVATIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reservations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        borrower TEXT NOT NULL,
        title TEXT NOT NULL,
        created_at INTEGER NOT NULL
    )";

/// Index for per-borrower counts.
pub const CREATE_BORROWER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reservations_borrower ON reservations(borrower)";

/// Index for per-title counts and returns.
pub const CREATE_TITLE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reservations_title ON reservations(title)";

/// Index for the overdue scan.
pub const CREATE_CREATED_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reservations_created ON reservations(created_at)";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";
