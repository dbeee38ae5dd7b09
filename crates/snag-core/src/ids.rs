//! ID prefix constants.
//!
//! Every row ID is `<prefix>-<8 hex chars>`, generated in SQL (see
//! `snag-db::SnagDb::generate_id`). Session IDs double as bearer tokens.

pub const PREFIX_USER: &str = "usr";
pub const PREFIX_SESSION: &str = "ses";
pub const PREFIX_PROJECT: &str = "prj";
pub const PREFIX_SITE: &str = "sit";
pub const PREFIX_DEFECT: &str = "dft";
pub const PREFIX_COMMENT: &str = "cmt";
pub const PREFIX_ATTACHMENT: &str = "att";

/// All prefixes, for exhaustive ID-format tests.
pub const ALL_PREFIXES: [&str; 7] = [
    PREFIX_USER,
    PREFIX_SESSION,
    PREFIX_PROJECT,
    PREFIX_SITE,
    PREFIX_DEFECT,
    PREFIX_COMMENT,
    PREFIX_ATTACHMENT,
];
