pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS ledger_rows (
    section     TEXT NOT NULL,
    row_num     INTEGER NOT NULL,
    merchant    TEXT NOT NULL,
    note        TEXT NOT NULL DEFAULT '',
    date_serial INTEGER NOT NULL,
    amount      TEXT NOT NULL,
    balance     TEXT NOT NULL DEFAULT '',
    category    TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL,
    PRIMARY KEY (section, row_num)
);

CREATE INDEX IF NOT EXISTS idx_ledger_rows_merchant ON ledger_rows(section, merchant);
"#;

pub(crate) const CURRENT_VERSION: i32 = 1;
