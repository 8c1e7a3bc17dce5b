//! SQLite schema

/// One row per translated source message
pub const CREATE_MESSAGE_MAP: &str = "
CREATE TABLE IF NOT EXISTS message_map (
    src_channel TEXT NOT NULL,
    src_ts      TEXT NOT NULL,
    dst_channel TEXT NOT NULL,
    dst_ts      TEXT NOT NULL,
    PRIMARY KEY (src_channel, src_ts)
)";

pub const SELECT_DESTINATION: &str =
    "SELECT dst_channel, dst_ts FROM message_map WHERE src_channel = ?1 AND src_ts = ?2";

pub const UPSERT_MAPPING: &str = "
INSERT INTO message_map (src_channel, src_ts, dst_channel, dst_ts)
VALUES (?1, ?2, ?3, ?4)
ON CONFLICT (src_channel, src_ts)
DO UPDATE SET dst_channel = excluded.dst_channel, dst_ts = excluded.dst_ts";

pub const DELETE_MAPPING: &str = "DELETE FROM message_map WHERE src_channel = ?1 AND src_ts = ?2";
